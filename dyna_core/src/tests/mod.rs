use super::*;
use std::ptr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use crossbeam::scope;

fn filled(prealloc: usize, values: &[i32]) -> DynamicArray<i32> {
    let mut v = DynamicArray::create(prealloc).unwrap();
    for &x in values {
        v.push_back(x).unwrap();
    }
    v
}

fn is_even(x: &i32) -> bool {
    x % 2 == 0
}

#[test]
fn test_basic_push_pop() {
    let mut v = DynamicArray::create(1).unwrap();
    v.push_back(1).unwrap();
    v.push_back(2).unwrap();
    v.push_back(3).unwrap();
    assert_eq!(v.size(), 3);
    assert_eq!(v[0], 1);
    assert_eq!(v[1], 2);
    assert_eq!(v[2], 3);
    assert_eq!(v.pop_back(), Some(3));
    assert_eq!(v.pop_back(), Some(2));
    assert_eq!(v.pop_back(), Some(1));
    assert_eq!(v.pop_back(), None);
}

#[test]
fn test_create_coerces_zero_capacity() {
    let v: DynamicArray<u64> = DynamicArray::create(0).unwrap();
    assert_eq!(v.capacity(), 1);
    assert_eq!(v.size(), 0);
    assert!(v.is_empty());
    assert_eq!(v.memsize(), 8);
}

#[test]
fn test_from_config() {
    let config = ArrayConfig::new(6).with_policy(AllocPolicy::Abort);
    let v: DynamicArray<u16> = DynamicArray::from_config(&config).unwrap();
    assert_eq!(v.capacity(), 6);
    assert_eq!(v.memsize(), 12);
    assert_eq!(v.policy(), AllocPolicy::Abort);

    let defaults = ArrayConfig::default();
    assert_eq!(defaults.initial_capacity(), 1);
    assert_eq!(defaults.policy, AllocPolicy::Propagate);
}

#[test]
fn test_create_reports_capacity_overflow() {
    let result = DynamicArray::<u64>::create(usize::MAX);
    assert_eq!(result.err(), Some(ArrayError::CapacityOverflow { requested: usize::MAX }));
}

#[test]
fn test_create_reports_out_of_memory() {
    // 布局合法（2^62 字节），但任何分配器都给不出这么大的块
    let result = DynamicArray::<u64>::create(1 << 59);
    assert_eq!(result.err(), Some(ArrayError::OutOfMemory { bytes: 1 << 62 }));
}

#[test]
fn test_propagate_policy_returns_error() {
    let config = ArrayConfig::new(usize::MAX).with_policy(AllocPolicy::Propagate);
    let err = DynamicArray::<u32>::from_config(&config).err().unwrap();
    assert_eq!(err, ArrayError::CapacityOverflow { requested: usize::MAX });
    assert_eq!(err.to_string(), format!("capacity overflow: {} slots cannot be laid out", usize::MAX));

    // 失败不影响其他数组
    let v = filled(1, &[1, 2]);
    assert!(DynamicArray::<u32>::from_config(&config).is_err());
    assert_eq!(v.as_slice(), &[1, 2]);
}

#[test]
fn test_raw_pointers_address_storage() {
    let mut v = filled(1, &[1, 3, 4, 5]);
    let found = v.find_if(is_even).unwrap();
    assert!(ptr::eq(found, unsafe { v.as_ptr().add(2) }));

    unsafe { *v.as_mut_ptr().add(3) = 50 };
    assert_eq!(v.as_slice(), &[1, 3, 4, 50]);
}

#[test]
fn test_scenario_small_integers() {
    let v = filled(1, &[3, 1, 4, 1, 5]);
    assert_eq!(v.size(), 5);
    assert_eq!(v.get(2), Some(&4));
    assert!(v.any_of(is_even));
    assert!(!v.all_of(is_even));
    assert_eq!(v.find_if(is_even), Some(&4));
    assert_eq!(v.position_if(is_even), Some(2));
}

#[test]
fn test_capacity_doubles_on_growth() {
    let mut v = DynamicArray::create(1).unwrap();
    let mut seen = vec![v.capacity()];
    for i in 0..9 {
        v.push_back(i).unwrap();
        if *seen.last().unwrap() != v.capacity() {
            seen.push(v.capacity());
        }
    }
    assert_eq!(seen, vec![1, 2, 4, 8, 16]);
    assert_eq!(v.as_slice(), &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn test_shrink_halves_once() {
    let mut v = filled(1, &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(v.capacity(), 16);
    while v.size() > 3 {
        v.pop_back();
    }
    assert!(v.shrink().unwrap());
    assert_eq!(v.capacity(), 8);
    assert_eq!(v.as_slice(), &[0, 1, 2]);

    // 3 < 4，再调用一次才会继续收缩
    assert!(v.shrink().unwrap());
    assert_eq!(v.capacity(), 4);
    assert!(!v.shrink().unwrap());
    assert_eq!(v.capacity(), 4);
}

#[test]
fn test_shrink_keeps_capacity_at_least_one() {
    let mut v: DynamicArray<i32> = DynamicArray::create(4).unwrap();
    assert!(v.shrink().unwrap());
    assert!(v.shrink().unwrap());
    assert_eq!(v.capacity(), 1);
    assert!(!v.shrink().unwrap());
    assert_eq!(v.capacity(), 1);
}

#[test]
fn test_pop_back_on_empty_is_noop() {
    let mut v: DynamicArray<i32> = DynamicArray::create(2).unwrap();
    for _ in 0..5 {
        assert_eq!(v.pop_back(), None);
    }
    assert_eq!(v.size(), 0);
    assert_eq!(v.capacity(), 2);
}

#[test]
fn test_checked_access() {
    let mut v = filled(4, &[10, 20]);
    assert_eq!(v.at(1), Ok(&20));
    assert_eq!(v.at(2), Err(ArrayError::IndexOutOfRange { index: 2, size: 2 }));
    assert_eq!(v.get(3), None);

    // 容量内但超出逻辑长度同样视为越界
    assert!(v.capacity() > 2);
    assert_eq!(v.get(2), None);

    *v.get_mut(0).unwrap() += 1;
    assert_eq!(unsafe { *v.get_unchecked(0) }, 11);
}

#[test]
#[should_panic(expected = "index out of bounds")]
fn test_out_of_bounds_index_panics() {
    let v = filled(1, &[1]);
    let _value = v[1];
}

#[test]
fn test_for_each_visits_in_order() {
    let mut v = filled(1, &[5, 6, 7, 8]);
    let mut order = Vec::new();
    v.for_each(|x| {
        order.push(*x);
        *x *= 10;
    });
    assert_eq!(order, vec![5, 6, 7, 8]);
    assert_eq!(v.as_slice(), &[50, 60, 70, 80]);
}

#[test]
fn test_quantifiers_on_empty() {
    let v: DynamicArray<i32> = DynamicArray::create(1).unwrap();
    assert!(!v.any_of(|_| true));
    assert!(v.all_of(|_| false));
    assert!(v.none_of(|_| true));
    assert_eq!(v.find_if(|_| true), None);
}

#[test]
fn test_quantifiers_short_circuit() {
    let v = filled(1, &[1, 2, 3, 4]);
    let mut calls = 0;
    assert!(v.any_of(|x| {
        calls += 1;
        *x == 2
    }));
    assert_eq!(calls, 2);

    calls = 0;
    assert!(!v.all_of(|x| {
        calls += 1;
        *x < 2
    }));
    assert_eq!(calls, 2);

    calls = 0;
    assert!(!v.none_of(|x| {
        calls += 1;
        *x == 1
    }));
    assert_eq!(calls, 1);
}

#[test]
fn test_range_forms_use_half_open_window() {
    let mut v = filled(1, &[1, 2, 3, 4, 5, 6]);
    assert!(v.any_of_range(1, 3, |x| *x == 3));
    assert!(!v.any_of_range(1, 3, |x| *x == 4));
    assert!(v.all_of_range(3, 100, |x| *x > 3));
    assert!(v.none_of_range(0, 2, |x| *x > 2));
    assert_eq!(v.find_if_range(2, 6, is_even), Some(&4));
    assert_eq!(v.position_if_range(2, 6, is_even), Some(3));

    let mut visited = Vec::new();
    v.for_each_range(4, 10, |x| visited.push(*x));
    assert_eq!(visited, vec![5, 6]);

    *v.find_if_range_mut(0, 6, |x| *x == 6).unwrap() = 60;
    assert_eq!(v[5], 60);
}

#[test]
fn test_range_forms_reject_invalid_windows() {
    let mut v = filled(1, &[2, 4, 6]);
    for (begin, end) in [(3, 10), (1, 1), (2, 0)] {
        assert!(!v.any_of_range(begin, end, |_| true));
        assert!(v.all_of_range(begin, end, |_| false));
        assert!(v.none_of_range(begin, end, |_| true));
        assert_eq!(v.find_if_range(begin, end, |_| true), None);
        assert_eq!(v.position_if_range(begin, end, |_| true), None);

        let mut calls = 0;
        v.for_each_range(begin, end, |_| calls += 1);
        assert_eq!(calls, 0);
    }
}

#[test]
fn test_find_if_mut() {
    let mut v = filled(1, &[1, 3, 4, 5]);
    if let Some(x) = v.find_if_mut(is_even) {
        *x = 40;
    }
    assert_eq!(v.as_slice(), &[1, 3, 40, 5]);
    assert!(v.find_if_mut(|x| *x > 100).is_none());
}

#[test]
fn test_try_clone() {
    let v = filled(1, &[1, 2, 3]);
    let copy = v.try_clone().unwrap();
    assert_eq!(copy.as_slice(), v.as_slice());
    assert_eq!(copy.capacity(), v.capacity());
    assert_eq!(format!("{copy:?}"), "[1, 2, 3]");
}

#[test]
fn test_zero_sized_elements() {
    let mut v = DynamicArray::create(1).unwrap();
    for _ in 0..5 {
        v.push_back(()).unwrap();
    }
    assert_eq!(v.size(), 5);
    assert_eq!(v.capacity(), 8);
    assert_eq!(v.memsize(), 0);
    v.pop_back();
    v.pop_back();
    assert!(v.shrink().unwrap());
    assert_eq!(v.capacity(), 4);
    assert_eq!(v.into_iter().count(), 3);
}

#[test]
fn test_raii_drop() {
    let counter = Arc::new(AtomicUsize::new(0));
    struct Droppable(Arc<AtomicUsize>);
    impl Drop for Droppable {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    {
        let mut v = DynamicArray::create(1).unwrap();
        for _ in 0..10 {
            v.push_back(Droppable(counter.clone())).unwrap();
        }
        // 弹出的元素交还给调用者，在这里立即析构
        drop(v.pop_back());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
    assert_eq!(counter.load(Ordering::SeqCst), 10);

    let mut v = DynamicArray::create(4).unwrap();
    v.push_back(Droppable(counter.clone())).unwrap();
    v.destroy();
    assert_eq!(counter.load(Ordering::SeqCst), 11);
}

#[test]
fn test_partially_consumed_into_iter_drops_rest() {
    let counter = Arc::new(AtomicUsize::new(0));
    struct Droppable(Arc<AtomicUsize>);
    impl Drop for Droppable {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    let mut v = DynamicArray::create(1).unwrap();
    for _ in 0..5 {
        v.push_back(Droppable(counter.clone())).unwrap();
    }
    let mut it = v.into_iter();
    assert_eq!(it.len(), 5);
    drop(it.next());
    drop(it.next());
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    drop(it);
    assert_eq!(counter.load(Ordering::SeqCst), 5);
}

#[test]
fn test_iterators() {
    let mut v = filled(1, &[10, 20, 30]);

    let mut sum = 0;
    for &x in &v {
        sum += x;
    }
    assert_eq!(sum, 60);

    for x in &mut v {
        *x += 1;
    }
    assert_eq!(v[0], 11);

    let collected: Vec<i32> = v.into_iter().collect();
    assert_eq!(collected, vec![11, 21, 31]);
}

#[test]
fn test_owned_elements_survive_growth() {
    let mut v = DynamicArray::create(1).unwrap();
    for i in 0..20 {
        v.push_back(format!("item-{i}")).unwrap();
    }
    assert_eq!(v.capacity(), 32);
    assert_eq!(v[0], "item-0");
    assert_eq!(v[19], "item-19");
    assert_eq!(v.find_if(|s| s.ends_with("-7")).map(String::as_str), Some("item-7"));
}

#[test]
fn test_concurrency() {
    let v = filled(1, &(0..100).collect::<Vec<_>>());

    scope(|s| {
        s.spawn(|_| assert!(v.all_of(|x| *x < 100)));
        s.spawn(|_| assert_eq!(v.find_if(|x| *x == 42), Some(&42)));
    }).unwrap();
}
