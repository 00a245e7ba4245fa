use dyna_core::{AllocPolicy, ArrayConfig, ArrayError, DynamicArray};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Tracked(usize, Arc<AtomicUsize>);

impl Drop for Tracked {
    fn drop(&mut self) {
        println!("Dropping element {}", self.0);
        self.1.fetch_add(1, Ordering::SeqCst);
    }
}

fn main() {
    println!("--- Allocation Failure Example ---");
    let drop_count = Arc::new(AtomicUsize::new(0));

    let mut arr = DynamicArray::create(1).unwrap();
    for i in 0..3 {
        arr.push_back(Tracked(i, drop_count.clone())).unwrap();
    }
    println!("Array holds {} elements, cap {}.", arr.size(), arr.capacity());

    // 布局无法表示的容量：Propagate 策略下以错误返回，而不是终止进程
    let config = ArrayConfig::new(usize::MAX).with_policy(AllocPolicy::Propagate);
    match DynamicArray::<Tracked>::from_config(&config) {
        Ok(_) => unreachable!("a usize::MAX slot array cannot be laid out"),
        Err(err) => {
            println!("Second array failed: {err}");
            assert_eq!(err, ArrayError::CapacityOverflow { requested: usize::MAX });
        }
    }

    // 越界访问同样以错误返回
    if let Err(err) = arr.at(7) {
        println!("Checked access failed: {err}");
    }

    // 失败没有影响已有的数组，也没有释放任何元素
    assert_eq!(arr.size(), 3);
    assert_eq!(arr.capacity(), 4);
    assert_eq!(drop_count.load(Ordering::SeqCst), 0);
    assert!(arr.iter().map(|t| t.0).eq(0..3));

    drop(arr);
    println!("Total elements dropped: {}", drop_count.load(Ordering::SeqCst));
    assert_eq!(drop_count.load(Ordering::SeqCst), 3);
}
