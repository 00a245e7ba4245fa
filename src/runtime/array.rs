use dyna_core::{DynamicArray, window};
use std::ffi::c_void;
use std::ptr;

/// Visitor callback: element pointer and the caller's opaque data.
pub type VisitFn<T> = Option<extern "C" fn(*mut T, *mut c_void)>;

/// Predicate callback: non-zero means the element matches. The callback may
/// write through the element pointer.
pub type PredicateFn<T> = Option<extern "C" fn(*mut T, *mut c_void) -> i32>;

/// Runs a C predicate against one element. A null predicate never matches.
fn pred_holds<T>(pred: PredicateFn<T>, elem: &mut T, usr_data: *mut c_void) -> bool {
    pred.is_some_and(|f| f(ptr::from_mut(elem), usr_data) != 0)
}

/// Elements a traversal call covers, with the index of the first one.
/// `bounds` of `None` means the whole array.
fn covered<T>(arr: &mut DynamicArray<T>, bounds: Option<(u32, u32)>) -> (usize, &mut [T]) {
    let range = match bounds {
        None => 0..arr.size(),
        Some((begin, end)) => window(begin as usize, end as usize, arr.size()).unwrap_or(0..0),
    };
    let offset = range.start;
    (offset, &mut arr.as_mut_slice()[range])
}

fn first_match<T>(
    arr: &mut DynamicArray<T>,
    bounds: Option<(u32, u32)>,
    pred: PredicateFn<T>,
    usr_data: *mut c_void,
) -> Option<usize> {
    let (offset, elems) = covered(arr, bounds);
    elems
        .iter_mut()
        .position(|elem| pred_holds(pred, elem, usr_data))
        .map(|i| i + offset)
}

fn all_match<T>(
    arr: &mut DynamicArray<T>,
    bounds: Option<(u32, u32)>,
    pred: PredicateFn<T>,
    usr_data: *mut c_void,
) -> bool {
    let (_, elems) = covered(arr, bounds);
    elems.iter_mut().all(|elem| pred_holds(pred, elem, usr_data))
}

/// Raw pointer to the element at `index`, taken from the array's own storage.
fn element_ptr<T>(arr: &mut DynamicArray<T>, index: Option<usize>) -> *mut T {
    match index {
        // SAFETY: index < size, so the offset stays inside the live elements
        Some(i) if i < arr.size() => unsafe { arr.as_mut_ptr().add(i) },
        _ => ptr::null_mut(),
    }
}

/// Stamps out the C ABI for one element type.
///
/// `dynamic_array_ffi!(i64, i64)` exports `dyna_i64_create`, `dyna_i64_push_back`,
/// `dyna_i64_any_of_range` and the rest. Every function taking a handle accepts
/// null and then behaves as on an empty array.
macro_rules! dynamic_array_ffi {
    ($ty:ty, $name:ident) => {
        paste::paste! {
            /// Create a new dynamic array; `prealloc` 0 is treated as 1. Null on storage failure.
            #[unsafe(no_mangle)]
            pub extern "C" fn [<dyna_ $name _create>](prealloc: u32) -> *mut DynamicArray<$ty> {
                match DynamicArray::<$ty>::create(prealloc as usize) {
                    Ok(arr) => Box::into_raw(Box::new(arr)),
                    Err(_) => ptr::null_mut(),
                }
            }

            /// Release the array and its storage.
            ///
            /// # Safety
            ///
            /// `arr_ptr` must come from the matching `create` and not be used afterwards.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<dyna_ $name _destroy>](arr_ptr: *mut DynamicArray<$ty>) {
                if !arr_ptr.is_null() {
                    let arr = unsafe { Box::from_raw(arr_ptr) };
                    arr.destroy();
                }
            }

            /// Append a copy of `elem`. Returns 0 on success, -1 if the array could not grow.
            ///
            /// # Safety
            ///
            /// `arr_ptr` must be null or a live handle.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<dyna_ $name _push_back>](arr_ptr: *mut DynamicArray<$ty>, elem: $ty) -> i32 {
                let Some(arr) = (unsafe { arr_ptr.as_mut() }) else { return -1 };
                match arr.push_back(elem) {
                    Ok(()) => 0,
                    Err(_) => -1,
                }
            }

            /// # Safety
            ///
            /// `arr_ptr` must be null or a live handle.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<dyna_ $name _pop_back>](arr_ptr: *mut DynamicArray<$ty>) {
                if let Some(arr) = unsafe { arr_ptr.as_mut() } {
                    arr.pop_back();
                }
            }

            /// Pointer to the element at `index`, or null when `index >= size`.
            /// The pointer is invalidated by the next push, pop or shrink.
            ///
            /// # Safety
            ///
            /// `arr_ptr` must be null or a live handle.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<dyna_ $name _get>](arr_ptr: *mut DynamicArray<$ty>, index: u32) -> *mut $ty {
                let Some(arr) = (unsafe { arr_ptr.as_mut() }) else { return ptr::null_mut() };
                element_ptr(arr, Some(index as usize))
            }

            /// Halve the capacity if less than half of it is used. Returns 0 on success, -1 on failure.
            ///
            /// # Safety
            ///
            /// `arr_ptr` must be null or a live handle.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<dyna_ $name _shrink>](arr_ptr: *mut DynamicArray<$ty>) -> i32 {
                let Some(arr) = (unsafe { arr_ptr.as_mut() }) else { return -1 };
                match arr.shrink() {
                    Ok(_) => 0,
                    Err(_) => -1,
                }
            }

            /// # Safety
            ///
            /// `arr_ptr` must be null or a live handle.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<dyna_ $name _size>](arr_ptr: *const DynamicArray<$ty>) -> usize {
                unsafe { arr_ptr.as_ref() }.map_or(0, DynamicArray::size)
            }

            /// # Safety
            ///
            /// `arr_ptr` must be null or a live handle.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<dyna_ $name _memsize>](arr_ptr: *const DynamicArray<$ty>) -> usize {
                unsafe { arr_ptr.as_ref() }.map_or(0, DynamicArray::memsize)
            }

            /// # Safety
            ///
            /// `arr_ptr` must be null or a live handle.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<dyna_ $name _for_each>](
                arr_ptr: *mut DynamicArray<$ty>,
                func: VisitFn<$ty>,
                usr_data: *mut c_void,
            ) {
                if let (Some(arr), Some(func)) = (unsafe { arr_ptr.as_mut() }, func) {
                    arr.for_each(|elem| func(elem, usr_data));
                }
            }

            /// # Safety
            ///
            /// `arr_ptr` must be null or a live handle.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<dyna_ $name _for_each_range>](
                arr_ptr: *mut DynamicArray<$ty>,
                func: VisitFn<$ty>,
                usr_data: *mut c_void,
                begin: u32,
                end: u32,
            ) {
                if let (Some(arr), Some(func)) = (unsafe { arr_ptr.as_mut() }, func) {
                    arr.for_each_range(begin as usize, end as usize, |elem| func(elem, usr_data));
                }
            }

            /// # Safety
            ///
            /// `arr_ptr` must be null or a live handle.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<dyna_ $name _any_of>](
                arr_ptr: *mut DynamicArray<$ty>,
                pred: PredicateFn<$ty>,
                usr_data: *mut c_void,
            ) -> i32 {
                let Some(arr) = (unsafe { arr_ptr.as_mut() }) else { return 0 };
                i32::from(first_match(arr, None, pred, usr_data).is_some())
            }

            /// # Safety
            ///
            /// `arr_ptr` must be null or a live handle.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<dyna_ $name _any_of_range>](
                arr_ptr: *mut DynamicArray<$ty>,
                pred: PredicateFn<$ty>,
                usr_data: *mut c_void,
                begin: u32,
                end: u32,
            ) -> i32 {
                let Some(arr) = (unsafe { arr_ptr.as_mut() }) else { return 0 };
                i32::from(first_match(arr, Some((begin, end)), pred, usr_data).is_some())
            }

            /// # Safety
            ///
            /// `arr_ptr` must be null or a live handle.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<dyna_ $name _all_of>](
                arr_ptr: *mut DynamicArray<$ty>,
                pred: PredicateFn<$ty>,
                usr_data: *mut c_void,
            ) -> i32 {
                let Some(arr) = (unsafe { arr_ptr.as_mut() }) else { return 1 };
                i32::from(all_match(arr, None, pred, usr_data))
            }

            /// # Safety
            ///
            /// `arr_ptr` must be null or a live handle.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<dyna_ $name _all_of_range>](
                arr_ptr: *mut DynamicArray<$ty>,
                pred: PredicateFn<$ty>,
                usr_data: *mut c_void,
                begin: u32,
                end: u32,
            ) -> i32 {
                let Some(arr) = (unsafe { arr_ptr.as_mut() }) else { return 1 };
                i32::from(all_match(arr, Some((begin, end)), pred, usr_data))
            }

            /// # Safety
            ///
            /// `arr_ptr` must be null or a live handle.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<dyna_ $name _none_of>](
                arr_ptr: *mut DynamicArray<$ty>,
                pred: PredicateFn<$ty>,
                usr_data: *mut c_void,
            ) -> i32 {
                let Some(arr) = (unsafe { arr_ptr.as_mut() }) else { return 1 };
                i32::from(first_match(arr, None, pred, usr_data).is_none())
            }

            /// # Safety
            ///
            /// `arr_ptr` must be null or a live handle.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<dyna_ $name _none_of_range>](
                arr_ptr: *mut DynamicArray<$ty>,
                pred: PredicateFn<$ty>,
                usr_data: *mut c_void,
                begin: u32,
                end: u32,
            ) -> i32 {
                let Some(arr) = (unsafe { arr_ptr.as_mut() }) else { return 1 };
                i32::from(first_match(arr, Some((begin, end)), pred, usr_data).is_none())
            }

            /// Pointer to the first matching element, or null.
            ///
            /// # Safety
            ///
            /// `arr_ptr` must be null or a live handle.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<dyna_ $name _find_if>](
                arr_ptr: *mut DynamicArray<$ty>,
                pred: PredicateFn<$ty>,
                usr_data: *mut c_void,
            ) -> *mut $ty {
                let Some(arr) = (unsafe { arr_ptr.as_mut() }) else { return ptr::null_mut() };
                let index = first_match(arr, None, pred, usr_data);
                element_ptr(arr, index)
            }

            /// # Safety
            ///
            /// `arr_ptr` must be null or a live handle.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn [<dyna_ $name _find_if_range>](
                arr_ptr: *mut DynamicArray<$ty>,
                pred: PredicateFn<$ty>,
                usr_data: *mut c_void,
                begin: u32,
                end: u32,
            ) -> *mut $ty {
                let Some(arr) = (unsafe { arr_ptr.as_mut() }) else { return ptr::null_mut() };
                let index = first_match(arr, Some((begin, end)), pred, usr_data);
                element_ptr(arr, index)
            }
        }
    };
}

dynamic_array_ffi!(i32, i32);
dynamic_array_ffi!(i64, i64);
dynamic_array_ffi!(u32, u32);
dynamic_array_ffi!(f64, f64);
