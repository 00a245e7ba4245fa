use std::alloc::{alloc, dealloc, realloc, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};

mod config;
mod error;
mod traversal;

pub use config::{AllocPolicy, ArrayConfig};
pub use error::ArrayError;
pub use traversal::window;

/// 基于 RAII 的动态数组实现
///
/// 容量从 `prealloc`（至少为 1）开始，写满时翻倍；`shrink` 在元素数少于容量一半时
/// 将容量减半。任何改变容量的操作都可能移动存储，之前借出的引用由借用检查器保证不会存活。
pub struct DynamicArray<T> {
    ptr: NonNull<T>,
    cap: usize,
    len: usize,
    policy: AllocPolicy,
    _marker: PhantomData<T>,
}

// SAFETY: 只要 T 是 Send，DynamicArray<T> 就可以跨线程转移所有权
unsafe impl<T: Send> Send for DynamicArray<T> {}
// SAFETY: 只要 T 是 Sync，DynamicArray<T> 就可以在多线程间共享引用
unsafe impl<T: Sync> Sync for DynamicArray<T> {}

fn layout_for<T>(cap: usize) -> Result<Layout, ArrayError> {
    Layout::array::<T>(cap).map_err(|_| ArrayError::CapacityOverflow { requested: cap })
}

impl<T> DynamicArray<T> {
    /// 创建具有指定初始容量的动态数组，容量 0 会被提升为 1
    pub fn create(prealloc: usize) -> Result<Self, ArrayError> {
        Self::from_config(&ArrayConfig::new(prealloc))
    }

    /// 按配置创建动态数组
    pub fn from_config(config: &ArrayConfig) -> Result<Self, ArrayError> {
        let cap = config.initial_capacity();
        let ptr = Self::allocate(cap).map_err(|e| config.policy.on_failure(e))?;
        log::trace!("dynamic array created: capacity {cap}, {} bytes", cap * mem::size_of::<T>());

        Ok(Self {
            ptr,
            cap,
            len: 0,
            policy: config.policy,
            _marker: PhantomData,
        })
    }

    fn allocate(cap: usize) -> Result<NonNull<T>, ArrayError> {
        let layout = layout_for::<T>(cap)?;
        if layout.size() == 0 {
            // 零尺寸类型不需要真实的存储
            return Ok(NonNull::dangling());
        }

        // SAFETY: layout 的大小非零
        let raw = unsafe { alloc(layout) };
        NonNull::new(raw.cast::<T>()).ok_or(ArrayError::OutOfMemory { bytes: layout.size() })
    }

    /// 显式销毁数组，释放全部元素和存储
    pub fn destroy(self) {
        drop(self);
    }

    /// 获取当前元素数量
    pub fn size(&self) -> usize {
        self.len
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 获取当前容量
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// 存储占用的字节数，即 `capacity * size_of::<T>()`
    pub fn memsize(&self) -> usize {
        self.cap * mem::size_of::<T>()
    }

    pub fn policy(&self) -> AllocPolicy {
        self.policy
    }

    /// 在末尾添加元素，容量不足时先翻倍
    ///
    /// 扩容失败时数组保持原样，`elem` 被丢弃。
    pub fn push_back(&mut self, elem: T) -> Result<(), ArrayError> {
        if self.len == self.cap {
            self.grow()?;
        }

        unsafe {
            // SAFETY: 我们已确保有足够的容量，且指针有效
            ptr::write(self.ptr.as_ptr().add(self.len), elem);
        }
        // 异常安全：只有在写入成功后才增加 len
        self.len += 1;
        Ok(())
    }

    /// 弹出末尾元素，空数组时什么也不做
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            unsafe {
                // SAFETY: len 已减 1，该位置是有效的已初始化元素
                Some(ptr::read(self.ptr.as_ptr().add(self.len)))
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// 带边界检查的访问，越界时返回 [`ArrayError::IndexOutOfRange`]
    pub fn at(&self, index: usize) -> Result<&T, ArrayError> {
        self.get(index).ok_or(ArrayError::IndexOutOfRange {
            index,
            size: self.len,
        })
    }

    /// 不做边界检查的访问
    ///
    /// # Safety
    ///
    /// `index` 必须小于 `self.size()`。
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len, "Index out of bounds");
        unsafe { &*self.ptr.as_ptr().add(index) }
    }

    /// # Safety
    ///
    /// `index` 必须小于 `self.size()`。
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len, "Index out of bounds");
        unsafe { &mut *self.ptr.as_ptr().add(index) }
    }

    /// 元素数少于容量一半时把容量减半（每次调用最多一次），返回是否发生了收缩
    pub fn shrink(&mut self) -> Result<bool, ArrayError> {
        let half = self.cap / 2;
        if self.len >= half {
            return Ok(false);
        }

        let old_cap = self.cap;
        self.reallocate(half)?;
        log::debug!("dynamic array shrunk: {old_cap} -> {half} slots");
        Ok(true)
    }

    /// 复制全部元素到一个容量相同的新数组
    pub fn try_clone(&self) -> Result<Self, ArrayError>
    where
        T: Clone,
    {
        let config = ArrayConfig::new(self.cap).with_policy(self.policy);
        let mut copy = Self::from_config(&config)?;
        for elem in self.iter() {
            copy.push_back(elem.clone())?;
        }
        Ok(copy)
    }

    pub fn as_slice(&self) -> &[T] {
        self
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }

    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    fn grow(&mut self) -> Result<(), ArrayError> {
        let old_cap = self.cap;
        let new_cap = old_cap
            .checked_mul(2)
            .ok_or(ArrayError::CapacityOverflow { requested: old_cap })
            .map_err(|e| self.policy.on_failure(e))?;
        self.reallocate(new_cap)?;
        log::debug!("dynamic array grew: {old_cap} -> {new_cap} slots");
        Ok(())
    }

    fn reallocate(&mut self, new_cap: usize) -> Result<(), ArrayError> {
        self.do_realloc(new_cap).map_err(|e| self.policy.on_failure(e))
    }

    fn do_realloc(&mut self, new_cap: usize) -> Result<(), ArrayError> {
        let old_layout = layout_for::<T>(self.cap)?;
        let new_layout = layout_for::<T>(new_cap)?;

        if new_layout.size() == 0 {
            self.cap = new_cap;
            return Ok(());
        }

        // SAFETY: T 不是零尺寸类型且 cap >= 1，所以 ptr 来自 alloc/realloc 且 old_layout 非零
        let raw = unsafe { realloc(self.ptr.as_ptr().cast::<u8>(), old_layout, new_layout.size()) };

        // realloc 失败时旧内存仍然有效，保持 ptr/cap 不变
        self.ptr = NonNull::new(raw.cast::<T>()).ok_or(ArrayError::OutOfMemory {
            bytes: new_layout.size(),
        })?;
        self.cap = new_cap;
        Ok(())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.deref().iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.deref_mut().iter_mut()
    }
}

impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        log::trace!("dynamic array destroyed: {} elements, capacity {}", self.len, self.cap);
        unsafe {
            // 1. 析构所有有效元素
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.len));
        }
        // 2. 释放内存块
        if let Ok(layout) = layout_for::<T>(self.cap) {
            if layout.size() != 0 {
                unsafe {
                    dealloc(self.ptr.as_ptr().cast::<u8>(), layout);
                }
            }
        }
    }
}

impl<T> Deref for DynamicArray<T> {
    type Target = [T];
    fn deref(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> DerefMut for DynamicArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: fmt::Debug> fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// 迭代器支持
pub struct IntoIter<T> {
    array: mem::ManuallyDrop<DynamicArray<T>>,
    next: usize,
}

impl<T> IntoIterator for DynamicArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            array: mem::ManuallyDrop::new(self),
            next: 0,
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.next == self.array.len {
            None
        } else {
            unsafe {
                // SAFETY: next < len，该元素尚未被读出
                let result = ptr::read(self.array.ptr.as_ptr().add(self.next));
                self.next += 1;
                Some(result)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.array.len - self.next;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        unsafe {
            // 1. 析构剩余未消费的元素
            let remaining = self.array.len - self.next;
            let start = self.array.ptr.as_ptr().add(self.next);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(start, remaining));
            // 2. 已读出的元素不能再次析构，交给 DynamicArray 的 Drop 释放内存块
            self.array.len = 0;
            mem::ManuallyDrop::drop(&mut self.array);
        }
    }
}

// 借用迭代器
impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynamicArray<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests;
