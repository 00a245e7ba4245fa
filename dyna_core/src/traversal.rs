//! [`DynamicArray`] 上基于谓词的遍历
//!
//! 每个操作都有整体版本和 `_range` 版本。`_range` 版本作用于半开区间
//! `[begin, min(end, size))`；当 `begin >= size` 或 `end <= begin` 时，
//! 结果与空数组上的整体版本相同。调用者的上下文通过闭包捕获。

use std::ops::Range;

use crate::DynamicArray;

/// 把 `[begin, end)` 截断到长度为 `size` 的数组上
///
/// 起点越界或区间为空（反向）时返回 `None`
pub fn window(begin: usize, end: usize, size: usize) -> Option<Range<usize>> {
    if begin >= size || end <= begin {
        return None;
    }
    Some(begin..end.min(size))
}

impl<T> DynamicArray<T> {
    fn window_of(&self, begin: usize, end: usize) -> Range<usize> {
        window(begin, end, self.len()).unwrap_or(0..0)
    }

    /// 按下标升序访问每个元素
    pub fn for_each<F>(&mut self, visit: F)
    where
        F: FnMut(&mut T),
    {
        self.iter_mut().for_each(visit);
    }

    pub fn for_each_range<F>(&mut self, begin: usize, end: usize, visit: F)
    where
        F: FnMut(&mut T),
    {
        let range = self.window_of(begin, end);
        self.as_mut_slice()[range].iter_mut().for_each(visit);
    }

    /// 至少一个元素满足 `pred` 时为真，遇到第一个匹配即停止
    pub fn any_of<P>(&self, mut pred: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().any(|elem| pred(elem))
    }

    pub fn any_of_range<P>(&self, begin: usize, end: usize, mut pred: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.as_slice()[self.window_of(begin, end)].iter().any(|elem| pred(elem))
    }

    /// 所有元素都满足 `pred` 时为真，空数组为真
    pub fn all_of<P>(&self, mut pred: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().all(|elem| pred(elem))
    }

    pub fn all_of_range<P>(&self, begin: usize, end: usize, mut pred: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.as_slice()[self.window_of(begin, end)].iter().all(|elem| pred(elem))
    }

    /// 没有元素满足 `pred` 时为真，空数组为真
    pub fn none_of<P>(&self, pred: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        !self.any_of(pred)
    }

    pub fn none_of_range<P>(&self, begin: usize, end: usize, pred: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        !self.any_of_range(begin, end, pred)
    }

    /// 第一个满足 `pred` 的元素下标
    pub fn position_if<P>(&self, mut pred: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().position(|elem| pred(elem))
    }

    /// 区间内第一个满足 `pred` 的元素在整个数组中的下标
    pub fn position_if_range<P>(&self, begin: usize, end: usize, mut pred: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        let range = self.window_of(begin, end);
        let offset = range.start;
        self.as_slice()[range].iter().position(|elem| pred(elem)).map(|i| i + offset)
    }

    /// 按下标升序找到的第一个满足 `pred` 的元素
    pub fn find_if<P>(&self, mut pred: P) -> Option<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().find(|elem| pred(elem))
    }

    pub fn find_if_range<P>(&self, begin: usize, end: usize, mut pred: P) -> Option<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.as_slice()[self.window_of(begin, end)].iter().find(|elem| pred(elem))
    }

    pub fn find_if_mut<P>(&mut self, pred: P) -> Option<&mut T>
    where
        P: FnMut(&T) -> bool,
    {
        let index = self.position_if(pred)?;
        self.get_mut(index)
    }

    pub fn find_if_range_mut<P>(&mut self, begin: usize, end: usize, pred: P) -> Option<&mut T>
    where
        P: FnMut(&T) -> bool,
    {
        let index = self.position_if_range(begin, end, pred)?;
        self.get_mut(index)
    }
}
