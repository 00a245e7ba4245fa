use thiserror::Error;

/// [`DynamicArray`](crate::DynamicArray) 报告的错误
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayError {
    /// 分配器无法提供所需的内存块
    #[error("failed to allocate {bytes} bytes of backing storage")]
    OutOfMemory {
        /// 请求的字节数
        bytes: usize,
    },

    /// 请求的槽位数无法构成合法的内存布局
    #[error("capacity overflow: {requested} slots cannot be laid out")]
    CapacityOverflow {
        /// 请求的槽位数
        requested: usize,
    },

    /// 带检查的访问超出了逻辑长度
    #[error("index out of range: index {index}, size {size}")]
    IndexOutOfRange {
        /// 访问的下标
        index: usize,
        /// 访问时的逻辑长度
        size: usize,
    },
}
