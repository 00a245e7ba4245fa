use crate::ArrayError;

/// 存储无法分配或调整大小时 [`DynamicArray`](crate::DynamicArray) 的处理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AllocPolicy {
    /// 以 [`ArrayError`] 的形式把失败交还给调用者
    #[default]
    Propagate,
    /// 打印诊断信息后终止进程
    Abort,
}

impl AllocPolicy {
    /// 按策略处理一次存储失败，只有 `Propagate` 会返回
    pub(crate) fn on_failure(self, err: ArrayError) -> ArrayError {
        match self {
            AllocPolicy::Propagate => {
                log::warn!("dynamic array: {err}");
                err
            }
            AllocPolicy::Abort => {
                log::error!("dynamic array: {err}, aborting");
                eprintln!("CRITICAL ERROR: dynamic array: {err}, aborting!");
                std::process::abort()
            }
        }
    }
}

/// 构造 [`DynamicArray`](crate::DynamicArray) 的参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayConfig {
    /// 初始槽位数，0 会被当作 1
    pub prealloc: usize,
    /// 存储失败时的处理策略
    pub policy: AllocPolicy,
}

impl ArrayConfig {
    pub fn new(prealloc: usize) -> Self {
        Self {
            prealloc,
            policy: AllocPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: AllocPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 构造时实际分配的槽位数
    pub fn initial_capacity(&self) -> usize {
        self.prealloc.max(1)
    }
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self::new(1)
    }
}
