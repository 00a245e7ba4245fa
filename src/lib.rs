pub mod cli;
pub mod runtime;

// 导出 dyna_core 供 C ABI 和命令行工具使用
pub use dyna_core;
pub use dyna_core::{AllocPolicy, ArrayConfig, ArrayError, DynamicArray};
