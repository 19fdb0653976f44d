//! # Absoluter Library
//!
//! 抓取网页并把其中所有相对URL引用改写为绝对URL，使标记脱离原站点后
//! 仍然可用。
//!
//! ## 模块组织
//!
//! - `core` - 错误类型、选项和抓取流水线
//! - `parsers` - HTML规范化与链接重写
//! - `network` - 页面抓取
//! - `utils` - URL工具函数
//! - `env` - 环境变量配置

pub mod core;
pub mod env;
pub mod network;
pub mod parsers;
pub mod utils;

// Re-export commonly used items for convenience
pub use core::*;
pub use network::*;
pub use parsers::*;
pub use utils::*;
