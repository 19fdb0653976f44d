//! # 工具模块
//!
//! 这个模块包含各种工具函数和实用程序：
//!
//! - URL解析与相对地址解析
//!
//! # 模块组织
//!
//! - `url` - 基础URL解析、相对引用到绝对地址的转换

pub mod url;

// Re-export commonly used items for convenience
pub use url::{is_url_and_has_protocol, parse_base_url, resolve_url, Url};
