//! # 解析器模块
//!
//! - `html` - 响应体规范化：解码、DOM解析、序列化
//! - `link_rewriter` - 链接重写，把标记中的相对URL转换为绝对URL

pub mod html;
pub mod link_rewriter;

// Re-export commonly used items for convenience
pub use html::{Html5everNormalizer, Normalizer};
pub use link_rewriter::{replace_all_rel_by_abs, rewrite_relative_urls};
