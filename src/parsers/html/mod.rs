//! HTML规范化模块
//!
//! 把抓取到的响应体解析为DOM，再序列化为格式良好的标记，
//! 供链接重写使用：
//!
//! - `dom`: 解码与基础DOM操作
//! - `metadata`: 文档声明的元数据（字符编码）
//! - `serializer`: 序列化功能
//! - `normalizer`: `Normalizer` 接口及 html5ever 实现

pub mod dom;
pub mod metadata;
pub mod normalizer;
pub mod serializer;

pub use dom::{find_nodes, get_child_node_by_name, get_node_attr, html_to_dom};
pub use metadata::get_charset;
pub use normalizer::{Html5everNormalizer, Normalizer};
pub use serializer::serialize_document_element;
