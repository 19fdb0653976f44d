//! 文档元数据
//!
//! 目前只需要文档自身声明的字符编码。

use markup5ever_rcdom::Handle;

use crate::core::parse_charset;

use super::dom::{find_nodes, get_node_attr};

/// 获取文档声明的字符编码
///
/// 依次检查 `<head>` 中的 `<meta>`，第一个 `<meta charset>` 或
/// `<meta http-equiv="content-type">` 决定结果。
pub fn get_charset(node: &Handle) -> Option<String> {
    for meta_node in find_nodes(node, &["html", "head", "meta"]).iter() {
        if let Some(charset) = get_node_attr(meta_node, "charset") {
            return Some(charset.trim().to_string());
        }

        let is_content_type = get_node_attr(meta_node, "http-equiv")
            .is_some_and(|equiv| equiv.trim().eq_ignore_ascii_case("content-type"));

        if is_content_type {
            if let Some(content) = get_node_attr(meta_node, "content") {
                return parse_charset(&content);
            }
        }
    }

    None
}
