use std::io;

use encoding_rs::Encoding;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// 将 HTML 字节按给定编码解码后解析为 DOM
///
/// 无法识别的编码名按 UTF-8 处理，非法字节被替换而不是报错。
pub fn html_to_dom(data: &[u8], document_encoding: &str) -> io::Result<RcDom> {
    let text = match Encoding::for_label(document_encoding.as_bytes()) {
        Some(encoding) => encoding.decode(data).0,
        None => String::from_utf8_lossy(data),
    };

    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut text.as_bytes())
}

/// 查找指定路径的DOM节点
///
/// `node_names` 描述一条元素名路径，例如 `["html", "head", "meta"]`；
/// 路径中相邻的元素不必是直接父子关系。
pub fn find_nodes(node: &Handle, node_names: &[&str]) -> Vec<Handle> {
    let Some((&node_name, rest)) = node_names.split_first() else {
        return Vec::new();
    };

    let mut found_nodes = Vec::new();
    let is_match = matches!(node.data, NodeData::Element { ref name, .. } if &*name.local == node_name);

    if is_match && rest.is_empty() {
        found_nodes.push(node.clone());
    } else if is_match {
        found_nodes.append(&mut find_nodes(node, rest));
        return found_nodes;
    }

    for child_node in node.children.borrow().iter() {
        found_nodes.append(&mut find_nodes(child_node, node_names));
    }

    found_nodes
}

/// 根据名称获取子节点
pub fn get_child_node_by_name(parent: &Handle, node_name: &str) -> Option<Handle> {
    parent
        .children
        .borrow()
        .iter()
        .find(|child| matches!(child.data, NodeData::Element { ref name, .. } if &*name.local == node_name))
        .cloned()
}

/// 获取节点属性值
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == attr_name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}
