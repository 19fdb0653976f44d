use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use markup5ever_rcdom::{RcDom, SerializableHandle};

use crate::core::ScrapeError;

use super::dom::get_child_node_by_name;

/// 序列化文档根元素 `<html>` 的内容（不含 `<html>` 标签本身）
///
/// 输出总是 UTF-8。解析器总会补全 `<html>`，找不到时退回整个文档。
pub fn serialize_document_element(dom: &RcDom) -> Result<String, ScrapeError> {
    let mut buf: Vec<u8> = Vec::new();

    let (handle, opts) = match get_child_node_by_name(&dom.document, "html") {
        Some(html) => (
            html,
            SerializeOpts {
                traversal_scope: TraversalScope::ChildrenOnly(None),
                ..Default::default()
            },
        ),
        None => (dom.document.clone(), SerializeOpts::default()),
    };

    let serializable: SerializableHandle = handle.into();
    serialize(&mut buf, &serializable, opts)
        .map_err(|e| ScrapeError::Normalize(format!("unable to serialize DOM: {e}")))?;

    String::from_utf8(buf).map_err(|e| ScrapeError::Normalize(e.to_string()))
}
