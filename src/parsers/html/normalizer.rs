use encoding_rs::Encoding;

use crate::core::ScrapeError;

use super::dom::html_to_dom;
use super::metadata::get_charset;
use super::serializer::serialize_document_element;

/// Turns a fetched response body into well-formed markup.
pub trait Normalizer {
    /// `encoding` is the charset announced by the transport, if any.
    fn normalize(&self, body: &[u8], encoding: Option<&str>) -> Result<String, ScrapeError>;
}

/// html5ever 实现：解码、解析、再序列化 `<html>` 元素的内容
///
/// 传输层给出的编码优先；没有时使用文档 `<meta>` 中声明的编码，
/// 都没有时按 UTF-8 处理。
#[derive(Debug, Default, Clone, Copy)]
pub struct Html5everNormalizer;

impl Normalizer for Html5everNormalizer {
    fn normalize(&self, body: &[u8], encoding: Option<&str>) -> Result<String, ScrapeError> {
        let transport_encoding = encoding.and_then(known_encoding);
        let document_encoding = transport_encoding.unwrap_or("utf-8");

        let mut dom = html_to_dom(body, document_encoding)
            .map_err(|e| ScrapeError::Normalize(e.to_string()))?;

        if transport_encoding.is_none() {
            if let Some(declared) = get_charset(&dom.document) {
                if let Some(declared) = known_encoding(&declared) {
                    if !declared.eq_ignore_ascii_case(document_encoding) {
                        tracing::debug!(charset = declared, "re-decoding with declared charset");
                        dom = html_to_dom(body, declared)
                            .map_err(|e| ScrapeError::Normalize(e.to_string()))?;
                    }
                }
            }
        }

        serialize_document_element(&dom)
    }
}

/// 返回能被识别的编码名，`replacement` 编码不算
fn known_encoding(label: &str) -> Option<&str> {
    let label = label.trim();
    Encoding::for_label_no_replacement(label.as_bytes()).map(|_| label)
}
