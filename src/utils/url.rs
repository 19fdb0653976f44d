//! URL 解析工具
//!
//! 将页面中出现的（可能是相对的）引用解析为基于页面地址的绝对URL。
//! 解析遵循 WHATWG URL 标准（`url` crate），不访问网络。

pub use url::Url;

/// 解析基础URL
///
/// 输入两端的空白会被忽略；无法解析时返回 `None`。
pub fn parse_base_url(base_url: &str) -> Option<Url> {
    Url::parse(base_url.trim()).ok()
}

/// 判断字符串是否是带协议的绝对URL
pub fn is_url_and_has_protocol(input: &str) -> bool {
    match Url::parse(input) {
        Ok(parsed_url) => !parsed_url.scheme().is_empty(),
        Err(_) => false,
    }
}

/// Resolves `reference` against `base` and returns the absolute form.
///
/// Absolute references come back normalized, scheme-relative ones inherit the
/// base scheme, and path, query or fragment references resolve against the
/// full base. Anything the URL parser rejects is returned unchanged.
pub fn resolve_url(base: &Url, reference: &str) -> String {
    match base.join(reference) {
        Ok(resolved) => resolved.to_string(),
        Err(e) => {
            tracing::trace!(reference, error = %e, "keeping unresolvable reference");
            reference.to_string()
        }
    }
}
