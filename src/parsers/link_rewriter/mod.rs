//! 链接重写模块
//!
//! 把HTML标记中所有相对URL引用重写为基于页面地址的绝对URL，使标记脱离
//! 原站点后仍可使用。实现不依赖结构化的HTML解析器，而是分层组合的模式
//! 匹配：
//!
//! - `entities` - 实体模式编译器，容忍数字字符引用形式的混淆
//! - `attribute` - 整个属性值即URL的重写（`href`、`src` 等）
//! - `inline` - 嵌在值中的URL（`url(...)`、`url=...`）
//! - `rules` - 按固定顺序执行的规则表
//!
//! 入口是 [`replace_all_rel_by_abs`]，它是 (基础URL, 标记) 的纯函数，
//! 永远不会失败：最坏情况下只是保留部分未重写的文本。

pub mod attribute;
pub mod entities;
pub mod inline;
pub mod rules;

use url::Url;

use crate::utils::url::parse_base_url;

pub use entities::{EntityRegex, PatternCache};
pub use rules::{RewriteRule, RULE_TABLE};

/// Rewrites every relative URL reference in `html` into an absolute URL
/// resolved against `base_url`.
///
/// Total by construction: an unparsable base URL, a rule whose patterns fail
/// or a match that cannot be resolved all leave the affected text unchanged.
///
/// # Examples
///
/// ```
/// use absoluter::replace_all_rel_by_abs;
///
/// let html = r#"<a href="x.html">x</a>"#;
/// assert_eq!(
///     replace_all_rel_by_abs("http://a.com/dir/page.html", html),
///     r#"<a href="http://a.com/dir/x.html">x</a>"#
/// );
/// ```
pub fn replace_all_rel_by_abs(base_url: &str, html: &str) -> String {
    match parse_base_url(base_url) {
        Some(base) => rewrite_relative_urls(&base, html),
        None => {
            tracing::warn!(base_url, "base URL is not absolute, leaving markup as is");
            html.to_string()
        }
    }
}

/// [`replace_all_rel_by_abs`] for an already parsed base URL.
pub fn rewrite_relative_urls(base: &Url, html: &str) -> String {
    let mut cache = PatternCache::new();
    let mut document = html.to_string();

    for rule in RULE_TABLE {
        match rule.apply(&document, base, &mut cache) {
            Ok(rewritten) => {
                if rewritten != document {
                    tracing::debug!(rule = rule.name, "rule rewrote document");
                }
                document = rewritten;
            }
            Err(e) => {
                tracing::warn!(rule = rule.name, error = %e, "skipping rule");
            }
        }
    }

    tracing::trace!(patterns = cache.len(), "pattern cache released");
    document
}
