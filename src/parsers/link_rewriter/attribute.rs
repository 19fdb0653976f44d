//! 属性重写
//!
//! 在文档中按选择器找出元素的开始标签，再在标签内部定位指定属性的值，
//! 用解析后的绝对URL替换它。引号风格和标签中的其他文本保持原样。

use std::ops::Range;

use regex::Regex;

use super::entities::{next_char_boundary, relax, EntityRegex, PatternCache, PatternError};

/// 标签名之后、结束的 `>` 之前的内容
pub(super) const TAG_BODY: &str = r#"(?:[^>"'=]|=\s*"[^"]*"|=\s*'[^']*'|["'=])*"#;

/// 属性名字符；目标属性名前不能紧跟这些字符
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | ':' | '.' | '_')
}

/// Builds the document-wide selector for opening tags of `element`
/// (any element when `None`).
///
/// A quote only opens a string right after `=`, the way an HTML tokenizer
/// reads attribute values, and such a string may contain `>`. Any other quote
/// (`alt=it's`) is plain text, so the tag ends at the next `>`.
pub fn tag_selector(element: Option<&str>) -> Result<Regex, regex::Error> {
    let name = match element {
        Some(element) => format!(r"{}\b", regex::escape(element)),
        None => r#"[a-z][^\s/>"']*"#.to_string(),
    };

    Regex::new(&format!(r#"(?i)<{name}{TAG_BODY}>"#))
}

/// Applies `rewrite_tag` to every tag matched by `selector`.
pub fn rewrite_tags<F>(document: &str, selector: &Regex, mut rewrite_tag: F) -> String
where
    F: FnMut(&str) -> String,
{
    selector
        .replace_all(document, |caps: &regex::Captures| rewrite_tag(&caps[0]))
        .into_owned()
}

/// 标签中一个属性值的位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSpan {
    /// 值本身，不含引号
    pub value: Range<usize>,
    /// 整个属性（含结束引号）之后的位置
    pub end: usize,
}

/// 标签内单个属性的匹配器
///
/// 扫描自左向右进行，其他属性的引号值作为整体被跳过，
/// 因此出现在别的属性值里的 `src=...` 之类文本不会被误认。
#[derive(Debug)]
pub struct AttributeMatcher {
    tokens: Regex,
    head: EntityRegex,
}

impl AttributeMatcher {
    pub fn new(cache: &mut PatternCache, name: &str) -> Result<Self, PatternError> {
        let whitespace = cache.whitespace();
        let equals = cache.fragment("=");
        let name = regex::escape(name);

        // 引号值优先于属性名，同一个值只会被处理一次
        let tokens = Regex::new(&format!(
            r#"(?i){quoted}(?:"[^"]*"|'[^']*')|(?P<name>{name})"#,
            quoted = relax(&format!("{equals}{whitespace}")),
        ))?;

        Ok(Self {
            tokens,
            head: EntityRegex::new(&format!("{name}{whitespace}{equals}{whitespace}"))?,
        })
    }

    /// 从 `from` 起该属性下一次出现的值
    pub fn next_value(&self, tag: &str, from: usize) -> Option<ValueSpan> {
        let mut at = from;

        while let Some(caps) = self.tokens.captures_at(tag, at) {
            let token = caps.get(0)?;
            let Some(name) = caps.name("name") else {
                at = token.end();
                continue;
            };

            let follows_name_char = tag[..name.start()]
                .chars()
                .next_back()
                .is_some_and(is_name_char);
            if !follows_name_char {
                let span = self
                    .head
                    .match_at(tag, name.start())
                    .and_then(|value_start| value_at(tag, value_start));
                if span.is_some() {
                    return span;
                }
            }

            at = next_char_boundary(tag, name.start());
            if at > tag.len() {
                break;
            }
        }

        None
    }

    /// 标签中该属性第一次出现时的原始值
    pub fn first_value<'t>(&self, tag: &'t str) -> Option<&'t str> {
        self.next_value(tag, 0).map(|span| &tag[span.value])
    }

    /// Replaces every value of the attribute in `tag` for which `rewrite_value`
    /// returns `Some`.
    pub fn rewrite_values<F>(&self, tag: &str, mut rewrite_value: F) -> String
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut result = String::with_capacity(tag.len());
        let mut last_end = 0;
        let mut from = 0;

        while let Some(span) = self.next_value(tag, from) {
            if let Some(replacement) = rewrite_value(&tag[span.value.clone()]) {
                result.push_str(&tag[last_end..span.value.start]);
                result.push_str(&replacement);
                last_end = span.value.end;
            }
            from = span.end;
        }

        result.push_str(&tag[last_end..]);
        result
    }
}

/// 解析从 `at` 开始的属性值：双引号、单引号或无引号
fn value_at(tag: &str, at: usize) -> Option<ValueSpan> {
    let rest = &tag[at..];

    for quote in ['"', '\''] {
        if let Some(inner) = rest.strip_prefix(quote) {
            let len = inner.find(quote)?;
            let start = at + quote.len_utf8();
            return Some(ValueSpan {
                value: start..start + len,
                end: start + len + quote.len_utf8(),
            });
        }
    }

    let len = rest
        .find(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '>'))
        .unwrap_or(rest.len());
    (len > 0).then(|| ValueSpan {
        value: at..at + len,
        end: at + len,
    })
}
