//! 内联指令重写
//!
//! 有些URL不是整个属性值，而是嵌在值里的一段：`style` 里的 `url(...)`，
//! `<meta http-equiv="refresh">` 的 `content` 里的 `url=...`，以及
//! `<style>` 块中的 `url(...)`。这里负责在一段值中找出这些子值并替换。

use std::ops::Range;

use url::Url;

use super::entities::{next_char_boundary, EntityRegex, PatternCache, PatternError};
use crate::utils::url::resolve_url;

/// 带标签的子值，例如 `url(` ... `)` 或 `url=` ...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive {
    pub keyword: &'static str,
    pub opener: char,
    /// 没有结束符时子值一直延伸到所在行的末尾
    pub terminator: Option<char>,
}

/// CSS `url(...)`
pub const CSS_URL: Directive = Directive {
    keyword: "url",
    opener: '(',
    terminator: Some(')'),
};

/// `<meta http-equiv="refresh" content="5; url=...">`
pub const REFRESH_URL: Directive = Directive {
    keyword: "url",
    opener: '=',
    terminator: None,
};

/// 关键字前不能紧跟的CSS标识符字符（`myurl(` 不是 `url(`）
fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_')
}

/// Locates and rewrites the sub-values of one [`Directive`].
///
/// The keyword and its opener are located with [`EntityRegex`]; the value
/// after them is read by hand, so a sub-value of any length (an inline
/// `data:` URI, say) costs one linear pass.
#[derive(Debug)]
pub struct DirectiveMatcher {
    /// 关键字、开始符及其后的空白
    head: EntityRegex,
    /// 结束符本身，以及值之后的空白加结束符
    terminator: Option<(EntityRegex, EntityRegex)>,
    slash: EntityRegex,
    dot: EntityRegex,
}

/// 一个子值及其所在匹配的结尾
struct SubValue {
    value: Range<usize>,
    end: usize,
}

impl DirectiveMatcher {
    pub fn new(cache: &mut PatternCache, directive: Directive) -> Result<Self, PatternError> {
        let whitespace = cache.whitespace();
        let keyword = cache.fragment(directive.keyword);
        let opener = cache.char_fragment(directive.opener);

        let terminator = match directive.terminator {
            Some(terminator) => {
                let terminator = cache.char_fragment(terminator);
                Some((
                    EntityRegex::new(&terminator)?,
                    EntityRegex::new(&format!("{whitespace}{terminator}"))?,
                ))
            }
            None => None,
        };

        Ok(Self {
            head: EntityRegex::new(&format!("{keyword}{whitespace}{opener}{whitespace}"))?,
            terminator,
            slash: EntityRegex::new(&cache.char_fragment('/'))?,
            dot: EntityRegex::new(&cache.char_fragment('.'))?,
        })
    }

    /// Resolves every sub-value found in `value` against `base`, leaving the
    /// rest of `value` as it was.
    pub fn rewrite(&self, value: &str, base: &Url) -> String {
        let mut result = String::with_capacity(value.len());
        let mut last_end = 0;
        let mut from = 0;

        while let Some(head) = self.head.find_at(value, from) {
            let after_identifier = value[..head.start]
                .chars()
                .next_back()
                .is_some_and(is_identifier_char);
            let sub_value = if after_identifier {
                None
            } else {
                self.sub_value_at(value, head.end)
            };

            let Some(sub_value) = sub_value else {
                from = next_char_boundary(value, head.start);
                if from > value.len() {
                    break;
                }
                continue;
            };

            let reference = self.canonicalize(&value[sub_value.value.clone()]);
            if !reference.trim().is_empty() {
                let absolute = resolve_url(base, &reference);
                tracing::trace!(
                    reference = %truncated(&reference),
                    absolute = %truncated(&absolute),
                    "inline directive"
                );
                result.push_str(&value[last_end..sub_value.value.start]);
                result.push_str(&absolute);
                last_end = sub_value.value.end;
            }
            from = sub_value.end;
        }

        result.push_str(&value[last_end..]);
        result
    }

    /// 读取从 `at` 开始的子值：双引号、单引号、`&quot;` 或无引号
    fn sub_value_at(&self, value: &str, at: usize) -> Option<SubValue> {
        let rest = &value[at..];

        for quote in ['"', '\''] {
            if let Some(inner) = rest.strip_prefix(quote) {
                let len = inner.find(quote)?;
                let start = at + quote.len_utf8();
                return Some(SubValue {
                    value: start..start + len,
                    end: start + len + quote.len_utf8(),
                });
            }
        }

        // 行内的 &quot;...&quot;；找不到结尾时按无引号值处理
        if starts_with_quot(rest) {
            let inner = &rest[QUOT.len()..];
            let line = &inner[..inner.find('\n').unwrap_or(inner.len())];
            let close = line
                .char_indices()
                .map(|(i, _)| i)
                .find(|&i| starts_with_quot(&line[i..]));
            if let Some(len) = close {
                let start = at + QUOT.len();
                return Some(SubValue {
                    value: start..start + len,
                    end: start + len + QUOT.len(),
                });
            }
        }

        let first = rest.chars().next()?;
        if first.is_whitespace() || first == '"' || first == '\'' {
            return None;
        }
        // 无引号值不能跨行
        let line_end = at + rest.find('\n').unwrap_or(rest.len());

        match &self.terminator {
            None => Some(SubValue {
                value: at..line_end,
                end: line_end,
            }),
            Some((terminator, closing)) => {
                if terminator.match_at(value, at).is_some() {
                    return None;
                }
                let close = closing.find_at(value, at + first.len_utf8())?;
                (close.start <= line_end).then(|| SubValue {
                    value: at..close.start,
                    end: close.start,
                })
            }
        }
    }

    /// 把实体混淆的 `/` 和 `.` 还原为字面字符，否则路径无法正确解析
    fn canonicalize(&self, sub_value: &str) -> String {
        let sub_value = self.slash.replace_all(sub_value, "/");
        self.dot.replace_all(&sub_value, ".")
    }
}

const QUOT: &str = "&quot;";

fn starts_with_quot(text: &str) -> bool {
    text.get(..QUOT.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(QUOT))
}

/// 日志里只保留前面一段，内联的 data: URI 可能有数兆字节
fn truncated(text: &str) -> &str {
    match text.char_indices().nth(120) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
