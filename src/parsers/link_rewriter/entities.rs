//! 实体模式编译器
//!
//! 为单个字符生成正则片段：既匹配字符本身，也匹配它的十进制、十六进制
//! HTML 数字字符引用（大小写不敏感，分号可省略）。被实体编码混淆过的标记
//! （例如 `url&#40;...&#41;`）因此可以和字面写法一样被识别。
//!
//! 片段只在一次重写调用内缓存，调用结束后随 [`PatternCache`] 一起释放。
//!
//! 由片段拼成的模式用 [`EntityRegex`] 编译：在整段文本上只运行线性的
//! `regex` 引擎，回溯引擎只用来确认候选位置附近的一小段。

use std::collections::HashMap;
use std::ops::Range;

use fancy_regex::Regex as FancyRegex;
use regex::Regex;

/// 实体结尾：要么是分号，要么后面不再跟数字（`&#65` 不能吞掉 `&#651` 的 `1`）
macro_rules! entity_end {
    () => {
        r"(?:;|(?!\d))"
    };
}

/// 常用字符的预置片段
///
/// 空格额外接受任意空白和 `&nbsp;`。
const KNOWN_FRAGMENTS: &[(char, &str)] = &[
    (
        ' ',
        concat!(
            r"(?:\s|&nbsp;?|&#0*32",
            entity_end!(),
            r"|&#x0*20",
            entity_end!(),
            ")"
        ),
    ),
    (
        '(',
        concat!(r"(?:\(|&#0*40", entity_end!(), r"|&#x0*28", entity_end!(), ")"),
    ),
    (
        ')',
        concat!(r"(?:\)|&#0*41", entity_end!(), r"|&#x0*29", entity_end!(), ")"),
    ),
    (
        '.',
        concat!(r"(?:\.|&#0*46", entity_end!(), r"|&#x0*2e", entity_end!(), ")"),
    ),
    (
        '/',
        concat!(r"(?:/|&#0*47", entity_end!(), r"|&#x0*2f", entity_end!(), ")"),
    ),
];

/// 单次重写调用内的模式片段缓存
///
/// The cache is a plain owned value: every call of the rewrite engine builds
/// its own and nothing is shared between calls.
#[derive(Debug, Default)]
pub struct PatternCache {
    chars: HashMap<char, String>,
    literals: HashMap<String, String>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fragment matching `literal` where every character may also be
    /// written as a numeric character reference.
    ///
    /// The fragment assumes the enclosing pattern is compiled with `(?i)`.
    pub fn fragment(&mut self, literal: &str) -> String {
        if let Some(fragment) = self.literals.get(literal) {
            return fragment.clone();
        }

        let mut fragment = String::new();
        for c in literal.chars() {
            fragment.push_str(&self.char_fragment(c));
        }

        self.literals.insert(literal.to_string(), fragment.clone());
        fragment
    }

    /// 单个字符的片段；优先使用预置表，其余字符按需构造
    pub fn char_fragment(&mut self, c: char) -> String {
        if let Some((_, fragment)) = KNOWN_FRAGMENTS.iter().find(|(known, _)| *known == c) {
            return fragment.to_string();
        }

        let key = single_char(c.to_lowercase()).unwrap_or(c);
        self.chars
            .entry(key)
            .or_insert_with(|| compile_char_fragment(key))
            .clone()
    }

    /// 可被实体混淆的任意长度空白
    pub fn whitespace(&mut self) -> String {
        format!("{}*", self.char_fragment(' '))
    }

    /// 已缓存的片段数量
    pub fn len(&self) -> usize {
        self.chars.len() + self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn compile_char_fragment(c: char) -> String {
    let mut alternatives = vec![regex::escape(c.encode_utf8(&mut [0; 4]))];
    push_entity_forms(&mut alternatives, c);

    let lowercase = single_char(c.to_lowercase()).unwrap_or(c);
    let uppercase = single_char(c.to_uppercase()).unwrap_or(c);
    if lowercase != uppercase {
        // 字面量由 (?i) 覆盖，实体形式需要两种大小写的码位
        let other = if c == lowercase { uppercase } else { lowercase };
        push_entity_forms(&mut alternatives, other);
    }

    format!("(?:{})", alternatives.join("|"))
}

fn push_entity_forms(alternatives: &mut Vec<String>, c: char) {
    let codepoint = c as u32;
    alternatives.push(format!("&#0*{}{}", codepoint, entity_end!()));
    alternatives.push(format!("&#x0*{:x}{}", codepoint, entity_end!()));
}

fn single_char(mut chars: impl Iterator<Item = char>) -> Option<char> {
    let first = chars.next()?;
    match chars.next() {
        Some(_) => None,
        None => Some(first),
    }
}

/// Errors raised while compiling an [`EntityRegex`].
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("locator: {0}")]
    Locator(#[from] regex::Error),
    #[error("exact: {0}")]
    Exact(#[from] fancy_regex::Error),
}

/// A pattern assembled from [`PatternCache`] fragments, safe to run over
/// documents of any size.
///
/// `(?!\d)` after an entity needs lookaround, which only the backtracking
/// engine has, and that engine gives up on long inputs. So the pattern is
/// compiled twice:
///
/// - a locator for the linear `regex` engine, where the entity end is relaxed
///   to `;?` (it matches everything the exact pattern matches, and a little
///   more)
/// - the exact pattern, anchored, which only ever runs on the span the locator
///   reported plus one character of lookahead
///
/// The pattern must not contain any other lookaround and is always
/// case-insensitive.
#[derive(Debug)]
pub struct EntityRegex {
    locator: Regex,
    anchored: Regex,
    exact: FancyRegex,
}

impl EntityRegex {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let relaxed = relax(pattern);

        Ok(Self {
            locator: Regex::new(&format!("(?i){relaxed}"))?,
            anchored: Regex::new(&format!("(?i)^(?:{relaxed})"))?,
            exact: FancyRegex::new(&format!("(?i)^(?:{pattern})"))?,
        })
    }

    /// 从 `start` 起第一个确切匹配的位置
    pub fn find_at(&self, haystack: &str, start: usize) -> Option<Range<usize>> {
        let mut from = start;

        while let Some(candidate) = self.locator.find_at(haystack, from) {
            if let Some(len) = self.confirm(haystack, candidate.start(), candidate.end()) {
                return Some(candidate.start()..candidate.start() + len);
            }
            if candidate.start() >= haystack.len() {
                break;
            }
            from = next_char_boundary(haystack, candidate.start());
        }

        None
    }

    /// End of the exact match starting precisely at `at`, if there is one
    pub fn match_at(&self, haystack: &str, at: usize) -> Option<usize> {
        let candidate = self.anchored.find(haystack.get(at..)?)?;
        self.confirm(haystack, at, at + candidate.end())
            .map(|len| at + len)
    }

    /// Replaces every exact match in `haystack` with `replacement`.
    pub fn replace_all(&self, haystack: &str, replacement: &str) -> String {
        let mut result = String::with_capacity(haystack.len());
        let mut last_end = 0;
        let mut from = 0;

        while let Some(found) = self.find_at(haystack, from) {
            result.push_str(&haystack[last_end..found.start]);
            result.push_str(replacement);
            last_end = found.end;
            from = if found.is_empty() {
                next_char_boundary(haystack, found.end)
            } else {
                found.end
            };
            if from > haystack.len() {
                break;
            }
        }

        result.push_str(&haystack[last_end..]);
        result
    }

    /// 在候选区间（外加一个字符供 `(?!\d)` 检查）上运行确切模式
    fn confirm(&self, haystack: &str, start: usize, end: usize) -> Option<usize> {
        let window = &haystack[start..next_char_boundary(haystack, end).min(haystack.len())];

        match self.exact.find(window) {
            Ok(found) => found.map(|m| m.end()),
            Err(e) => {
                tracing::warn!(error = %e, "entity pattern check failed");
                None
            }
        }
    }
}

/// 去掉实体结尾的数字前瞻，使模式能由线性的 `regex` 引擎编译
///
/// 结果匹配的文本是原模式的超集。
pub fn relax(pattern: &str) -> String {
    pattern.replace(entity_end!(), ";?")
}

/// 下一个字符的起始字节位置；已在末尾时返回 `text.len() + 1`
pub(crate) fn next_char_boundary(text: &str, at: usize) -> usize {
    match text.get(at..).and_then(|rest| rest.chars().next()) {
        Some(c) => at + c.len_utf8(),
        None => text.len() + 1,
    }
}
