//! 重写规则表
//!
//! 每条规则对应一种携带URL的HTML构造，按固定顺序依次作用于整个文档，
//! 后一条规则看到的是前一条规则的输出。

use regex::Regex;
use url::Url;

use super::attribute::{rewrite_tags, tag_selector, AttributeMatcher, TAG_BODY};
use super::entities::{EntityRegex, PatternCache, PatternError};
use super::inline::{Directive, DirectiveMatcher, CSS_URL, REFRESH_URL};
use crate::utils::url::resolve_url;

/// 规则重写的目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// 整个属性值就是URL
    Attribute(&'static str),
    /// URL嵌在属性值里
    Directive(&'static str, Directive),
    /// URL嵌在 `<style>` 块的内容里
    StyleBlock(Directive),
}

/// 规则生效的前提：某属性的值（允许实体混淆）等于给定关键字
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guard {
    pub attribute: &'static str,
    pub keyword: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteRule {
    pub name: &'static str,
    /// `None` 表示任意元素
    pub element: Option<&'static str>,
    pub guard: Option<Guard>,
    pub target: Target,
}

pub static RULE_TABLE: &[RewriteRule] = &[
    // <meta http-equiv=refresh content="5; url=...">
    RewriteRule {
        name: "meta-refresh",
        element: Some("meta"),
        guard: Some(Guard {
            attribute: "http-equiv",
            keyword: "refresh",
        }),
        target: Target::Directive("content", REFRESH_URL),
    },
    // Linked elements
    RewriteRule {
        name: "href",
        element: None,
        guard: None,
        target: Target::Attribute("href"),
    },
    // Embedded elements
    RewriteRule {
        name: "src",
        element: None,
        guard: None,
        target: Target::Attribute("src"),
    },
    RewriteRule {
        name: "object-data",
        element: Some("object"),
        guard: None,
        target: Target::Attribute("data"),
    },
    RewriteRule {
        name: "applet-codebase",
        element: Some("applet"),
        guard: None,
        target: Target::Attribute("codebase"),
    },
    // <param name=movie value=...>
    RewriteRule {
        name: "param-movie",
        element: Some("param"),
        guard: Some(Guard {
            attribute: "name",
            keyword: "movie",
        }),
        target: Target::Attribute("value"),
    },
    RewriteRule {
        name: "style-block",
        element: Some("style"),
        guard: None,
        target: Target::StyleBlock(CSS_URL),
    },
    // < style=" url(...) " >
    RewriteRule {
        name: "style-attribute",
        element: None,
        guard: None,
        target: Target::Directive("style", CSS_URL),
    },
];

/// Errors raised while compiling a rule's patterns.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("selector: {0}")]
    Selector(#[from] regex::Error),
    #[error("pattern: {0}")]
    Pattern(#[from] PatternError),
}

impl RewriteRule {
    /// Runs this rule over the whole document.
    pub fn apply(
        &self,
        document: &str,
        base: &Url,
        cache: &mut PatternCache,
    ) -> Result<String, RuleError> {
        match self.target {
            Target::StyleBlock(directive) => {
                let directives = DirectiveMatcher::new(cache, directive)?;
                rewrite_style_blocks(document, base, &directives)
            }
            Target::Attribute(attribute) => {
                let (selector, guard) = self.tag_matchers(cache)?;
                let values = AttributeMatcher::new(cache, attribute)?;

                Ok(rewrite_tags(document, &selector, |tag| {
                    if !admits(&guard, tag) {
                        return tag.to_string();
                    }
                    values.rewrite_values(tag, |value| {
                        if value.trim().is_empty() {
                            return None;
                        }
                        let absolute = resolve_url(base, value);
                        tracing::trace!(rule = self.name, reference = value, absolute = %absolute);
                        Some(absolute)
                    })
                }))
            }
            Target::Directive(attribute, directive) => {
                let (selector, guard) = self.tag_matchers(cache)?;
                let values = AttributeMatcher::new(cache, attribute)?;
                let directives = DirectiveMatcher::new(cache, directive)?;

                Ok(rewrite_tags(document, &selector, |tag| {
                    if !admits(&guard, tag) {
                        return tag.to_string();
                    }
                    values.rewrite_values(tag, |value| Some(directives.rewrite(value, base)))
                }))
            }
        }
    }

    fn tag_matchers(
        &self,
        cache: &mut PatternCache,
    ) -> Result<(Regex, Option<GuardMatcher>), RuleError> {
        let selector = tag_selector(self.element)?;
        let guard = match self.guard {
            Some(guard) => Some(GuardMatcher::new(cache, guard)?),
            None => None,
        };
        Ok((selector, guard))
    }
}

fn admits(guard: &Option<GuardMatcher>, tag: &str) -> bool {
    guard.as_ref().map_or(true, |guard| guard.admits(tag))
}

struct GuardMatcher {
    attribute: AttributeMatcher,
    keyword: EntityRegex,
}

impl GuardMatcher {
    fn new(cache: &mut PatternCache, guard: Guard) -> Result<Self, PatternError> {
        let whitespace = cache.whitespace();
        let keyword = format!("{whitespace}{}{whitespace}", cache.fragment(guard.keyword));

        Ok(Self {
            attribute: AttributeMatcher::new(cache, guard.attribute)?,
            keyword: EntityRegex::new(&keyword)?,
        })
    }

    /// 属性的整个值（两侧空白除外）必须是关键字
    fn admits(&self, tag: &str) -> bool {
        self.attribute
            .first_value(tag)
            .is_some_and(|value| self.keyword.match_at(value, 0) == Some(value.len()))
    }
}

/// `<style>` 的内容到第一个 `</style` 为止，没有结束标签时到文档末尾
fn style_block_selector() -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r#"(?is)(?P<open><style\b{TAG_BODY}>)(?P<body>.*?)(?P<close></style|$)"#
    ))
}

fn rewrite_style_blocks(
    document: &str,
    base: &Url,
    directives: &DirectiveMatcher,
) -> Result<String, RuleError> {
    let selector = style_block_selector()?;

    Ok(selector
        .replace_all(document, |caps: &regex::Captures| {
            format!(
                "{}{}{}",
                &caps["open"],
                directives.rewrite(&caps["body"], base),
                &caps["close"]
            )
        })
        .into_owned())
}
