use thiserror::Error;
use url::Url;

use crate::env::EnvConfig;
use crate::network::fetcher::{Fetcher, HttpFetcher};
use crate::parsers::html::{Html5everNormalizer, Normalizer};
use crate::parsers::link_rewriter::rewrite_relative_urls;

/// Header that has to be present on a response before it gets rewritten
pub const DEFAULT_REQUIRED_HEADER: &str = "x-frame-options";
pub const DEFAULT_TIMEOUT: u64 = 60;
pub const DEFAULT_USER_AGENT: &str = concat!("absoluter/", env!("CARGO_PKG_VERSION"));

/// Represents errors that can occur while fetching and rewriting a page
///
/// The rewrite engine itself never fails; everything here comes from the
/// collaborators around it.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The target is not an absolute URL
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The request could not be sent or the body could not be read
    #[error("failed to fetch URL: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with anything but 200
    #[error("unexpected response status: {0}")]
    Status(u16),

    /// The body could not be turned into markup
    #[error("failed to normalize document: {0}")]
    Normalize(String),
}

/// Result of a successful pipeline run
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScrapeOutcome {
    /// Normalized markup with every relative reference made absolute
    Rewritten(String),
    /// The response lacked the required header; nothing was rewritten
    Skipped,
}

impl ScrapeOutcome {
    /// The rewritten markup, or an empty string for a skipped page
    pub fn into_string(self) -> String {
        match self {
            ScrapeOutcome::Rewritten(markup) => markup,
            ScrapeOutcome::Skipped => String::new(),
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ScrapeOutcome::Skipped)
    }
}

/// Configuration options for the fetch pipeline
#[derive(Clone, Debug)]
pub struct ScrapeOptions {
    pub insecure: bool,
    /// Response header that must be present; `None` disables the check
    pub required_header: Option<String>,
    pub silent: bool,
    /// Request timeout in seconds, `0` means no timeout
    pub timeout: u64,
    pub user_agent: Option<String>,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            insecure: false,
            required_header: Some(DEFAULT_REQUIRED_HEADER.to_string()),
            silent: false,
            timeout: DEFAULT_TIMEOUT,
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
        }
    }
}

impl ScrapeOptions {
    /// Builds options from environment configuration
    pub fn from_env_config(config: &EnvConfig) -> Self {
        Self {
            insecure: config.insecure,
            required_header: config.required_header.clone(),
            silent: false,
            timeout: config.timeout,
            user_agent: Some(config.user_agent.clone()),
        }
    }
}

/// Fetches `target` and rewrites the relative URLs of its markup
///
/// The response is only processed when it carries the required header
/// (see [`ScrapeOptions::required_header`]); otherwise the outcome is
/// [`ScrapeOutcome::Skipped`]. A response with the header but a status other
/// than 200 is an error. References are resolved against `target` itself,
/// not against the URL the request was redirected to.
pub async fn scrap_content<F, N>(
    fetcher: &F,
    normalizer: &N,
    target: &str,
    options: &ScrapeOptions,
) -> Result<ScrapeOutcome, ScrapeError>
where
    F: Fetcher,
    N: Normalizer,
{
    let target_url = Url::parse(target)?;

    tracing::info!(url = %target_url, "fetching");
    let response = fetcher.fetch(&target_url).await?;

    if let Some(header) = options.required_header.as_deref() {
        if !response.headers.contains_key(header) {
            tracing::warn!(url = %target_url, header, "required header missing, skipping");
            return Ok(ScrapeOutcome::Skipped);
        }
    }

    if response.status != 200 {
        return Err(ScrapeError::Status(response.status));
    }

    let charset = parse_charset(&response.content_type());
    let markup = normalizer.normalize(&response.body, charset.as_deref())?;
    tracing::debug!(bytes = markup.len(), "document normalized");

    let rewritten = rewrite_relative_urls(&target_url, &markup);
    tracing::info!(url = %target_url, "document rewritten");

    Ok(ScrapeOutcome::Rewritten(rewritten))
}

/// [`scrap_content`] with the default HTTP fetcher and html5ever normalizer
pub async fn scrap_url(target: &str, options: &ScrapeOptions) -> Result<ScrapeOutcome, ScrapeError> {
    let fetcher = HttpFetcher::new(options)?;
    scrap_content(&fetcher, &Html5everNormalizer, target, options).await
}

/// Extracts the `charset` parameter of a Content-Type value
///
/// The media type itself is not consulted: whatever the server labels the
/// body, it is handed to the normalizer as markup.
pub fn parse_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|part| part.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|charset| !charset.is_empty())
}
