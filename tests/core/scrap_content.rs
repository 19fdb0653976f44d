#[cfg(test)]
mod support {
    use std::sync::Mutex;

    use absoluter::core::ScrapeError;
    use absoluter::network::{FetchedResponse, Fetcher};
    use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
    use url::Url;

    /// Serves one canned response and records what was requested
    pub struct StaticFetcher {
        pub status: u16,
        pub headers: HeaderMap,
        pub body: Vec<u8>,
        pub requested: Mutex<Vec<Url>>,
    }

    impl StaticFetcher {
        pub fn new(status: u16, body: &[u8]) -> Self {
            let mut headers = HeaderMap::new();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
            headers.insert(
                HeaderName::from_static("x-frame-options"),
                HeaderValue::from_static("SAMEORIGIN"),
            );

            Self {
                status,
                headers,
                body: body.to_vec(),
                requested: Mutex::new(Vec::new()),
            }
        }

        pub fn without_header(mut self, name: &'static str) -> Self {
            self.headers.remove(name);
            self
        }

        pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
            self.headers
                .insert(HeaderName::from_static(name), HeaderValue::from_static(value));
            self
        }

        pub fn requests(&self) -> usize {
            self.requested.lock().unwrap().len()
        }
    }

    impl Fetcher for StaticFetcher {
        async fn fetch(&self, url: &Url) -> Result<FetchedResponse, ScrapeError> {
            self.requested.lock().unwrap().push(url.clone());

            Ok(FetchedResponse {
                status: self.status,
                headers: self.headers.clone(),
                body: self.body.clone(),
            })
        }
    }
}

//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use absoluter::core::{scrap_content, ScrapeOptions, ScrapeOutcome};
    use absoluter::parsers::html::Html5everNormalizer;

    use super::support::StaticFetcher;

    #[tokio::test]
    async fn rewrites_normalized_document() {
        let fetcher = StaticFetcher::new(200, br#"<a href="x.html">x</a>"#);

        let outcome = scrap_content(
            &fetcher,
            &Html5everNormalizer,
            "http://a.com/dir/page.html",
            &ScrapeOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(
            outcome,
            ScrapeOutcome::Rewritten(
                r#"<head></head><body><a href="http://a.com/dir/x.html">x</a></body>"#.to_string()
            )
        );
        assert_eq!(fetcher.requests(), 1);
    }

    #[tokio::test]
    async fn header_gate_can_be_disabled() {
        let fetcher =
            StaticFetcher::new(200, br#"<img src="i.png">"#).without_header("x-frame-options");
        let options = ScrapeOptions {
            required_header: None,
            ..Default::default()
        };

        let outcome = scrap_content(&fetcher, &Html5everNormalizer, "http://a.com/", &options)
            .await
            .unwrap();

        assert_eq!(
            outcome.into_string(),
            r#"<head></head><body><img src="http://a.com/i.png"></body>"#
        );
    }

    #[tokio::test]
    async fn custom_required_header() {
        let fetcher = StaticFetcher::new(200, b"<p>x</p>")
            .without_header("x-frame-options")
            .with_header("content-security-policy", "frame-ancestors 'none'");
        let options = ScrapeOptions {
            required_header: Some("content-security-policy".to_string()),
            ..Default::default()
        };

        let outcome = scrap_content(&fetcher, &Html5everNormalizer, "http://a.com/", &options)
            .await
            .unwrap();

        assert!(!outcome.is_skipped());
    }

    #[tokio::test]
    async fn decodes_with_response_charset() {
        let fetcher = StaticFetcher::new(200, b"<p title=\"caf\xe9\">x</p>")
            .with_header("content-type", "text/html; charset=windows-1252");

        let markup = scrap_content(
            &fetcher,
            &Html5everNormalizer,
            "http://a.com/",
            &ScrapeOptions::default(),
        )
        .await
        .unwrap()
        .into_string();

        assert!(markup.contains(r#"<p title="café">x</p>"#));
    }
}

//  ███████╗ █████╗ ██╗██╗     ██╗███╗   ██╗ ██████╗
//  ██╔════╝██╔══██╗██║██║     ██║████╗  ██║██╔════╝
//  █████╗  ███████║██║██║     ██║██╔██╗ ██║██║  ███╗
//  ██╔══╝  ██╔══██║██║██║     ██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║██║███████╗██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚═╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod failing {
    use absoluter::core::{scrap_content, ScrapeError, ScrapeOptions, ScrapeOutcome};
    use absoluter::parsers::html::Html5everNormalizer;

    use super::support::StaticFetcher;

    #[tokio::test]
    async fn missing_required_header_skips_page() {
        let fetcher = StaticFetcher::new(200, br#"<a href="x.html">x</a>"#)
            .without_header("x-frame-options");

        let outcome = scrap_content(
            &fetcher,
            &Html5everNormalizer,
            "http://a.com/",
            &ScrapeOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(outcome, ScrapeOutcome::Skipped);
        assert_eq!(outcome.into_string(), "");
    }

    #[tokio::test]
    async fn header_is_checked_before_status() {
        let fetcher = StaticFetcher::new(500, b"oops").without_header("x-frame-options");

        let outcome = scrap_content(
            &fetcher,
            &Html5everNormalizer,
            "http://a.com/",
            &ScrapeOptions::default(),
        )
        .await
        .unwrap();

        assert!(outcome.is_skipped());
    }

    #[tokio::test]
    async fn non_200_status_is_an_error() {
        let fetcher = StaticFetcher::new(404, b"<p>not found</p>");

        let result = scrap_content(
            &fetcher,
            &Html5everNormalizer,
            "http://a.com/missing.html",
            &ScrapeOptions::default(),
        )
        .await;

        assert!(matches!(result, Err(ScrapeError::Status(404))));
    }

    #[tokio::test]
    async fn invalid_target_is_not_fetched() {
        let fetcher = StaticFetcher::new(200, b"");

        let result = scrap_content(
            &fetcher,
            &Html5everNormalizer,
            "a.com/page.html",
            &ScrapeOptions::default(),
        )
        .await;

        assert!(matches!(result, Err(ScrapeError::InvalidUrl(_))));
        assert_eq!(fetcher.requests(), 0);
    }
}
