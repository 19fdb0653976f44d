use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Client;
use url::Url;

use crate::core::{ScrapeError, ScrapeOptions};

/// 抓取得到的响应
#[derive(Clone, Debug)]
pub struct FetchedResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl FetchedResponse {
    /// `Content-Type` 响应头的值，缺失或不是合法文本时为空串
    pub fn content_type(&self) -> String {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }
}

/// Retrieves a page over the network.
pub trait Fetcher {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<FetchedResponse, ScrapeError>> + Send;
}

/// reqwest 实现，跟随重定向并自动解压响应体
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(options: &ScrapeOptions) -> Result<Self, ScrapeError> {
        let mut builder = Client::builder().danger_accept_invalid_certs(options.insecure);

        if options.timeout > 0 {
            builder = builder.timeout(Duration::from_secs(options.timeout));
        }
        if let Some(user_agent) = &options.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedResponse, ScrapeError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        if response.url() != url {
            tracing::debug!(from = %url, to = %response.url(), "followed redirect");
        }

        let body = response.bytes().await?.to_vec();
        tracing::debug!(status, bytes = body.len(), "response received");

        Ok(FetchedResponse {
            status,
            headers,
            body,
        })
    }
}
