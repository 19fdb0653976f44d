//! # 网络模块
//!
//! - `fetcher` - 抓取接口、响应结构和基于 reqwest 的 HTTP 实现

pub mod fetcher;

// Re-export commonly used items for convenience
pub use fetcher::{FetchedResponse, Fetcher, HttpFetcher};
