//! ページ取得の実装
//!
//! - [`HttpFetcher`]: reqwest によるHTTP GET
//! - [`BrowserFetcher`]: ヘッドレスChrome（非ブラウザのクライアントを拒否するページ用）

mod browser;
mod http;

pub use browser::BrowserFetcher;
pub use http::HttpFetcher;

use crate::config::{FetcherKind, ScraperConfig};
use crate::error::ScraperError;
use crate::traits::PageFetcher;

/// 設定に応じた取得器を作る
pub fn build_fetcher(config: &ScraperConfig) -> Result<Box<dyn PageFetcher>, ScraperError> {
    Ok(match config.fetcher {
        FetcherKind::Http => Box::new(HttpFetcher::new(config)?),
        FetcherKind::Browser => Box::new(BrowserFetcher::new(config)),
    })
}
