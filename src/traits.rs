use async_trait::async_trait;

use crate::error::ScraperError;

/// ページ取得の抽象
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 接続・ブラウザ等の準備
    async fn initialize(&mut self) -> Result<(), ScraperError> {
        Ok(())
    }

    /// URLのHTMLを取得
    async fn fetch(&mut self, url: &str) -> Result<String, ScraperError>;

    /// リソース解放
    async fn close(&mut self) -> Result<(), ScraperError> {
        Ok(())
    }
}

#[async_trait]
impl<F: PageFetcher + ?Sized> PageFetcher for Box<F> {
    async fn initialize(&mut self) -> Result<(), ScraperError> {
        (**self).initialize().await
    }

    async fn fetch(&mut self, url: &str) -> Result<String, ScraperError> {
        (**self).fetch(url).await
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        (**self).close().await
    }
}

#[async_trait]
impl<'a, F: PageFetcher + ?Sized> PageFetcher for &'a mut F {
    async fn initialize(&mut self) -> Result<(), ScraperError> {
        (**self).initialize().await
    }

    async fn fetch(&mut self, url: &str) -> Result<String, ScraperError> {
        (**self).fetch(url).await
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        (**self).close().await
    }
}
