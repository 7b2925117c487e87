use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower::Service;
use tracing::info;

use crate::config::{FetcherKind, ScraperConfig};
use crate::error::ScraperError;
use crate::extract::LabelStackMode;
use crate::fetch::build_fetcher;
use crate::runner::{FailedNeighborhood, NeighborhoodScraper, ScrapeReport};

/// スクレイピングリクエスト
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    pub root_url: String,
    pub base_url: String,
    pub output_path: PathBuf,
    pub fetcher: FetcherKind,
    pub headless: bool,
    pub label_stack_mode: LabelStackMode,
}

impl Default for ScrapeRequest {
    fn default() -> Self {
        let config = ScraperConfig::default();
        Self {
            root_url: config.root_url,
            base_url: config.base_url,
            output_path: config.output_path,
            fetcher: config.fetcher,
            headless: config.headless,
            label_stack_mode: config.label_stack_mode,
        }
    }
}

impl ScrapeRequest {
    pub fn new(root_url: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            root_url: root_url.into(),
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_fetcher(mut self, fetcher: FetcherKind) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_label_stack_mode(mut self, mode: LabelStackMode) -> Self {
        self.label_stack_mode = mode;
        self
    }
}

impl From<ScrapeRequest> for ScraperConfig {
    fn from(req: ScrapeRequest) -> Self {
        ScraperConfig {
            root_url: req.root_url,
            base_url: req.base_url,
            output_path: req.output_path,
            fetcher: req.fetcher,
            headless: req.headless,
            label_stack_mode: req.label_stack_mode,
            ..Default::default()
        }
    }
}

/// スクレイピング結果
#[derive(Debug)]
pub struct ScrapeResult {
    pub csv_path: PathBuf,
    pub csv_content: Vec<u8>,
    pub rows_written: usize,
    pub failures: Vec<FailedNeighborhood>,
}

impl ScrapeResult {
    pub fn new(report: ScrapeReport) -> std::io::Result<Self> {
        let csv_content = std::fs::read(&report.output_path)?;
        Ok(Self {
            csv_path: report.output_path,
            csv_content,
            rows_written: report.rows.len(),
            failures: report.failures,
        })
    }
}

/// tower::Serviceを実装したスクレイパーサービス
#[derive(Debug, Clone, Default)]
pub struct ScraperService {
    config: Option<ScraperConfig>,
}

impl ScraperService {
    pub fn new() -> Self {
        Self::default()
    }

    /// リクエストにない設定項目（JSON出力先・列スキーマ等）の既定値を差し替える
    pub fn with_config(config: ScraperConfig) -> Self {
        Self {
            config: Some(config),
        }
    }

    fn resolve(&self, req: ScrapeRequest) -> ScraperConfig {
        match &self.config {
            Some(base) => ScraperConfig {
                root_url: req.root_url,
                base_url: req.base_url,
                output_path: req.output_path,
                fetcher: req.fetcher,
                headless: req.headless,
                label_stack_mode: req.label_stack_mode,
                ..base.clone()
            },
            None => req.into(),
        }
    }
}

impl Service<ScrapeRequest> for ScraperService {
    type Response = ScrapeResult;
    type Error = ScraperError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ScrapeRequest) -> Self::Future {
        info!("スクレイピングリクエスト受信: root_url={}", req.root_url);
        let config = self.resolve(req);

        Box::pin(async move {
            let fetcher = build_fetcher(&config)?;
            let mut scraper = NeighborhoodScraper::new(config, fetcher)?;

            let report = scraper.execute().await?;
            let result = ScrapeResult::new(report)?;

            info!(
                "スクレイピング完了: path={:?}, rows={}, size={}bytes",
                result.csv_path,
                result.rows_written,
                result.csv_content.len()
            );

            Ok(result)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_request_builder() {
        let req = ScrapeRequest::new("http://example.test/city.html", "http://example.test/")
            .with_output_path("/tmp/out.csv")
            .with_fetcher(FetcherKind::Browser)
            .with_headless(false)
            .with_label_stack_mode(LabelStackMode::PopOnValue);

        assert_eq!(req.root_url, "http://example.test/city.html");
        assert_eq!(req.base_url, "http://example.test/");
        assert_eq!(req.output_path, PathBuf::from("/tmp/out.csv"));
        assert_eq!(req.fetcher, FetcherKind::Browser);
        assert!(!req.headless);
        assert_eq!(req.label_stack_mode, LabelStackMode::PopOnValue);
    }

    #[test]
    fn test_scrape_request_to_config() {
        let req = ScrapeRequest::new("http://example.test/city.html", "http://example.test/");
        let config: ScraperConfig = req.into();

        assert_eq!(config.root_url, "http://example.test/city.html");
        assert_eq!(config.city_marker, "Los Angeles");
        assert_eq!(config.label_stack_mode, LabelStackMode::Cumulative);
    }

    #[test]
    fn test_service_config_fills_remaining_fields() {
        let base = ScraperConfig::default()
            .with_city_marker("Chicago")
            .with_json_dir("/tmp/json");
        let service = ScraperService::with_config(base);

        let config = service.resolve(ScrapeRequest::new("http://a.test/c.html", "http://a.test/"));
        assert_eq!(config.root_url, "http://a.test/c.html");
        assert_eq!(config.city_marker, "Chicago");
        assert_eq!(config.json_dir, Some(PathBuf::from("/tmp/json")));
    }
}
