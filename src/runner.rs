//! 市ページ → 近隣地区一覧 → 各地区の抽出 → CSV の一連の処理

use std::path::PathBuf;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::extract::{FieldExtractor, FieldRow};
use crate::harvest::{LinkHarvester, NeighborhoodIndex};
use crate::table::{write_json_dump, OutputTable};
use crate::traits::PageFetcher;

/// 取得に失敗した地区
#[derive(Debug, Clone, Serialize)]
pub struct FailedNeighborhood {
    pub name: String,
    pub url: String,
    pub error: String,
}

#[derive(Debug)]
pub struct ScrapeReport {
    pub output_path: PathBuf,
    pub json_path: Option<PathBuf>,
    pub columns: Vec<String>,
    pub rows: Vec<FieldRow>,
    pub failures: Vec<FailedNeighborhood>,
}

pub struct NeighborhoodScraper<F> {
    config: ScraperConfig,
    fetcher: F,
    harvester: LinkHarvester,
    extractor: FieldExtractor,
}

impl<F: PageFetcher> NeighborhoodScraper<F> {
    pub fn new(config: ScraperConfig, fetcher: F) -> Result<Self, ScraperError> {
        let harvester = LinkHarvester::from_config(&config)?;
        let extractor = FieldExtractor::from_config(&config);
        Ok(Self {
            config,
            fetcher,
            harvester,
            extractor,
        })
    }

    /// 市ページを取得して近隣地区の索引を作る
    pub async fn harvest(&mut self) -> Result<NeighborhoodIndex, ScraperError> {
        info!("Fetching city page {}", self.config.root_url);
        let html = self.fetcher.fetch(&self.config.root_url).await?;
        self.harvester.harvest(&html)
    }

    /// 各地区を順に取得・抽出する。取得失敗はスキップして記録する
    pub async fn scrape_rows(
        &mut self,
        index: &NeighborhoodIndex,
    ) -> (Vec<FieldRow>, Vec<FailedNeighborhood>) {
        let mut rows = Vec::with_capacity(index.len());
        let mut failures = Vec::new();
        let total = index.len();

        for (i, (name, url)) in index.iter().enumerate() {
            info!("[{}/{}] {}", i + 1, total, name);

            let result = match self.fetcher.fetch(url.as_str()).await {
                Ok(html) => self.extractor.extract(name, &html),
                Err(e) => Err(e),
            };

            match result {
                Ok(extraction) => rows.push(extraction.row),
                Err(e) => {
                    warn!("Skipping {}: {}", name, e);
                    failures.push(FailedNeighborhood {
                        name: name.to_string(),
                        url: url.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        (rows, failures)
    }

    /// 一括実行（initialize → harvest → 各地区 → close → 書き出し）
    pub async fn execute(&mut self) -> Result<ScrapeReport, ScraperError> {
        self.fetcher.initialize().await?;

        let collected = match self.harvest().await {
            Ok(index) => Ok(self.scrape_rows(&index).await),
            Err(e) => Err(e),
        };

        if let Err(e) = self.fetcher.close().await {
            warn!("Fetcher close failed: {}", e);
        }

        let (rows, failures) = collected?;
        if rows.is_empty() {
            error!("All {} neighborhood pages failed", failures.len());
            return Err(ScraperError::NoNeighborhoods(format!(
                "全{}地区の取得に失敗しました",
                failures.len()
            )));
        }
        if !failures.is_empty() {
            warn!(
                "{} neighborhoods failed: {}",
                failures.len(),
                failures
                    .iter()
                    .map(|f| f.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        let table = OutputTable::new(&rows, &self.config.schema);
        table.write_to_path(&self.config.output_path)?;
        let columns = table.columns().to_vec();

        let json_path = match &self.config.json_dir {
            Some(dir) => match write_json_dump(dir, &rows) {
                Ok(path) => Some(path),
                Err(e) => {
                    error!("Failed to save JSON dump: {}", e);
                    None
                }
            },
            None => None,
        };

        info!(
            "Scrape finished: {} rows, {} failures",
            rows.len(),
            failures.len()
        );

        Ok(ScrapeReport {
            output_path: self.config.output_path.clone(),
            json_path,
            columns,
            rows,
            failures,
        })
    }
}
