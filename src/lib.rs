//! 近隣地区統計スクレイパー
//!
//! - city-data.com の市ページから近隣地区リンクを収集
//! - 各地区ページの `content-item` ブロックからラベル付きの数値を抽出
//! - 全地区分を1つのCSVにまとめて出力
//!
//! # 使用例
//!
//! ```rust,ignore
//! use neighborhood_scraper::{ScrapeRequest, ScraperService};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = ScraperService::new();
//!
//!     let request = ScrapeRequest::default().with_output_path("./neighbData.csv");
//!
//!     let result = service.call(request).await.unwrap();
//!     println!("CSV: {:?} ({} rows)", result.csv_path, result.rows_written);
//! }
//! ```
//!
//! # 抽出のみ
//!
//! ```rust,ignore
//! use neighborhood_scraper::FieldExtractor;
//!
//! let extraction = FieldExtractor::default().extract("Silver Lake", &html)?;
//! for (label, value) in &extraction.row {
//!     println!("{label} = {value}");
//! }
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod harvest;
pub mod runner;
pub mod service;
pub mod table;
pub mod traits;

// 主要な型をリエクスポート
pub use config::{FetcherKind, ScraperConfig};
pub use error::ScraperError;
pub use extract::{Extraction, FieldExtractor, FieldRow, LabelStackMode, RegionScan, ScanOutcome};
pub use fetch::{BrowserFetcher, HttpFetcher};
pub use harvest::{LinkHarvester, NeighborhoodIndex};
pub use runner::{FailedNeighborhood, NeighborhoodScraper, ScrapeReport};
pub use service::{ScrapeRequest, ScrapeResult, ScraperService};
pub use table::{ColumnSchema, OutputTable};
pub use traits::PageFetcher;
