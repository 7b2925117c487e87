//! 市ページから近隣地区リンクを集める

use std::collections::BTreeMap;

use scraper::{Html, Selector};
use tracing::{debug, info};
use url::Url;

use crate::config::ScraperConfig;
use crate::error::ScraperError;

pub const LISTING_SELECTOR: &str = ".neighborhoods";

/// 近隣地区名 → 詳細ページURL
///
/// 名前の重複は後勝ち。名前順に列挙される。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborhoodIndex {
    entries: BTreeMap<String, Url>,
}

impl NeighborhoodIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存の名前なら以前のURLを返す
    pub fn insert(&mut self, name: impl Into<String>, url: Url) -> Option<Url> {
        self.entries.insert(name.into(), url)
    }

    pub fn get(&self, name: &str) -> Option<&Url> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Url)> {
        self.entries.iter().map(|(name, url)| (name.as_str(), url))
    }
}

#[derive(Debug, Clone)]
pub struct LinkHarvester {
    base: Url,
    name_suffix: String,
}

impl LinkHarvester {
    pub fn new(base_url: &str, name_suffix: impl Into<String>) -> Result<Self, ScraperError> {
        let base = Url::parse(base_url)
            .map_err(|e| ScraperError::Parse(format!("ベースURL {}: {}", base_url, e)))?;
        Ok(Self {
            base,
            name_suffix: name_suffix.into(),
        })
    }

    pub fn from_config(config: &ScraperConfig) -> Result<Self, ScraperError> {
        Self::new(&config.base_url, config.name_suffix.clone())
    }

    /// リンク文字列から末尾の定型句を取り除く
    pub fn display_name(&self, text: &str) -> String {
        let text = text.trim();
        text.strip_suffix(self.name_suffix.as_str())
            .unwrap_or(text)
            .trim()
            .to_string()
    }

    /// 一覧ブロック内の全リンクを索引にする。
    /// 一覧ブロックが無い、またはリンクが1件も無い場合はエラー。
    pub fn harvest(&self, html: &str) -> Result<NeighborhoodIndex, ScraperError> {
        let listing_selector = Selector::parse(LISTING_SELECTOR)
            .map_err(|e| ScraperError::Parse(format!("{}: {}", LISTING_SELECTOR, e)))?;
        let link_selector =
            Selector::parse("a").map_err(|e| ScraperError::Parse(format!("a: {}", e)))?;

        let document = Html::parse_document(html);
        let listing = document.select(&listing_selector).next().ok_or_else(|| {
            ScraperError::NoNeighborhoods(format!("{} が見つかりません", LISTING_SELECTOR))
        })?;

        let mut index = NeighborhoodIndex::new();
        for link in listing.select(&link_selector) {
            let text: String = link.text().collect();
            let name = self.display_name(&text);
            if name.is_empty() {
                debug!("Skipping link without text");
                continue;
            }

            let Some(href) = link.value().attr("href") else {
                debug!("Skipping {}: no href", name);
                continue;
            };

            let url = match self.base.join(href.trim()) {
                Ok(url) => url,
                Err(e) => {
                    debug!("Skipping {}: bad href {:?}: {}", name, href, e);
                    continue;
                }
            };

            if let Some(previous) = index.insert(name.clone(), url) {
                debug!("Duplicate neighborhood {}, replacing {}", name, previous);
            }
        }

        if index.is_empty() {
            return Err(ScraperError::NoNeighborhoods(format!(
                "{} にリンクがありません",
                LISTING_SELECTOR
            )));
        }

        info!("Harvested {} neighborhood links", index.len());
        Ok(index)
    }
}
