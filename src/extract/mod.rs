//! 近隣地区詳細ページからの項目抽出
//!
//! ページ内の `content-item` ブロックごとにラベルを再構成し、1つの [`FieldRow`] にまとめる。
//! 市全体の集計値は除外し、最後に `Neighborhood` 列を付け足す。

mod region;

use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::config::ScraperConfig;
use crate::error::ScraperError;

pub use region::{
    build_label, is_label, is_value, scan_region, FieldRow, LabelStackMode, RegionScan,
    ScanOutcome, SELF_REFERENCE,
};

pub const CONTENT_ITEM_SELECTOR: &str = ".content-item";
pub const NEIGHBORHOOD_COLUMN: &str = "Neighborhood";

/// 市全体の統計を示すラベルの小文字部分文字列
const CITY_KEYWORD: &str = "city";

/// 1ページ分の抽出結果
#[derive(Debug, Clone)]
pub struct Extraction {
    pub row: FieldRow,
    pub regions: Vec<RegionScan>,
}

#[derive(Debug, Clone)]
pub struct FieldExtractor {
    mode: LabelStackMode,
    city_marker: String,
}

impl FieldExtractor {
    pub fn new(mode: LabelStackMode, city_marker: impl Into<String>) -> Self {
        Self {
            mode,
            city_marker: city_marker.into(),
        }
    }

    pub fn from_config(config: &ScraperConfig) -> Self {
        Self::new(config.label_stack_mode, config.city_marker.clone())
    }

    /// 詳細ページHTMLから1地区分の行を作る
    pub fn extract(&self, name: &str, html: &str) -> Result<Extraction, ScraperError> {
        let blocks = content_blocks(html)?;
        if blocks.is_empty() {
            warn!("No content-item regions on page for {}", name);
        }

        let mut merged = FieldRow::new();
        let mut regions = Vec::with_capacity(blocks.len());

        for (i, block) in blocks.iter().enumerate() {
            let scan = scan_region(block, name, self.mode);
            match scan.outcome {
                ScanOutcome::NoValues { dropped_labels } if dropped_labels > 0 => {
                    debug!("{}: region {} had no values, dropped {} labels", name, i, dropped_labels);
                }
                ScanOutcome::UnlabeledValues { count } => {
                    debug!("{}: region {} has {} unlabeled values", name, i, count);
                }
                _ => {}
            }
            merged.extend(scan.fields.iter().map(|(k, v)| (k.clone(), v.clone())));
            regions.push(scan);
        }

        let mut row = self.filter_aggregates(merged);
        row.insert(NEIGHBORHOOD_COLUMN.to_string(), name.to_string());

        debug!("{}: extracted {} fields from {} regions", name, row.len() - 1, regions.len());
        Ok(Extraction { row, regions })
    }

    /// 空ラベル・市全体の集計ラベルを取り除く
    fn filter_aggregates(&self, fields: FieldRow) -> FieldRow {
        fields
            .into_iter()
            .filter(|(label, _)| self.is_neighborhood_specific(label))
            .collect()
    }

    pub fn is_neighborhood_specific(&self, label: &str) -> bool {
        if label.is_empty() {
            return false;
        }
        if !self.city_marker.is_empty() && label.contains(&self.city_marker) {
            return false;
        }
        !label.to_lowercase().contains(CITY_KEYWORD)
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::from_config(&ScraperConfig::default())
    }
}

/// `content-item` ブロックごとにテキスト断片を文書順で取り出す（各断片はtrim済み）
pub fn content_blocks(html: &str) -> Result<Vec<Vec<String>>, ScraperError> {
    let selector = Selector::parse(CONTENT_ITEM_SELECTOR)
        .map_err(|e| ScraperError::Parse(format!("{}: {}", CONTENT_ITEM_SELECTOR, e)))?;
    let document = Html::parse_document(html);

    Ok(document
        .select(&selector)
        .map(|region| region.text().map(|t| t.trim().to_string()).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(regions: &[&str]) -> String {
        let body: String = regions
            .iter()
            .map(|r| format!(r#"<div class="content-item">{}</div>"#, r))
            .collect();
        format!("<html><body><h1>Title: 1</h1>{}</body></html>", body)
    }

    #[test]
    fn test_fragments_in_document_order() {
        let html = page(&["<b>Housing:</b> <p>Median value: <span>$300,000</span></p>"]);
        let blocks = content_blocks(&html).unwrap();
        assert_eq!(blocks.len(), 1);
        let non_empty: Vec<&str> = blocks[0].iter().map(String::as_str).filter(|s| !s.is_empty()).collect();
        assert_eq!(non_empty, vec!["Housing:", "Median value:", "$300,000"]);
    }

    #[test]
    fn test_extract_basic_row() {
        let html = page(&["<b>Median income:</b> $50,000"]);
        let extraction = FieldExtractor::default().extract("Downtown", &html).unwrap();
        assert_eq!(extraction.row.len(), 2);
        assert_eq!(extraction.row["Median income:"], "$50,000");
        assert_eq!(extraction.row[NEIGHBORHOOD_COLUMN], "Downtown");
    }

    #[test]
    fn test_text_outside_regions_is_ignored() {
        let html = page(&[]);
        let extraction = FieldExtractor::default().extract("Downtown", &html).unwrap();
        assert_eq!(extraction.row.len(), 1);
        assert!(extraction.regions.is_empty());
    }

    #[test]
    fn test_no_value_regions_yield_only_name() {
        let html = page(&["<b>Housing:</b> none", "<i>Schools:</i>", "plain text"]);
        let extraction = FieldExtractor::default().extract("Echo Park", &html).unwrap();
        assert_eq!(extraction.row.len(), 1);
        assert_eq!(extraction.row[NEIGHBORHOOD_COLUMN], "Echo Park");
        assert_eq!(extraction.regions.len(), 3);
    }

    #[test]
    fn test_city_aggregates_are_filtered() {
        let html = page(&[
            "<b>Median income in Here:</b> $40,000",
            "<b>Median income in Los Angeles:</b> $55,000",
            "<b>City average:</b> 12",
            "<b>Inner-CITY share:</b> 3%",
        ]);
        let extraction = FieldExtractor::default().extract("Downtown", &html).unwrap();
        assert!(extraction.row.keys().all(|k| !k.contains("Los Angeles")));
        assert!(extraction.row.keys().all(|k| !k.to_lowercase().contains("city")));
        assert_eq!(extraction.row["Median income in Here:"], "$40,000");
    }

    #[test]
    fn test_unlabeled_values_are_dropped_from_row() {
        let html = page(&["1234 <b>Area:</b> 5"]);
        let extraction = FieldExtractor::default().extract("Downtown", &html).unwrap();
        assert!(!extraction.row.contains_key(""));
        assert_eq!(extraction.regions[0].outcome, ScanOutcome::UnlabeledValues { count: 1 });
    }

    #[test]
    fn test_nested_regions_scanned_independently() {
        let html = page(&[r#"<b>Outer:</b> 1 <div class="content-item"><b>Inner:</b> 2</div>"#]);
        let extraction = FieldExtractor::default().extract("X", &html).unwrap();

        // 外側ブロックは内側のテキストも含めて走査する
        assert_eq!(extraction.regions.len(), 2);
        assert_eq!(extraction.row.len(), 4);
        assert_eq!(extraction.row["Outer:"], "1");
        assert_eq!(extraction.row["Outer:Inner:"], "2");
        assert_eq!(extraction.row["Inner:"], "2");
        assert_eq!(extraction.row[NEIGHBORHOOD_COLUMN], "X");
    }

    #[test]
    fn test_comments_are_not_values() {
        let html = page(&["<b>Age:</b><!-- 99 --> 35"]);
        let blocks = content_blocks(&html).unwrap();
        assert!(blocks[0].iter().all(|t| !t.contains("99")));

        let extraction = FieldExtractor::default().extract("X", &html).unwrap();
        assert_eq!(extraction.row["Age:"], "35");
    }

    #[test]
    fn test_later_regions_overwrite() {
        let html = page(&["<b>Rent:</b> $900", "<b>Rent:</b> $1,100"]);
        let extraction = FieldExtractor::default().extract("Downtown", &html).unwrap();
        assert_eq!(extraction.row["Rent:"], "$1,100");
    }

    #[test]
    fn test_self_reference_masked_in_page() {
        let html = page(&["<b>Population of Downtown:</b> 40000"]);
        let extraction = FieldExtractor::default().extract("Downtown", &html).unwrap();
        assert_eq!(extraction.row["Here"], "40000");
    }

    #[test]
    fn test_custom_city_marker() {
        let extractor = FieldExtractor::new(LabelStackMode::Cumulative, "Chicago");
        assert!(!extractor.is_neighborhood_specific("Median in Chicago:"));
        assert!(extractor.is_neighborhood_specific("Median in Los Angeles:"));
        assert!(!extractor.is_neighborhood_specific(""));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let html = page(&[
            "<b>Housing:</b><b>Median value:</b> $300,000 <b>Rent:</b> $1,000",
            "<b>Age:</b> 35",
        ]);
        let extractor = FieldExtractor::default();
        let first = extractor.extract("Downtown", &html).unwrap();
        let second = extractor.extract("Downtown", &html).unwrap();
        assert_eq!(first.row, second.row);
        assert_eq!(
            serde_json::to_string(&first.row).unwrap(),
            serde_json::to_string(&second.row).unwrap()
        );
    }
}
