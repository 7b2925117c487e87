use std::path::PathBuf;
use std::time::Duration;

use crate::extract::LabelStackMode;
use crate::table::ColumnSchema;

pub const DEFAULT_ROOT_URL: &str = "http://www.city-data.com/city/Los-Angeles-California.html";
pub const DEFAULT_BASE_URL: &str = "http://www.city-data.com/";
pub const DEFAULT_OUTPUT_PATH: &str = "neighbData.csv";
pub const DEFAULT_CITY_MARKER: &str = "Los Angeles";
/// リンク文字列の末尾に付く定型句
pub const DEFAULT_NAME_SUFFIX: &str = " neighborhood";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// ページ取得方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetcherKind {
    /// reqwest による素のHTTP GET
    #[default]
    Http,
    /// ヘッドレスChrome経由
    Browser,
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub root_url: String,
    pub base_url: String,
    pub output_path: PathBuf,
    /// 指定時は全行をJSONでも保存する
    pub json_dir: Option<PathBuf>,
    pub fetcher: FetcherKind,
    pub headless: bool,
    pub timeout: Duration,
    pub user_agent: String,
    pub label_stack_mode: LabelStackMode,
    pub city_marker: String,
    pub name_suffix: String,
    pub schema: ColumnSchema,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            root_url: DEFAULT_ROOT_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            json_dir: None,
            fetcher: FetcherKind::Http,
            headless: true,
            timeout: Duration::from_secs(60),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            label_stack_mode: LabelStackMode::Cumulative,
            city_marker: DEFAULT_CITY_MARKER.to_string(),
            name_suffix: DEFAULT_NAME_SUFFIX.to_string(),
            schema: ColumnSchema::Union,
        }
    }
}

impl ScraperConfig {
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

    pub fn with_json_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.json_dir = Some(dir.into());
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

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_label_stack_mode(mut self, mode: LabelStackMode) -> Self {
        self.label_stack_mode = mode;
        self
    }

    pub fn with_city_marker(mut self, marker: impl Into<String>) -> Self {
        self.city_marker = marker.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_name_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.name_suffix = suffix.into();
        self
    }

    pub fn with_schema(mut self, schema: ColumnSchema) -> Self {
        self.schema = schema;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_targets_los_angeles() {
        let config = ScraperConfig::default();
        assert_eq!(config.root_url, DEFAULT_ROOT_URL);
        assert_eq!(config.output_path, PathBuf::from("neighbData.csv"));
        assert_eq!(config.label_stack_mode, LabelStackMode::Cumulative);
        assert_eq!(config.fetcher, FetcherKind::Http);
        assert!(config.json_dir.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = ScraperConfig::new("http://example.test/city.html", "http://example.test/")
            .with_output_path("/tmp/out.csv")
            .with_fetcher(FetcherKind::Browser)
            .with_headless(false)
            .with_timeout(Duration::from_secs(5))
            .with_label_stack_mode(LabelStackMode::PopOnValue)
            .with_city_marker("Chicago")
            .with_user_agent("test-agent/1.0")
            .with_name_suffix(" area");

        assert_eq!(config.root_url, "http://example.test/city.html");
        assert_eq!(config.base_url, "http://example.test/");
        assert_eq!(config.output_path, PathBuf::from("/tmp/out.csv"));
        assert_eq!(config.fetcher, FetcherKind::Browser);
        assert!(!config.headless);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.label_stack_mode, LabelStackMode::PopOnValue);
        assert_eq!(config.city_marker, "Chicago");
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert_eq!(config.name_suffix, " area");
    }
}
