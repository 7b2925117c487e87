use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("ブラウザ初期化エラー: {0}")]
    BrowserInit(String),

    #[error("HTTPクライアント初期化エラー: {0}")]
    ClientInit(String),

    #[error("ナビゲーションエラー: {0}")]
    Navigation(String),

    #[error("取得エラー: {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("解析エラー: {0}")]
    Parse(String),

    #[error("近隣地区が見つかりません: {0}")]
    NoNeighborhoods(String),

    #[error("書き込みエラー: {0}")]
    Write(String),

    #[error("ファイル操作エラー: {0}")]
    FileIO(#[from] std::io::Error),
}

impl ScraperError {
    pub fn fetch(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }
}

impl From<csv::Error> for ScraperError {
    fn from(e: csv::Error) -> Self {
        Self::Write(e.to_string())
    }
}
