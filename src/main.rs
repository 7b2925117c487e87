use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use neighborhood_scraper::config::{DEFAULT_BASE_URL, DEFAULT_CITY_MARKER, DEFAULT_OUTPUT_PATH, DEFAULT_ROOT_URL};
use neighborhood_scraper::{
    fetch, ColumnSchema, FetcherKind, LabelStackMode, NeighborhoodScraper, ScraperConfig,
};

#[derive(Clone, Copy, ValueEnum)]
enum Fetcher {
    Http,
    Browser,
}

#[derive(Parser)]
#[command(
    name = "neighborhood-scraper",
    about = "Scrape city-data.com neighborhood statistics into a CSV"
)]
struct Cli {
    /// City page listing the neighborhoods
    #[arg(long, default_value = DEFAULT_ROOT_URL)]
    root_url: String,
    /// Base that neighborhood links are resolved against
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Output CSV path
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    out: PathBuf,
    /// Also dump all rows as JSON into this directory
    #[arg(long)]
    json_dir: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = Fetcher::Http)]
    fetcher: Fetcher,
    /// Show the browser window (browser fetcher only)
    #[arg(long)]
    headed: bool,
    /// Pop the latest label after each value instead of keeping the whole stack
    #[arg(long)]
    pop_labels: bool,
    /// Labels containing this text are city-wide aggregates and get dropped
    #[arg(long, default_value = DEFAULT_CITY_MARKER)]
    city_marker: String,
    #[arg(long, default_value = "60")]
    timeout_secs: u64,
    /// Fixed column list (comma separated) instead of the union of all labels
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,
}

impl Cli {
    fn into_config(self) -> ScraperConfig {
        let mut config = ScraperConfig::new(self.root_url, self.base_url)
            .with_output_path(self.out)
            .with_fetcher(match self.fetcher {
                Fetcher::Http => FetcherKind::Http,
                Fetcher::Browser => FetcherKind::Browser,
            })
            .with_headless(!self.headed)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_city_marker(self.city_marker)
            .with_label_stack_mode(if self.pop_labels {
                LabelStackMode::PopOnValue
            } else {
                LabelStackMode::Cumulative
            });

        if let Some(dir) = self.json_dir {
            config = config.with_json_dir(dir);
        }
        if let Some(columns) = self.columns {
            config = config.with_schema(ColumnSchema::Declared(columns));
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let config = Cli::parse().into_config();

    let fetcher = fetch::build_fetcher(&config)?;
    let mut scraper = NeighborhoodScraper::new(config, fetcher)?;
    let report = scraper.execute().await?;

    println!(
        "Wrote {} neighborhoods ({} columns) to {}",
        report.rows.len(),
        report.columns.len(),
        report.output_path.display()
    );
    if let Some(path) = &report.json_path {
        println!("JSON: {}", path.display());
    }
    for failure in &report.failures {
        eprintln!("  failed: {} ({}): {}", failure.name, failure.url, failure.error);
    }
    println!("Done in {:.1}s", t0.elapsed().as_secs_f64());

    Ok(())
}
