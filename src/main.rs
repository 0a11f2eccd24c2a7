use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use volbyscraper::{
    config::{ColumnPolicy, FetchFailurePolicy},
    fetch::{urls::validate_index_url, HttpTransport},
    write::write_table,
    Pipeline, RunOutcome, ScrapeConfig,
};

/// Scrape per-municipality election results of one district into a CSV file.
#[derive(Parser, Debug)]
#[command(name = "volbyscraper", version)]
struct Cli {
    /// District page, e.g. https://www.volby.cz/pls/ps2017nss/ps32?xjazyk=CZ&xkraj=2&xnumnuts=2101
    url: String,

    /// Destination CSV file
    output: PathBuf,

    /// YAML file with scrape settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Attempts per page, including the first
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Seconds to wait before retrying a failed request
    #[arg(long)]
    retry_delay: Option<f64>,

    /// Seconds to pause after each municipality page
    #[arg(long)]
    politeness_delay: Option<f64>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<f64>,

    /// Skip municipalities whose page cannot be fetched instead of aborting
    #[arg(long)]
    skip_failed_pages: bool,

    /// Abort when a municipality's parties differ from the first one's
    #[arg(long)]
    strict_columns: bool,
}

impl Cli {
    fn scrape_config(&self) -> Result<ScrapeConfig> {
        let mut cfg = match &self.config {
            Some(path) => ScrapeConfig::from_yaml_file(path)?,
            None => ScrapeConfig::default(),
        };
        if let Some(n) = self.max_attempts {
            cfg.max_attempts = n;
        }
        if let Some(secs) = self.retry_delay {
            cfg.retry_delay_secs = secs;
        }
        if let Some(secs) = self.politeness_delay {
            cfg.politeness_delay_secs = secs;
        }
        if let Some(secs) = self.timeout {
            cfg.request_timeout_secs = secs;
        }
        if self.skip_failed_pages {
            cfg.on_fetch_error = FetchFailurePolicy::Skip;
        }
        if self.strict_columns {
            cfg.column_policy = ColumnPolicy::Strict;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .init();

    // ─── 2) arguments, before any network access ─────────────────────
    let cli = Cli::parse();
    let cfg = cli.scrape_config()?;
    let index_url = validate_index_url(&cli.url, &cfg.report_root())?;

    // ─── 3) scrape ───────────────────────────────────────────────────
    let transport = HttpTransport::new(cfg.request_timeout())?;
    let pipeline = Pipeline::from_config(transport, &cfg);
    let RunOutcome { table, summary } = pipeline.run(&index_url).await?;

    // ─── 4) write ────────────────────────────────────────────────────
    if table.is_empty() {
        warn!("no municipality could be extracted, output will be empty");
    }
    write_table(&table, &cli.output)?;
    info!(
        rows = table.rows.len(),
        discovered = summary.discovered,
        skipped_structure = summary.skipped_structure,
        skipped_fetch = summary.skipped_fetch,
        "done, data saved to {}",
        cli.output.display()
    );
    Ok(())
}
