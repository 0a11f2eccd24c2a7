//! Sequential scrape: index page, then each entity's detail page.

use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument, warn};
use url::Url;

use crate::config::{ColumnPolicy, FetchFailurePolicy, ScrapeConfig, SummaryLayout};
use crate::discover::discover_entities;
use crate::error::ScrapeError;
use crate::extract::extract_record;
use crate::fetch::{Fetcher, RetryPolicy, Transport};
use crate::table::TableAccumulator;
use crate::types::{EntityReference, ResultTable};

/// Knobs the driver needs beyond the fetcher's retry policy.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub report_root: String,
    pub detail_marker: String,
    /// Pause after every detail-page fetch, successful or not.
    pub politeness_delay: Duration,
    pub on_fetch_error: FetchFailurePolicy,
    pub column_policy: ColumnPolicy,
    pub summary_layout: SummaryLayout,
}

impl From<&ScrapeConfig> for PipelineSettings {
    fn from(cfg: &ScrapeConfig) -> Self {
        Self {
            report_root: cfg.report_root(),
            detail_marker: cfg.detail_marker.clone(),
            politeness_delay: cfg.politeness_delay(),
            on_fetch_error: cfg.on_fetch_error,
            column_policy: cfg.column_policy,
            summary_layout: cfg.summary_layout,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub discovered: usize,
    pub extracted: usize,
    pub skipped_structure: usize,
    pub skipped_fetch: usize,
}

#[derive(Debug)]
pub struct RunOutcome {
    pub table: ResultTable,
    pub summary: RunSummary,
}

pub struct Pipeline<T> {
    fetcher: Fetcher<T>,
    settings: PipelineSettings,
}

impl<T: Transport> Pipeline<T> {
    pub fn new(fetcher: Fetcher<T>, settings: PipelineSettings) -> Self {
        Self { fetcher, settings }
    }

    pub fn from_config(transport: T, cfg: &ScrapeConfig) -> Self {
        Self::new(
            Fetcher::new(transport, RetryPolicy::from_config(cfg)),
            PipelineSettings::from(cfg),
        )
    }

    /// Fetch the index page and list the entities it links to. A failure
    /// here is fatal for the run.
    pub async fn discover(&self, index_url: &Url) -> Result<Vec<EntityReference>, ScrapeError> {
        info!(url = %index_url, "fetching index page");
        let doc = self.fetcher.fetch(index_url).await?;
        let entities = discover_entities(
            &doc,
            &self.settings.report_root,
            &self.settings.detail_marker,
        );
        info!(count = entities.len(), "found entities");
        Ok(entities)
    }

    /// Scrape every entity linked from `index_url` into one table.
    #[instrument(level = "info", skip(self), fields(url = %index_url))]
    pub async fn run(&self, index_url: &Url) -> Result<RunOutcome, ScrapeError> {
        let entities = self.discover(index_url).await?;
        let mut summary = RunSummary {
            discovered: entities.len(),
            ..Default::default()
        };
        let mut acc = TableAccumulator::new(self.settings.column_policy);

        for entity in &entities {
            info!("processing {} - {}", entity.code, entity.name);
            let fetched = self
                .fetcher
                .fetch(&entity.detail_url)
                .await
                .map(|doc| extract_record(entity, &doc, &self.settings.summary_layout));

            match fetched {
                Ok(Some(record)) => {
                    acc.accumulate(&record)?;
                    summary.extracted += 1;
                }
                Ok(None) => summary.skipped_structure += 1,
                Err(e) => match self.settings.on_fetch_error {
                    FetchFailurePolicy::Fail => return Err(e),
                    FetchFailurePolicy::Skip => {
                        warn!(code = %entity.code, error = %e, "skipping entity, detail page unavailable");
                        summary.skipped_fetch += 1;
                    }
                },
            }

            sleep(self.settings.politeness_delay).await;
        }

        Ok(RunOutcome {
            table: acc.finalize(),
            summary,
        })
    }
}
