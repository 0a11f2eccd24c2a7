//! Run configuration: defaults, optional YAML file, CLI overrides.

use serde::Deserialize;
use std::{fs, path::Path, time::Duration};

use crate::error::ScrapeError;

/// Report root of the 2017 Chamber of Deputies results.
pub const DEFAULT_REPORT_ROOT: &str = "https://www.volby.cz/pls/ps2017nss/";
/// Query token present only in links to a municipality's detail page.
pub const DEFAULT_DETAIL_MARKER: &str = "xobec";

/// Class of `<td>` cells holding numbers.
pub const NUMERIC_CLASS: &str = "cislo";
/// Class of `<td>` cells holding a party name.
pub const PARTY_NAME_CLASS: &str = "overflow_name";
/// Class of `<table>` elements holding results.
pub const RESULTS_TABLE_CLASS: &str = "table";

/// What to do when a detail page cannot be fetched after all retries.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FetchFailurePolicy {
    /// Abort the whole run
    #[default]
    Fail,
    /// Log the failure and continue with the next entity
    Skip,
}

/// How rows whose party list differs from the header are handled.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColumnPolicy {
    /// Append vote counts by position, padding or truncating to the header
    #[default]
    Positional,
    /// Reject the record with a schema mismatch error
    Strict,
}

/// Positions of the summary counts within the page's numeric cells.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct SummaryLayout {
    pub registered: usize,
    pub envelopes: usize,
    pub valid: usize,
}

impl Default for SummaryLayout {
    fn default() -> Self {
        Self {
            registered: 3,
            envelopes: 4,
            valid: 7,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ScrapeConfig {
    pub report_root: String,
    pub detail_marker: String,
    pub request_timeout_secs: f64,
    pub max_attempts: u32,
    pub retry_delay_secs: f64,
    pub politeness_delay_secs: f64,
    pub on_fetch_error: FetchFailurePolicy,
    pub column_policy: ColumnPolicy,
    pub summary_layout: SummaryLayout,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            report_root: DEFAULT_REPORT_ROOT.to_string(),
            detail_marker: DEFAULT_DETAIL_MARKER.to_string(),
            request_timeout_secs: 10.0,
            max_attempts: 3,
            retry_delay_secs: 2.0,
            politeness_delay_secs: 1.0,
            on_fetch_error: FetchFailurePolicy::default(),
            column_policy: ColumnPolicy::default(),
            summary_layout: SummaryLayout::default(),
        }
    }
}

impl ScrapeConfig {
    /// Read a YAML config file. Missing keys keep their defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ScrapeError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| ScrapeError::Config(format!("reading {}: {}", path.display(), e)))?;
        serde_yaml::from_str(&text)
            .map_err(|e| ScrapeError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ScrapeError> {
        serde_yaml::from_str(text).map_err(|e| ScrapeError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ScrapeError> {
        if self.report_root.trim().is_empty() {
            return Err(ScrapeError::Config("report_root must not be empty".into()));
        }
        if self.detail_marker.is_empty() {
            return Err(ScrapeError::Config("detail_marker must not be empty".into()));
        }
        if self.max_attempts == 0 {
            return Err(ScrapeError::Config("max_attempts must be at least 1".into()));
        }
        for (name, secs) in [
            ("request_timeout_secs", self.request_timeout_secs),
            ("retry_delay_secs", self.retry_delay_secs),
            ("politeness_delay_secs", self.politeness_delay_secs),
        ] {
            if !secs.is_finite() || secs < 0.0 {
                return Err(ScrapeError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, secs
                )));
            }
            if Duration::try_from_secs_f64(secs).is_err() {
                return Err(ScrapeError::Config(format!(
                    "{} is too large, got {}",
                    name, secs
                )));
            }
        }
        if self.request_timeout_secs == 0.0 {
            return Err(ScrapeError::Config("request_timeout_secs must be positive".into()));
        }
        Ok(())
    }

    /// Root URL with a guaranteed trailing slash.
    pub fn report_root(&self) -> String {
        let root = self.report_root.trim();
        if root.ends_with('/') {
            root.to_string()
        } else {
            format!("{}/", root)
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.request_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs_f64(self.retry_delay_secs)
    }

    pub fn politeness_delay(&self) -> Duration {
        Duration::from_secs_f64(self.politeness_delay_secs)
    }
}
