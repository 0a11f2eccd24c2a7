//! Error types for the scraper.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single request, before any retry bookkeeping.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connection, timeout or non-success status reported by reqwest
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Failure reported by a non-HTTP transport
    #[error("{0}")]
    Unavailable(String),
}

/// Errors surfaced by the extraction pipeline.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Bad command-line input, rejected before any network access
    #[error("invalid argument: {0}")]
    Argument(String),

    /// Invalid or unreadable configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Every attempt to fetch `url` failed
    #[error("fetching {url} failed after {attempts} attempt(s): {source}")]
    Transport {
        url: String,
        attempts: u32,
        #[source]
        source: TransportError,
    },

    /// A detail page does not have the expected shape
    #[error("unexpected page structure: {0}")]
    Structure(String),

    /// A record's party columns differ from the established header
    #[error("party columns of {code} differ from header: expected {expected:?}, found {found:?}")]
    SchemaMismatch {
        code: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// The output artifact could not be written
    #[error("writing {path:?}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),
}
