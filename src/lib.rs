pub mod config;
pub mod discover;
pub mod document;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod table;
pub mod types;
pub mod write;

pub use config::ScrapeConfig;
pub use error::{ScrapeError, TransportError};
pub use pipeline::{Pipeline, RunOutcome, RunSummary};
pub use types::{EntityRecord, EntityReference, PartyResult, ResultTable, SummaryCounts};
