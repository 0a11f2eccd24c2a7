// src/fetch/urls.rs

use url::Url;

use crate::error::ScrapeError;

/// Check a user-supplied index URL before anything touches the network.
/// It must parse and contain `report_root`.
pub fn validate_index_url(raw: &str, report_root: &str) -> Result<Url, ScrapeError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ScrapeError::Argument("index URL must not be empty".into()));
    }
    if !raw.contains(report_root) {
        return Err(ScrapeError::Argument(format!(
            "{} is not a results page under {}",
            raw, report_root
        )));
    }
    Url::parse(raw).map_err(|e| ScrapeError::Argument(format!("{}: {}", raw, e)))
}

/// Detail pages are addressed by plain concatenation of the root and the
/// relative link found on the index page.
pub fn detail_url(report_root: &str, href: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!("{}{}", report_root, href))
}
