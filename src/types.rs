// src/types.rs

use url::Url;

/// One child entity (municipality) listed on an index page.
#[derive(Debug, PartialEq, Clone, Eq)]
pub struct EntityReference {
    pub code: String,
    pub name: String,
    pub detail_url: Url,
}

/// Headline counts from a detail page.
#[derive(Debug, PartialEq, Clone, Copy, Eq, Default)]
pub struct SummaryCounts {
    pub registered: u64,
    pub envelopes_issued: u64,
    pub valid_votes: u64,
}

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct PartyResult {
    pub party_name: String,
    pub vote_count: u64,
}

/// Everything extracted for one entity. `parties` keeps page order.
#[derive(Debug, PartialEq, Clone, Eq)]
pub struct EntityRecord {
    pub reference: EntityReference,
    pub summary: SummaryCounts,
    pub parties: Vec<PartyResult>,
}

impl EntityRecord {
    pub fn party_names(&self) -> Vec<String> {
        self.parties.iter().map(|p| p.party_name.clone()).collect()
    }

    /// Fixed leading fields shared by every output row.
    pub fn prefix_fields(&self) -> Vec<String> {
        vec![
            self.reference.code.clone(),
            self.reference.name.clone(),
            self.summary.registered.to_string(),
            self.summary.envelopes_issued.to_string(),
            self.summary.valid_votes.to_string(),
        ]
    }

    pub fn vote_fields(&self) -> Vec<String> {
        self.parties.iter().map(|p| p.vote_count.to_string()).collect()
    }
}

#[derive(Debug, Default, PartialEq, Clone, Eq)]
pub struct ResultTable {
    /// `None` until the first record is accumulated.
    pub header: Option<Vec<String>>,
    /// One row per extracted entity, each as long as `header`.
    pub rows: Vec<Vec<String>>,
}

impl ResultTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
