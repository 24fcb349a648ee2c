//! Storage seam for the candidate aggregate.
//!
//! The domain model in `crate::models` is backend-agnostic; each backend
//! here maps it onto its own representation.

pub mod memory;
pub mod postgres;
pub mod users;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::candidate::{Candidate, CandidateProfile, CandidateStatus};
use crate::models::section::{SectionKind, SectionRecord};

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use users::{MemoryUserDirectory, PgUserDirectory, UserDirectory};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateFilter {
    pub status: Option<CandidateStatus>,
    pub user_id: Option<i64>,
}

impl CandidateFilter {
    pub fn matches(&self, candidate: &Candidate) -> bool {
        self.status.map_or(true, |s| candidate.status == Some(s))
            && self.user_id.map_or(true, |u| candidate.user_id == u)
    }
}

#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Writes the candidate and every child record as one unit: either all
    /// of it is persisted or none of it is.
    async fn insert_profile(&self, profile: &CandidateProfile) -> Result<()>;

    async fn fetch_candidate(&self, id: Uuid) -> Result<Option<Candidate>>;

    /// Candidates in creation order.
    async fn list_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Candidate>>;

    /// Overwrites the stored scalar fields. `false` when the id is unknown.
    async fn update_candidate(&self, candidate: &Candidate) -> Result<bool>;

    /// Bumps `view_count` and returns the record as stored afterwards.
    async fn record_view(&self, id: Uuid) -> Result<Option<Candidate>>;

    /// Removes the candidate and the records that reference it.
    async fn delete_candidate(&self, id: Uuid) -> Result<bool>;

    /// Children of the given candidates, each collection in insertion order.
    async fn sections_for(&self, candidate_ids: &[Uuid]) -> Result<Vec<SectionRecord>>;

    async fn insert_section(&self, record: &SectionRecord) -> Result<()>;

    async fn fetch_section(&self, kind: SectionKind, id: Uuid) -> Result<Option<SectionRecord>>;

    async fn list_sections(
        &self,
        kind: SectionKind,
        candidate_id: Option<Uuid>,
    ) -> Result<Vec<SectionRecord>>;

    async fn update_section(&self, record: &SectionRecord) -> Result<bool>;

    async fn delete_section(&self, kind: SectionKind, id: Uuid) -> Result<bool>;
}
