use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use super::{CandidateFilter, CandidateStore};
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateProfile};
use crate::models::section::{SectionKind, SectionRecord};

#[derive(Debug, Default)]
struct Collections {
    candidates: Vec<Candidate>,
    sections: Vec<SectionRecord>,
}

/// Process-local store. Vectors keep insertion order, which is the order
/// every listing returns.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>> {
        self.inner
            .lock()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl CandidateStore for MemoryStore {
    async fn insert_profile(&self, profile: &CandidateProfile) -> Result<()> {
        let mut guard = self.lock()?;
        guard.candidates.push(profile.candidate.clone());
        guard.sections.extend(profile.section_records());
        Ok(())
    }

    async fn fetch_candidate(&self, id: Uuid) -> Result<Option<Candidate>> {
        let guard = self.lock()?;
        Ok(guard.candidates.iter().find(|c| c.id == id).cloned())
    }

    async fn list_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Candidate>> {
        let guard = self.lock()?;
        Ok(guard
            .candidates
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    async fn update_candidate(&self, candidate: &Candidate) -> Result<bool> {
        let mut guard = self.lock()?;
        match guard.candidates.iter_mut().find(|c| c.id == candidate.id) {
            Some(slot) => {
                // view_count and created_at are owned by the store
                let view_count = slot.view_count;
                let created_at = slot.created_at;
                *slot = candidate.clone();
                slot.view_count = view_count;
                slot.created_at = created_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn record_view(&self, id: Uuid) -> Result<Option<Candidate>> {
        let mut guard = self.lock()?;
        Ok(guard
            .candidates
            .iter_mut()
            .find(|c| c.id == id)
            .map(|candidate| {
                candidate.view_count += 1;
                candidate.clone()
            }))
    }

    async fn delete_candidate(&self, id: Uuid) -> Result<bool> {
        let mut guard = self.lock()?;
        let before = guard.candidates.len();
        guard.candidates.retain(|c| c.id != id);
        if guard.candidates.len() == before {
            return Ok(false);
        }
        guard.sections.retain(|s| s.candidate_id() != id);
        Ok(true)
    }

    async fn sections_for(&self, candidate_ids: &[Uuid]) -> Result<Vec<SectionRecord>> {
        let guard = self.lock()?;
        Ok(guard
            .sections
            .iter()
            .filter(|s| candidate_ids.contains(&s.candidate_id()))
            .cloned()
            .collect())
    }

    async fn insert_section(&self, record: &SectionRecord) -> Result<()> {
        let mut guard = self.lock()?;
        if !guard.candidates.iter().any(|c| c.id == record.candidate_id()) {
            return Err(Error::Storage(format!(
                "candidate {} does not exist",
                record.candidate_id()
            )));
        }
        guard.sections.push(record.clone());
        Ok(())
    }

    async fn fetch_section(&self, kind: SectionKind, id: Uuid) -> Result<Option<SectionRecord>> {
        let guard = self.lock()?;
        Ok(guard
            .sections
            .iter()
            .find(|s| s.kind() == kind && s.id() == id)
            .cloned())
    }

    async fn list_sections(
        &self,
        kind: SectionKind,
        candidate_id: Option<Uuid>,
    ) -> Result<Vec<SectionRecord>> {
        let guard = self.lock()?;
        Ok(guard
            .sections
            .iter()
            .filter(|s| s.kind() == kind)
            .filter(|s| candidate_id.map_or(true, |parent| s.candidate_id() == parent))
            .cloned()
            .collect())
    }

    async fn update_section(&self, record: &SectionRecord) -> Result<bool> {
        let mut guard = self.lock()?;
        match guard
            .sections
            .iter_mut()
            .find(|s| s.kind() == record.kind() && s.id() == record.id())
        {
            Some(slot) => {
                *slot = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_section(&self, kind: SectionKind, id: Uuid) -> Result<bool> {
        let mut guard = self.lock()?;
        let before = guard.sections.len();
        guard.sections.retain(|s| !(s.kind() == kind && s.id() == id));
        Ok(guard.sections.len() != before)
    }
}
