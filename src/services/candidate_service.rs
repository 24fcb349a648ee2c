use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::dto::candidate_dto::{CreateCandidatePayload, UpdateCandidatePayload};
use crate::dto::section_dto::SectionWrite;
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateProfile};
use crate::models::certification::Certification;
use crate::models::education::Education;
use crate::models::project::Project;
use crate::models::user::UserAccount;
use crate::models::work_experience::WorkExperience;
use crate::store::{CandidateFilter, CandidateStore, UserDirectory};
use crate::utils::time::now;

/// Aggregate-level operations on a candidate and its nested collections.
#[derive(Clone)]
pub struct CandidateService {
    store: Arc<dyn CandidateStore>,
    users: Arc<dyn UserDirectory>,
}

impl CandidateService {
    pub fn new(store: Arc<dyn CandidateStore>, users: Arc<dyn UserDirectory>) -> Self {
        Self { store, users }
    }

    /// Validates the whole body, then writes the candidate and every nested
    /// entry in one store call. Nothing is persisted when any check fails.
    pub async fn create_aggregate(&self, payload: CreateCandidatePayload) -> Result<CandidateProfile> {
        payload.validate()?;
        let draft = payload.into_draft()?;

        let candidate_id = Uuid::new_v4();
        let mut candidate = Candidate::new(candidate_id, draft.user_id, draft.name, now());
        draft.changes.apply(&mut candidate);

        let nested = draft.sections;
        let profile = CandidateProfile {
            candidate,
            projects: build_all::<Project>(candidate_id, nested.projects),
            work_experiences: build_all::<WorkExperience>(candidate_id, nested.work_experiences),
            education: build_all::<Education>(candidate_id, nested.education),
            certifications: build_all::<Certification>(candidate_id, nested.certifications),
        };

        self.store.insert_profile(&profile).await?;
        tracing::info!(
            candidate_id = %candidate_id,
            user_id = profile.candidate.user_id,
            projects = profile.projects.len(),
            work_experiences = profile.work_experiences.len(),
            education = profile.education.len(),
            certifications = profile.certifications.len(),
            "candidate profile created"
        );
        Ok(profile)
    }

    /// Applies the supplied scalar fields. Nested collections are untouched.
    pub async fn update_partial(
        &self,
        id: Uuid,
        payload: UpdateCandidatePayload,
    ) -> Result<CandidateProfile> {
        let mut candidate = self.require(id).await?;
        payload.validate()?;
        let changes = payload.into_changes()?;
        changes.apply(&mut candidate);
        self.save(candidate).await
    }

    /// Full scalar replacement using the create shape. Any nested lists in
    /// the body are validated but not written.
    pub async fn replace(&self, id: Uuid, payload: CreateCandidatePayload) -> Result<CandidateProfile> {
        let existing = self.require(id).await?;
        payload.validate()?;
        let draft = payload.into_draft()?;

        let mut candidate = Candidate::new(id, draft.user_id, draft.name, existing.created_at);
        candidate.view_count = existing.view_count;
        draft.changes.apply(&mut candidate);
        self.save(candidate).await
    }

    /// Reads one aggregate and counts the view.
    pub async fn get(&self, id: Uuid) -> Result<CandidateProfile> {
        let candidate = self
            .store
            .record_view(id)
            .await?
            .ok_or_else(|| Error::not_found("Candidate", id))?;
        self.load_profile(candidate).await
    }

    pub async fn list(&self, filter: CandidateFilter) -> Result<Vec<CandidateProfile>> {
        let candidates = self.store.list_candidates(&filter).await?;
        let ids: Vec<Uuid> = candidates.iter().map(|c| c.id).collect();
        let records = if ids.is_empty() {
            Vec::new()
        } else {
            self.store.sections_for(&ids).await?
        };

        let mut profiles: Vec<CandidateProfile> =
            candidates.into_iter().map(CandidateProfile::new).collect();
        let index: HashMap<Uuid, usize> = profiles
            .iter()
            .enumerate()
            .map(|(i, p)| (p.candidate.id, i))
            .collect();
        for record in records {
            if let Some(&slot) = index.get(&record.candidate_id()) {
                profiles[slot].push(record);
            }
        }
        Ok(profiles)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.store.delete_candidate(id).await? {
            return Err(Error::not_found("Candidate", id));
        }
        tracing::info!(candidate_id = %id, "candidate deleted");
        Ok(())
    }

    /// Resolves the account a candidate points at.
    pub async fn linked_user(&self, id: Uuid) -> Result<UserAccount> {
        let candidate = self.require(id).await?;
        self.users
            .find_user(candidate.user_id)
            .await?
            .ok_or(Error::UserNotFound(candidate.user_id))
    }

    /// Accounts behind `profiles`, keyed by user id. Each distinct id is
    /// looked up once; ids the directory does not know are left out.
    pub async fn resolve_users(
        &self,
        profiles: &[CandidateProfile],
    ) -> Result<HashMap<i64, UserAccount>> {
        let ids: BTreeSet<i64> = profiles.iter().map(|p| p.candidate.user_id).collect();
        let mut accounts = HashMap::with_capacity(ids.len());
        for user_id in ids {
            if let Some(account) = self.users.find_user(user_id).await? {
                accounts.insert(user_id, account);
            }
        }
        Ok(accounts)
    }

    async fn require(&self, id: Uuid) -> Result<Candidate> {
        self.store
            .fetch_candidate(id)
            .await?
            .ok_or_else(|| Error::not_found("Candidate", id))
    }

    async fn save(&self, mut candidate: Candidate) -> Result<CandidateProfile> {
        candidate.updated_at = now();
        let id = candidate.id;
        if !self.store.update_candidate(&candidate).await? {
            return Err(Error::not_found("Candidate", id));
        }
        let stored = self.require(id).await?;
        self.load_profile(stored).await
    }

    async fn load_profile(&self, candidate: Candidate) -> Result<CandidateProfile> {
        let records = self.store.sections_for(&[candidate.id]).await?;
        let mut profile = CandidateProfile::new(candidate);
        for record in records {
            profile.push(record);
        }
        Ok(profile)
    }
}

fn build_all<S: SectionWrite>(candidate_id: Uuid, entries: Vec<S::Fields>) -> Vec<S> {
    entries
        .into_iter()
        .map(|fields| S::build(Uuid::new_v4(), candidate_id, fields))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use mockall::mock;
    use mockall::predicate::eq;
    use serde_json::json;

    mock! {
        Directory {}

        #[async_trait]
        impl UserDirectory for Directory {
            async fn find_user(&self, user_id: i64) -> Result<Option<UserAccount>>;
        }
    }

    fn service_with(directory: MockDirectory) -> CandidateService {
        CandidateService::new(Arc::new(MemoryStore::new()), Arc::new(directory))
    }

    fn create_body(user_id: i64) -> CreateCandidatePayload {
        serde_json::from_value(json!({ "user_id": user_id, "name": "Ada" })).expect("body")
    }

    #[tokio::test]
    async fn users_are_resolved_once_per_distinct_id() {
        let mut directory = MockDirectory::new();
        directory.expect_find_user().with(eq(7)).times(1).returning(|id| {
            Ok(Some(UserAccount {
                id,
                username: "grace".into(),
                email: None,
                first_name: None,
                last_name: None,
            }))
        });
        directory.expect_find_user().with(eq(8)).times(1).returning(|_| Ok(None));
        let service = service_with(directory);

        service.create_aggregate(create_body(7)).await.expect("first");
        service.create_aggregate(create_body(7)).await.expect("second");
        service.create_aggregate(create_body(8)).await.expect("third");
        let profiles = service.list(CandidateFilter::default()).await.expect("list");

        let accounts = service.resolve_users(&profiles).await.expect("resolve");
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[&7].username, "grace");
        assert!(!accounts.contains_key(&8));
    }

    #[tokio::test]
    async fn linked_user_is_resolved_through_the_directory() {
        let mut directory = MockDirectory::new();
        directory.expect_find_user().with(eq(42)).times(1).returning(|id| {
            Ok(Some(UserAccount {
                id,
                username: "ada".into(),
                email: None,
                first_name: Some("Ada".into()),
                last_name: None,
            }))
        });
        let service = service_with(directory);

        let profile = service.create_aggregate(create_body(42)).await.expect("create");
        let user = service.linked_user(profile.candidate.id).await.expect("user");
        assert_eq!(user.username, "ada");
    }

    #[tokio::test]
    async fn dangling_user_reference_is_reported() {
        let mut directory = MockDirectory::new();
        directory.expect_find_user().returning(|_| Ok(None));
        let service = service_with(directory);

        let profile = service.create_aggregate(create_body(9)).await.expect("create");
        let err = service.linked_user(profile.candidate.id).await.unwrap_err();
        assert!(matches!(err, Error::UserNotFound(9)));
    }

    #[tokio::test]
    async fn unknown_candidate_never_reaches_the_directory() {
        let mut directory = MockDirectory::new();
        directory.expect_find_user().times(0);
        let service = service_with(directory);

        let err = service.linked_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn replace_keeps_counters_and_children() {
        let service = service_with(MockDirectory::new());
        let body: CreateCandidatePayload = serde_json::from_value(json!({
            "user_id": 1,
            "name": "Ada",
            "skills": ["rust"],
            "projects": [{ "title": "Engine" }]
        }))
        .expect("body");
        let created = service.create_aggregate(body).await.expect("create");
        let id = created.candidate.id;
        service.get(id).await.expect("view");

        let replacement: CreateCandidatePayload = serde_json::from_value(json!({
            "user_id": 2,
            "name": "Ada L.",
            "projects": [{ "title": "Should not be written" }]
        }))
        .expect("body");
        let replaced = service.replace(id, replacement).await.expect("replace");

        assert_eq!(replaced.candidate.name, "Ada L.");
        assert_eq!(replaced.candidate.user_id, 2);
        assert!(replaced.candidate.skills.is_empty());
        assert_eq!(replaced.candidate.view_count, 1);
        assert_eq!(replaced.candidate.created_at, created.candidate.created_at);
        assert_eq!(replaced.projects.len(), 1);
        assert_eq!(replaced.projects[0].title, "Engine");
    }
}
