use std::marker::PhantomData;
use std::sync::Arc;

use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::dto::section_dto::{CreateSectionPayload, SectionWrite};
use crate::error::{Error, Result};
use crate::models::section::{Section, SectionRecord};
use crate::store::CandidateStore;
use crate::utils::validation::{field_error, require, ProfileRule};

/// Standalone CRUD over one child collection.
pub struct SectionService<S> {
    store: Arc<dyn CandidateStore>,
    _section: PhantomData<fn() -> S>,
}

impl<S> Clone for SectionService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _section: PhantomData,
        }
    }
}

impl<S: SectionWrite> SectionService<S> {
    pub fn new(store: Arc<dyn CandidateStore>) -> Self {
        Self {
            store,
            _section: PhantomData,
        }
    }

    pub async fn list(&self, candidate_id: Option<Uuid>) -> Result<Vec<S>> {
        self.store
            .list_sections(S::KIND, candidate_id)
            .await?
            .into_iter()
            .map(typed::<S>)
            .collect()
    }

    pub async fn get(&self, id: Uuid) -> Result<S> {
        let record = self
            .store
            .fetch_section(S::KIND, id)
            .await?
            .ok_or_else(|| Error::not_found(S::KIND.label(), id))?;
        typed(record)
    }

    pub async fn create(&self, payload: CreateSectionPayload<S::Fields>) -> Result<S> {
        let mut errors = payload.fields.validate().err().unwrap_or_else(ValidationErrors::new);
        let candidate_id = require("candidate_id", payload.candidate_id, &mut errors);
        let Some(candidate_id) = candidate_id.filter(|_| errors.is_empty()) else {
            return Err(errors.into());
        };
        if self.store.fetch_candidate(candidate_id).await?.is_none() {
            return Err(field_error("candidate_id", ProfileRule::UnknownCandidate).into());
        }

        let section = S::build(Uuid::new_v4(), candidate_id, payload.fields);
        self.store.insert_section(&section.clone().into_record()).await?;
        tracing::info!(
            kind = %S::KIND,
            id = %section.id(),
            candidate_id = %section.candidate_id(),
            "section created"
        );
        Ok(section)
    }

    pub async fn replace(&self, id: Uuid, fields: S::Fields) -> Result<S> {
        let mut section = self.get(id).await?;
        fields.validate()?;
        section.replace(fields);
        self.write(section).await
    }

    pub async fn update(&self, id: Uuid, patch: S::Patch) -> Result<S> {
        let mut section = self.get(id).await?;
        patch.validate()?;
        section.patch(patch);
        self.write(section).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.store.delete_section(S::KIND, id).await? {
            return Err(Error::not_found(S::KIND.label(), id));
        }
        tracing::info!(kind = %S::KIND, id = %id, "section deleted");
        Ok(())
    }

    async fn write(&self, section: S) -> Result<S> {
        let id = section.id();
        if !self.store.update_section(&section.clone().into_record()).await? {
            return Err(Error::not_found(S::KIND.label(), id));
        }
        Ok(section)
    }
}

fn typed<S: Section>(record: SectionRecord) -> Result<S> {
    let kind = record.kind();
    S::from_record(record).ok_or_else(|| {
        Error::Internal(format!("store returned {} where {} was expected", kind, S::KIND))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::section_dto::{EducationFields, EducationPatch};
    use crate::models::education::Education;
    use crate::store::MemoryStore;

    fn fields(degree: &str) -> EducationFields {
        EducationFields {
            degree: Some(degree.into()),
            institution: Some("MIT".into()),
            field_of_study: None,
            start_date: None,
            end_date: None,
            gpa: Some(3.9),
            activities_achievements: vec![],
        }
    }

    #[tokio::test]
    async fn create_rejects_unknown_parent() {
        let service = SectionService::<Education>::new(Arc::new(MemoryStore::new()));
        let err = service
            .create(CreateSectionPayload {
                candidate_id: Some(Uuid::new_v4()),
                fields: fields("BSc"),
            })
            .await
            .unwrap_err();
        match err {
            Error::Validation(errors) => {
                assert!(errors.field_errors().contains_key("candidate_id"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_reports_missing_parent_with_field_errors() {
        let service = SectionService::<Education>::new(Arc::new(MemoryStore::new()));
        let mut incomplete = fields("BSc");
        incomplete.institution = None;
        let err = service
            .create(CreateSectionPayload {
                candidate_id: None,
                fields: incomplete,
            })
            .await
            .unwrap_err();
        match err {
            Error::Validation(errors) => {
                let fields = errors.field_errors();
                assert_eq!(fields["candidate_id"][0].code, "required");
                assert_eq!(fields["institution"][0].code, "required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_entries_are_not_found() {
        let service = SectionService::<Education>::new(Arc::new(MemoryStore::new()));
        let id = Uuid::new_v4();
        assert!(matches!(service.get(id).await, Err(Error::NotFound(_))));
        assert!(matches!(
            service.update(id, EducationPatch::default()).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(service.delete(id).await, Err(Error::NotFound(_))));
        assert!(service.list(None).await.expect("list").is_empty());
    }
}
