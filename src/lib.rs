pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod utils;

use std::sync::Arc;

use crate::config::{Config, StorageBackend};
use crate::error::Result;
use crate::models::{
    certification::Certification, education::Education, project::Project,
    work_experience::WorkExperience,
};
use crate::services::{candidate_service::CandidateService, section_service::SectionService};
use crate::store::{
    CandidateStore, MemoryStore, MemoryUserDirectory, PgStore, PgUserDirectory, UserDirectory,
};

#[derive(Clone)]
pub struct AppState {
    pub backend: StorageBackend,
    pub candidate_service: CandidateService,
    pub project_service: SectionService<Project>,
    pub work_experience_service: SectionService<WorkExperience>,
    pub education_service: SectionService<Education>,
    pub certification_service: SectionService<Certification>,
}

impl AppState {
    pub fn new(
        backend: StorageBackend,
        store: Arc<dyn CandidateStore>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            backend,
            candidate_service: CandidateService::new(store.clone(), users),
            project_service: SectionService::new(store.clone()),
            work_experience_service: SectionService::new(store.clone()),
            education_service: SectionService::new(store.clone()),
            certification_service: SectionService::new(store),
        }
    }

    /// Process-local state with an empty store and user directory.
    pub fn in_memory() -> Self {
        Self::in_memory_with_users(Arc::new(MemoryUserDirectory::new()))
    }

    pub fn in_memory_with_users(users: Arc<dyn UserDirectory>) -> Self {
        Self::new(StorageBackend::Memory, Arc::new(MemoryStore::new()), users)
    }

    pub async fn from_config(config: &Config) -> Result<Self> {
        match config.storage_backend {
            StorageBackend::Memory => Ok(Self::in_memory()),
            StorageBackend::Postgres => {
                let pool = database::pool::create_pool(config).await?;
                if config.run_migrations {
                    database::pool::run_migrations(&pool).await?;
                }
                Ok(Self::new(
                    StorageBackend::Postgres,
                    Arc::new(PgStore::new(pool.clone())),
                    Arc::new(PgUserDirectory::new(pool)),
                ))
            }
        }
    }
}
