//! Standalone endpoints shared by the four candidate collections.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::{
    dto::section_dto::{CreateSectionPayload, SectionListQuery, SectionWrite},
    error::Result,
    extractors::ValidatedJson,
    models::{
        certification::Certification, education::Education, project::Project,
        work_experience::WorkExperience,
    },
    services::section_service::SectionService,
    AppState,
};

/// Binds a collection to its service on the shared state.
pub trait SectionRoute: SectionWrite {
    fn service(state: &AppState) -> &SectionService<Self>;
}

impl SectionRoute for Project {
    fn service(state: &AppState) -> &SectionService<Self> {
        &state.project_service
    }
}

impl SectionRoute for WorkExperience {
    fn service(state: &AppState) -> &SectionService<Self> {
        &state.work_experience_service
    }
}

impl SectionRoute for Education {
    fn service(state: &AppState) -> &SectionService<Self> {
        &state.education_service
    }
}

impl SectionRoute for Certification {
    fn service(state: &AppState) -> &SectionService<Self> {
        &state.certification_service
    }
}

pub fn routes<S: SectionRoute>() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sections::<S>).post(create_section::<S>))
        .route(
            "/:id",
            get(get_section::<S>)
                .put(replace_section::<S>)
                .patch(update_section::<S>)
                .delete(delete_section::<S>),
        )
}

pub async fn list_sections<S: SectionRoute>(
    State(state): State<AppState>,
    Query(query): Query<SectionListQuery>,
) -> Result<Json<Vec<S>>> {
    let items = S::service(&state).list(query.candidate).await?;
    Ok(Json(items))
}

pub async fn create_section<S: SectionRoute>(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateSectionPayload<S::Fields>>,
) -> Result<impl IntoResponse> {
    let item = S::service(&state).create(payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_section<S: SectionRoute>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<S>> {
    Ok(Json(S::service(&state).get(id).await?))
}

pub async fn replace_section<S: SectionRoute>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(fields): ValidatedJson<S::Fields>,
) -> Result<Json<S>> {
    Ok(Json(S::service(&state).replace(id, fields).await?))
}

pub async fn update_section<S: SectionRoute>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(patch): ValidatedJson<S::Patch>,
) -> Result<Json<S>> {
    Ok(Json(S::service(&state).update(id, patch).await?))
}

pub async fn delete_section<S: SectionRoute>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    S::service(&state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
