use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::{
    dto::candidate_dto::{
        CandidateListQuery, CandidateResponse, CreateCandidatePayload, UpdateCandidatePayload,
    },
    error::Result,
    extractors::ValidatedJson,
    models::candidate::CandidateProfile,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_candidates).post(create_candidate))
        .route(
            "/:id",
            get(get_candidate)
                .put(replace_candidate)
                .patch(update_candidate)
                .delete(delete_candidate),
        )
        .route("/:id/user", get(get_candidate_user))
}

#[axum::debug_handler]
pub async fn list_candidates(
    State(state): State<AppState>,
    Query(query): Query<CandidateListQuery>,
) -> Result<impl IntoResponse> {
    let filter = query.into_filter()?;
    let profiles = state.candidate_service.list(filter).await?;
    let users = state.candidate_service.resolve_users(&profiles).await?;
    let body: Vec<CandidateResponse> = profiles
        .into_iter()
        .map(|profile| {
            let user = users.get(&profile.candidate.user_id).cloned();
            CandidateResponse::new(profile, user)
        })
        .collect();
    Ok(Json(body))
}

#[axum::debug_handler]
pub async fn create_candidate(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateCandidatePayload>,
) -> Result<impl IntoResponse> {
    let profile = state.candidate_service.create_aggregate(payload).await?;
    Ok((StatusCode::CREATED, Json(respond(&state, profile).await?)))
}

#[axum::debug_handler]
pub async fn get_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let profile = state.candidate_service.get(id).await?;
    Ok(Json(respond(&state, profile).await?))
}

#[axum::debug_handler]
pub async fn replace_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateCandidatePayload>,
) -> Result<impl IntoResponse> {
    let profile = state.candidate_service.replace(id, payload).await?;
    Ok(Json(respond(&state, profile).await?))
}

#[axum::debug_handler]
pub async fn update_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCandidatePayload>,
) -> Result<impl IntoResponse> {
    let profile = state.candidate_service.update_partial(id, payload).await?;
    Ok(Json(respond(&state, profile).await?))
}

#[axum::debug_handler]
pub async fn delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.candidate_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The identity-store account behind a candidate.
#[axum::debug_handler]
pub async fn get_candidate_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user = state.candidate_service.linked_user(id).await?;
    Ok(Json(user))
}

async fn respond(state: &AppState, profile: CandidateProfile) -> Result<CandidateResponse> {
    let mut users = state
        .candidate_service
        .resolve_users(std::slice::from_ref(&profile))
        .await?;
    let user = users.remove(&profile.candidate.user_id);
    Ok(CandidateResponse::new(profile, user))
}
