pub mod candidate_routes;
pub mod health;
pub mod section_routes;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::{cors::permissive_cors, rate_limit};
use crate::models::{
    certification::Certification, education::Education, project::Project,
    section::{Section, SectionKind}, work_experience::WorkExperience,
};
use crate::AppState;

fn collection_path(kind: SectionKind) -> String {
    format!("/{}", kind.collection())
}

/// The complete HTTP surface. `/api` is throttled to `api_rps` requests per
/// second; `/health` is not.
pub fn app(state: AppState, api_rps: u32) -> Router {
    let api = Router::new()
        .nest("/candidates", candidate_routes::routes())
        .nest(
            &collection_path(Project::KIND),
            section_routes::routes::<Project>(),
        )
        .nest(
            &collection_path(WorkExperience::KIND),
            section_routes::routes::<WorkExperience>(),
        )
        .nest(
            &collection_path(Education::KIND),
            section_routes::routes::<Education>(),
        )
        .nest(
            &collection_path(Certification::KIND),
            section_routes::routes::<Certification>(),
        )
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::new_rps_state(api_rps),
            rate_limit::rps_middleware,
        ));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .with_state(state)
        .layer(permissive_cors())
        .layer(TraceLayer::new_for_http())
}
