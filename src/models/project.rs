use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    #[serde(rename = "candidate")]
    pub candidate_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub tech_stack: Vec<String>,
    pub role_in_project: Option<String>,
    pub github_link: Option<String>,
    pub live_link: Option<String>,
}
