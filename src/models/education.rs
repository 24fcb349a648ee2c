use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Education {
    pub id: Uuid,
    #[serde(rename = "candidate")]
    pub candidate_id: Uuid,
    pub degree: String,
    pub institution: String,
    pub field_of_study: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub gpa: Option<f64>,
    pub activities_achievements: Vec<String>,
}
