use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A past or current position. `end_date` is expected to be absent while
/// `is_current` is set, but the pairing is not checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct WorkExperience {
    pub id: Uuid,
    #[serde(rename = "candidate")]
    pub candidate_id: Uuid,
    pub company_name: String,
    pub role_designation: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_current: bool,
    pub responsibilities: Vec<String>,
    pub technologies_used: Vec<String>,
}
