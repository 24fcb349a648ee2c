use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Certification {
    pub id: Uuid,
    #[serde(rename = "candidate")]
    pub candidate_id: Uuid,
    pub name: String,
    pub issuing_organization: Option<String>,
    pub issue_date: Option<DateTime<Utc>>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub credential_id: Option<String>,
    pub credential_url: Option<String>,
}
