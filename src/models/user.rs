use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account record owned by the external identity store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
