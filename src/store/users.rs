use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{Error, Result};
use crate::models::user::UserAccount;

/// Lookup into the external identity store that owns user accounts.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user(&self, user_id: i64) -> Result<Option<UserAccount>>;
}

#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_user(&self, user_id: i64) -> Result<Option<UserAccount>> {
        let user = sqlx::query_as::<_, UserAccount>(
            r#"
            SELECT id, username, email, first_name, last_name
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    users: RwLock<HashMap<i64, UserAccount>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = UserAccount>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().map(|u| (u.id, u)).collect()),
        }
    }

    pub fn insert(&self, user: UserAccount) -> Result<()> {
        self.users
            .write()
            .map_err(|_| Error::Storage("user directory lock poisoned".to_string()))?
            .insert(user.id, user);
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_user(&self, user_id: i64) -> Result<Option<UserAccount>> {
        let users = self
            .users
            .read()
            .map_err(|_| Error::Storage("user directory lock poisoned".to_string()))?;
        Ok(users.get(&user_id).cloned())
    }
}
