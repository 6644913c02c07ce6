use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppResult,
    models::{CartLine, User},
};

/// The single typed accessor for the user store. Every service that needs
/// a user record goes through here rather than issuing ad-hoc queries.
pub struct UserRepo<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }

    pub async fn insert(&self, username: &str, password_hash: &str, role: &str) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .fetch_one(self.pool)
        .await?;
        Ok(user)
    }

    /// Persist the whole cart array in one write. Last write wins; there
    /// is no per-line merging of concurrent edits.
    pub async fn save_cart(&self, id: Uuid, cart: &[CartLine]) -> AppResult<()> {
        sqlx::query("UPDATE users SET cart = $2 WHERE id = $1")
            .bind(id)
            .bind(Json(cart))
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
