use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

pub const ROLE_CUSTOMER: &str = "customer";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    #[sqlx(json)]
    pub cart: Vec<CartLine>,
    pub created_at: DateTime<Utc>,
}

/// One (sweet, quantity) pair embedded in a user's cart. The whole array
/// lives in a single JSONB column and is rewritten on every cart edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    #[serde(rename = "sweetId")]
    pub sweet_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Sweet {
    pub id: Uuid,
    pub name: String,
    /// Free text, not a foreign key into `categories`.
    pub category: String,
    pub price: f64,
    /// Units in stock. The schema CHECK keeps this non-negative; nothing
    /// guards concurrent decrements.
    pub quantity: i32,
    pub description: Option<String>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
