use serde::Serialize;
use utoipa::ToSchema;

pub mod auth;
pub mod cart;
pub mod categories;
pub mod sweets;

/// Plain acknowledgment body used by mutations that return no record.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
