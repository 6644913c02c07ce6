use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    /// Optional at the wire level so an absent name yields the
    /// "Name is required" validation error rather than a decode failure.
    pub name: Option<String>,
}
