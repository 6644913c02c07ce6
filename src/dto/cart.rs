use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Sweet;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    #[serde(rename = "sweetId")]
    pub sweet_id: Uuid,
    /// A missing or zero value defaults to 1.
    pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartLineRequest {
    pub quantity: i32,
}

/// A cart line with its sweet reference expanded to the full current
/// record, as returned by GET /api/sweets/cart.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExpandedCartLine {
    pub sweet: Sweet,
    pub quantity: i32,
}
