use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::{
        MessageResponse,
        cart::{AddToCartRequest, ExpandedCartLine, UpdateCartLineRequest},
    },
    error::AppResult,
    middleware::auth::{AuthUser, Operation, require},
    models::CartLine,
    services::cart_service,
};

// Nested under /api/sweets/cart.
pub fn router() -> Router<DbPool> {
    Router::new()
        .route("/", get(get_cart))
        .route("/add", post(add_to_cart))
        .route("/purchase", post(purchase_cart))
        .route("/{sweet_id}", put(update_cart_line))
        .route("/{sweet_id}", delete(remove_from_cart))
}

#[utoipa::path(
    post,
    path = "/api/sweets/cart/add",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Updated cart lines", body = [CartLine]),
        (status = 404, description = "Sweet not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(pool): State<DbPool>,
    user: AuthUser,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<Vec<CartLine>>> {
    require(&user, Operation::EditCart)?;
    let cart = cart_service::add_to_cart(&pool, user.user_id, payload).await?;
    Ok(Json(cart))
}

#[utoipa::path(
    get,
    path = "/api/sweets/cart",
    responses(
        (status = 200, description = "Cart lines with expanded sweets", body = [ExpandedCartLine]),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn get_cart(
    State(pool): State<DbPool>,
    user: AuthUser,
) -> AppResult<Json<Vec<ExpandedCartLine>>> {
    require(&user, Operation::EditCart)?;
    let cart = cart_service::get_cart(&pool, user.user_id).await?;
    Ok(Json(cart))
}

#[utoipa::path(
    put,
    path = "/api/sweets/cart/{sweet_id}",
    params(
        ("sweet_id" = Uuid, Path, description = "Sweet ID")
    ),
    request_body = UpdateCartLineRequest,
    responses(
        (status = 200, description = "Updated cart lines; quantity <= 0 removes the line", body = [CartLine]),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_cart_line(
    State(pool): State<DbPool>,
    user: AuthUser,
    Path(sweet_id): Path<Uuid>,
    Json(payload): Json<UpdateCartLineRequest>,
) -> AppResult<Json<Vec<CartLine>>> {
    require(&user, Operation::EditCart)?;
    let cart = cart_service::update_line(&pool, user.user_id, sweet_id, payload.quantity).await?;
    Ok(Json(cart))
}

#[utoipa::path(
    delete,
    path = "/api/sweets/cart/{sweet_id}",
    params(
        ("sweet_id" = Uuid, Path, description = "Sweet ID")
    ),
    responses(
        (status = 200, description = "Updated cart lines", body = [CartLine]),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(pool): State<DbPool>,
    user: AuthUser,
    Path(sweet_id): Path<Uuid>,
) -> AppResult<Json<Vec<CartLine>>> {
    require(&user, Operation::EditCart)?;
    let cart = cart_service::remove_line(&pool, user.user_id, sweet_id).await?;
    Ok(Json(cart))
}

#[utoipa::path(
    post,
    path = "/api/sweets/cart/purchase",
    responses(
        (status = 200, description = "Cart purchased and cleared", body = MessageResponse),
        (status = 400, description = "Empty cart or insufficient stock"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn purchase_cart(
    State(pool): State<DbPool>,
    user: AuthUser,
) -> AppResult<Json<MessageResponse>> {
    require(&user, Operation::EditCart)?;
    let resp = cart_service::checkout(&pool, user.user_id).await?;
    Ok(Json(resp))
}
