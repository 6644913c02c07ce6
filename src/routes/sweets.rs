use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::{
        MessageResponse,
        sweets::{CreateSweetRequest, RestockRequest, SweetSearchQuery, UpdateSweetRequest},
    },
    error::AppResult,
    middleware::auth::{AuthUser, Operation, require},
    models::Sweet,
    routes::cart,
    services::catalog_service,
};

pub fn router() -> Router<DbPool> {
    Router::new()
        .route("/", get(list_sweets).post(create_sweet))
        .route("/search", get(search_sweets))
        .nest("/cart", cart::router())
        .route("/{id}", put(update_sweet))
        .route("/{id}", delete(delete_sweet))
        .route("/{id}/purchase", post(purchase_sweet))
        .route("/{id}/restock", post(restock_sweet))
}

#[utoipa::path(
    get,
    path = "/api/sweets",
    responses(
        (status = 200, description = "List all sweets", body = [Sweet])
    ),
    tag = "Sweets"
)]
pub async fn list_sweets(State(pool): State<DbPool>) -> AppResult<Json<Vec<Sweet>>> {
    let sweets = catalog_service::list_sweets(&pool).await?;
    Ok(Json(sweets))
}

#[utoipa::path(
    get,
    path = "/api/sweets/search",
    params(
        ("name" = Option<String>, Query, description = "Case-insensitive name substring"),
        ("category" = Option<String>, Query, description = "Exact category match"),
        ("minPrice" = Option<f64>, Query, description = "Inclusive lower price bound"),
        ("maxPrice" = Option<f64>, Query, description = "Inclusive upper price bound"),
    ),
    responses(
        (status = 200, description = "Matching sweets", body = [Sweet])
    ),
    tag = "Sweets"
)]
pub async fn search_sweets(
    State(pool): State<DbPool>,
    Query(query): Query<SweetSearchQuery>,
) -> AppResult<Json<Vec<Sweet>>> {
    let sweets = catalog_service::search_sweets(&pool, query).await?;
    Ok(Json(sweets))
}

#[utoipa::path(
    post,
    path = "/api/sweets",
    request_body = CreateSweetRequest,
    responses(
        (status = 201, description = "Create sweet", body = Sweet),
        (status = 400, description = "Schema violation"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sweets"
)]
pub async fn create_sweet(
    State(pool): State<DbPool>,
    user: AuthUser,
    Json(payload): Json<CreateSweetRequest>,
) -> AppResult<(StatusCode, Json<Sweet>)> {
    require(&user, Operation::CreateSweet)?;
    let sweet = catalog_service::create_sweet(&pool, payload).await?;
    Ok((StatusCode::CREATED, Json(sweet)))
}

#[utoipa::path(
    put,
    path = "/api/sweets/{id}",
    params(
        ("id" = Uuid, Path, description = "Sweet ID")
    ),
    request_body = UpdateSweetRequest,
    responses(
        (status = 200, description = "Updated sweet", body = Sweet),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Sweet not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sweets"
)]
pub async fn update_sweet(
    State(pool): State<DbPool>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSweetRequest>,
) -> AppResult<Json<Sweet>> {
    require(&user, Operation::UpdateSweet)?;
    let sweet = catalog_service::update_sweet(&pool, id, payload).await?;
    Ok(Json(sweet))
}

#[utoipa::path(
    delete,
    path = "/api/sweets/{id}",
    params(
        ("id" = Uuid, Path, description = "Sweet ID")
    ),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Sweet not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sweets"
)]
pub async fn delete_sweet(
    State(pool): State<DbPool>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    require(&user, Operation::DeleteSweet)?;
    catalog_service::delete_sweet(&pool, id).await?;
    Ok(Json(MessageResponse::new("Sweet deleted")))
}

#[utoipa::path(
    post,
    path = "/api/sweets/{id}/purchase",
    params(
        ("id" = Uuid, Path, description = "Sweet ID")
    ),
    responses(
        (status = 200, description = "Stock decremented by one", body = Sweet),
        (status = 400, description = "Out of stock"),
        (status = 404, description = "Sweet not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sweets"
)]
pub async fn purchase_sweet(
    State(pool): State<DbPool>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Sweet>> {
    require(&user, Operation::PurchaseSweet)?;
    let sweet = catalog_service::purchase_sweet(&pool, id).await?;
    Ok(Json(sweet))
}

#[utoipa::path(
    post,
    path = "/api/sweets/{id}/restock",
    params(
        ("id" = Uuid, Path, description = "Sweet ID")
    ),
    request_body = RestockRequest,
    responses(
        (status = 200, description = "Stock increased", body = Sweet),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Sweet not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sweets"
)]
pub async fn restock_sweet(
    State(pool): State<DbPool>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RestockRequest>,
) -> AppResult<Json<Sweet>> {
    require(&user, Operation::RestockSweet)?;
    let sweet = catalog_service::restock_sweet(&pool, id, payload.quantity).await?;
    Ok(Json(sweet))
}
