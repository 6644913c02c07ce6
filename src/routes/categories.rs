use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::{MessageResponse, categories::CreateCategoryRequest},
    error::AppResult,
    middleware::auth::{AuthUser, Operation, require},
    models::Category,
    services::catalog_service,
};

pub fn router() -> Router<DbPool> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/{id}", delete(delete_category))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "List categories sorted by name", body = [Category])
    ),
    tag = "Categories"
)]
pub async fn list_categories(State(pool): State<DbPool>) -> AppResult<Json<Vec<Category>>> {
    let categories = catalog_service::list_categories(&pool).await?;
    Ok(Json(categories))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Create category", body = Category),
        (status = 400, description = "Missing or duplicate name"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn create_category(
    State(pool): State<DbPool>,
    user: AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    require(&user, Operation::CreateCategory)?;
    let category = catalog_service::create_category(&pool, payload.name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Category not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn delete_category(
    State(pool): State<DbPool>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    require(&user, Operation::DeleteCategory)?;
    catalog_service::delete_category(&pool, id).await?;
    Ok(Json(MessageResponse::new("Category deleted")))
}
