use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::sweets::{CreateSweetRequest, SweetSearchQuery, UpdateSweetRequest},
    error::{AppError, AppResult},
    models::{Category, Sweet},
};

pub async fn list_sweets(pool: &DbPool) -> AppResult<Vec<Sweet>> {
    let sweets = sqlx::query_as::<_, Sweet>("SELECT * FROM sweets ORDER BY created_at")
        .fetch_all(pool)
        .await?;
    Ok(sweets)
}

pub async fn search_sweets(pool: &DbPool, query: SweetSearchQuery) -> AppResult<Vec<Sweet>> {
    // Absent filters impose no constraint; all present ones are ANDed.
    let sweets = sqlx::query_as::<_, Sweet>(
        r#"
        SELECT * FROM sweets
        WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
          AND ($2::text IS NULL OR category = $2)
          AND ($3::float8 IS NULL OR price >= $3)
          AND ($4::float8 IS NULL OR price <= $4)
        ORDER BY created_at
        "#,
    )
    .bind(query.name)
    .bind(query.category)
    .bind(query.min_price)
    .bind(query.max_price)
    .fetch_all(pool)
    .await?;
    Ok(sweets)
}

pub async fn create_sweet(pool: &DbPool, payload: CreateSweetRequest) -> AppResult<Sweet> {
    if payload.quantity < 0 {
        return Err(AppError::BadRequest("Error creating sweet".into()));
    }

    let sweet = sqlx::query_as::<_, Sweet>(
        r#"
        INSERT INTO sweets (id, name, category, price, quantity, description, image_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.name)
    .bind(payload.category)
    .bind(payload.price)
    .bind(payload.quantity)
    .bind(payload.description)
    .bind(payload.image_url)
    .fetch_one(pool)
    .await?;

    Ok(sweet)
}

pub async fn update_sweet(
    pool: &DbPool,
    id: Uuid,
    payload: UpdateSweetRequest,
) -> AppResult<Sweet> {
    let existing = find_sweet(pool, id).await?;

    // Partial merge of the provided fields onto the current record.
    let name = payload.name.unwrap_or(existing.name);
    let category = payload.category.unwrap_or(existing.category);
    let price = payload.price.unwrap_or(existing.price);
    let quantity = payload.quantity.unwrap_or(existing.quantity);
    let description = payload.description.or(existing.description);
    let image_url = payload.image_url.or(existing.image_url);

    let sweet = sqlx::query_as::<_, Sweet>(
        r#"
        UPDATE sweets
        SET name = $2, category = $3, price = $4, quantity = $5,
            description = $6, image_url = $7
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(category)
    .bind(price)
    .bind(quantity)
    .bind(description)
    .bind(image_url)
    .fetch_one(pool)
    .await?;

    Ok(sweet)
}

pub async fn delete_sweet(pool: &DbPool, id: Uuid) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM sweets WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Sweet not found".into()));
    }
    Ok(())
}

/// Buy a single unit over the counter: read, check, write back. Two
/// concurrent purchases can both pass the check; the schema CHECK is the
/// only floor on stock.
pub async fn purchase_sweet(pool: &DbPool, id: Uuid) -> AppResult<Sweet> {
    let sweet = find_sweet(pool, id).await?;

    if sweet.quantity < 1 {
        return Err(AppError::BadRequest("Out of stock".into()));
    }

    let sweet = save_quantity(pool, id, sweet.quantity - 1).await?;
    Ok(sweet)
}

/// Adds the supplied amount to stock. Negative amounts are accepted and
/// propagated; a result below zero is stopped only by the schema CHECK.
pub async fn restock_sweet(pool: &DbPool, id: Uuid, added: i32) -> AppResult<Sweet> {
    let sweet = find_sweet(pool, id).await?;
    let sweet = save_quantity(pool, id, sweet.quantity + added).await?;
    Ok(sweet)
}

pub async fn find_sweet(pool: &DbPool, id: Uuid) -> AppResult<Sweet> {
    sqlx::query_as::<_, Sweet>("SELECT * FROM sweets WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Sweet not found".into()))
}

pub(crate) async fn save_quantity(pool: &DbPool, id: Uuid, quantity: i32) -> AppResult<Sweet> {
    let sweet =
        sqlx::query_as::<_, Sweet>("UPDATE sweets SET quantity = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(quantity)
            .fetch_one(pool)
            .await?;
    Ok(sweet)
}

pub async fn list_categories(pool: &DbPool) -> AppResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(categories)
}

pub async fn create_category(pool: &DbPool, name: Option<String>) -> AppResult<Category> {
    let name = match name {
        Some(n) if !n.trim().is_empty() => n,
        _ => return Err(AppError::BadRequest("Name is required".into())),
    };

    // Find-then-insert; not atomic. A racing duplicate hits the unique
    // index and surfaces as a store error instead.
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM categories WHERE name = $1")
        .bind(&name)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Err(AppError::BadRequest("Category already exists".into()));
    }

    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (id, name) VALUES ($1, $2) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&name)
    .fetch_one(pool)
    .await?;

    Ok(category)
}

/// No cascade: sweets keep their free-text category name after deletion.
pub async fn delete_category(pool: &DbPool, id: Uuid) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Category not found".into()));
    }
    Ok(())
}
