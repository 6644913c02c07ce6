use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    cart,
    db::DbPool,
    dto::{MessageResponse, cart::AddToCartRequest, cart::ExpandedCartLine},
    error::{AppError, AppResult},
    models::{CartLine, Sweet, User},
    repo::users::UserRepo,
    services::catalog_service,
};

pub async fn add_to_cart(
    pool: &DbPool,
    user_id: Uuid,
    payload: AddToCartRequest,
) -> AppResult<Vec<CartLine>> {
    // Existence check only; stock is not consulted at add time.
    catalog_service::find_sweet(pool, payload.sweet_id).await?;

    let repo = UserRepo::new(pool);
    let mut user = load_user(&repo, user_id).await?;

    cart::add_line(
        &mut user.cart,
        payload.sweet_id,
        cart::requested_quantity(payload.quantity),
    );
    repo.save_cart(user.id, &user.cart).await?;

    Ok(user.cart)
}

pub async fn get_cart(pool: &DbPool, user_id: Uuid) -> AppResult<Vec<ExpandedCartLine>> {
    let repo = UserRepo::new(pool);
    let user = load_user(&repo, user_id).await?;
    expand(pool, &user.cart).await
}

pub async fn update_line(
    pool: &DbPool,
    user_id: Uuid,
    sweet_id: Uuid,
    quantity: i32,
) -> AppResult<Vec<CartLine>> {
    let repo = UserRepo::new(pool);
    let mut user = load_user(&repo, user_id).await?;

    // Silent no-op when no line exists for the sweet.
    if cart::set_quantity(&mut user.cart, sweet_id, quantity) {
        repo.save_cart(user.id, &user.cart).await?;
    }

    Ok(user.cart)
}

pub async fn remove_line(pool: &DbPool, user_id: Uuid, sweet_id: Uuid) -> AppResult<Vec<CartLine>> {
    let repo = UserRepo::new(pool);
    let mut user = load_user(&repo, user_id).await?;

    cart::remove_line(&mut user.cart, sweet_id);
    repo.save_cart(user.id, &user.cart).await?;

    Ok(user.cart)
}

/// Validate-then-deduct-then-clear. Deliberately not atomic: both passes
/// re-read store state, and each decrement persists on its own, so a
/// concurrent purchase between the passes can oversell or strand a
/// half-applied deduction.
pub async fn checkout(pool: &DbPool, user_id: Uuid) -> AppResult<MessageResponse> {
    let repo = UserRepo::new(pool);
    let user = load_user(&repo, user_id).await?;

    if user.cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let lines = expand(pool, &user.cart).await?;

    // Validation pass: abort on the first short line, nothing mutated yet.
    if let Some(name) = first_shortfall(&lines) {
        return Err(AppError::BadRequest(format!("Not enough stock for {name}")));
    }

    // Deduction pass: re-fetch and persist each decrement sequentially.
    for line in &lines {
        let current = catalog_service::find_sweet(pool, line.sweet.id).await?;
        catalog_service::save_quantity(pool, current.id, current.quantity - line.quantity).await?;
    }

    repo.save_cart(user.id, &[]).await?;
    tracing::info!(user_id = %user.id, lines = lines.len(), "cart purchased");

    Ok(MessageResponse::new("Purchase successful"))
}

async fn load_user(repo: &UserRepo<'_>, user_id: Uuid) -> AppResult<User> {
    repo.find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

/// Join each line's sweet reference to the full current record. Lines
/// whose sweet has since been deleted drop out of the expansion.
async fn expand(pool: &DbPool, lines: &[CartLine]) -> AppResult<Vec<ExpandedCartLine>> {
    if lines.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = lines.iter().map(|line| line.sweet_id).collect();
    let sweets = sqlx::query_as::<_, Sweet>("SELECT * FROM sweets WHERE id = ANY($1)")
        .bind(&ids)
        .fetch_all(pool)
        .await?;

    let mut by_id: HashMap<Uuid, Sweet> =
        sweets.into_iter().map(|sweet| (sweet.id, sweet)).collect();

    Ok(lines
        .iter()
        .filter_map(|line| {
            by_id.remove(&line.sweet_id).map(|sweet| ExpandedCartLine {
                sweet,
                quantity: line.quantity,
            })
        })
        .collect())
}

/// First line whose requested quantity exceeds current stock, if any.
/// Later lines stay unchecked once one fails.
fn first_shortfall(lines: &[ExpandedCartLine]) -> Option<&str> {
    lines
        .iter()
        .find(|line| line.sweet.quantity < line.quantity)
        .map(|line| line.sweet.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn expanded(name: &str, in_stock: i32, requested: i32) -> ExpandedCartLine {
        ExpandedCartLine {
            sweet: Sweet {
                id: Uuid::new_v4(),
                name: name.to_string(),
                category: "Milk".to_string(),
                price: 10.0,
                quantity: in_stock,
                description: None,
                image_url: None,
                created_at: Utc::now(),
            },
            quantity: requested,
        }
    }

    #[test]
    fn shortfall_reports_first_short_line_only() {
        let lines = vec![
            expanded("Laddu", 5, 2),
            expanded("Barfi", 1, 3),
            expanded("Jalebi", 0, 1),
        ];
        assert_eq!(first_shortfall(&lines), Some("Barfi"));
    }

    #[test]
    fn exact_stock_is_sufficient() {
        let lines = vec![expanded("Laddu", 2, 2)];
        assert_eq!(first_shortfall(&lines), None);
    }

    #[test]
    fn empty_expansion_has_no_shortfall() {
        assert_eq!(first_shortfall(&[]), None);
    }
}
