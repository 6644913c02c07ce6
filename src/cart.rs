//! Pure mutations over a user's embedded cart array.
//!
//! The cart is one JSONB array rewritten wholesale on every edit, so all
//! invariants (at most one line per sweet, no non-positive quantities)
//! live here rather than in the store.

use uuid::Uuid;

use crate::models::CartLine;

/// Quantity requested by an add-to-cart. A missing or explicit zero value
/// means 1, so an add never creates a zero-quantity line; other values
/// (including negatives) pass through untouched.
pub fn requested_quantity(quantity: Option<i32>) -> i32 {
    quantity.filter(|&q| q != 0).unwrap_or(1)
}

/// Merge-or-append: an existing line for the sweet has its quantity
/// incremented, otherwise a new line is pushed.
pub fn add_line(cart: &mut Vec<CartLine>, sweet_id: Uuid, quantity: i32) {
    if let Some(line) = cart.iter_mut().find(|line| line.sweet_id == sweet_id) {
        line.quantity += quantity;
    } else {
        cart.push(CartLine { sweet_id, quantity });
    }
}

/// Set a line's quantity exactly; a value <= 0 removes the line instead.
/// Returns false when no line exists for the sweet (caller treats that as
/// a silent no-op).
pub fn set_quantity(cart: &mut Vec<CartLine>, sweet_id: Uuid, quantity: i32) -> bool {
    let Some(line) = cart.iter_mut().find(|line| line.sweet_id == sweet_id) else {
        return false;
    };
    line.quantity = quantity;
    if quantity <= 0 {
        remove_line(cart, sweet_id);
    }
    true
}

pub fn remove_line(cart: &mut Vec<CartLine>, sweet_id: Uuid) {
    cart.retain(|line| line.sweet_id != sweet_id);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(sweet_id: Uuid, quantity: i32) -> CartLine {
        CartLine { sweet_id, quantity }
    }

    #[test]
    fn add_accumulates_instead_of_duplicating() {
        let id = Uuid::new_v4();
        let mut cart = Vec::new();

        add_line(&mut cart, id, 1);
        add_line(&mut cart, id, 1);

        assert_eq!(cart, vec![line(id, 2)]);
    }

    #[test]
    fn zero_or_missing_requested_quantity_falls_back_to_one() {
        assert_eq!(requested_quantity(None), 1);
        assert_eq!(requested_quantity(Some(0)), 1);
        assert_eq!(requested_quantity(Some(3)), 3);
        assert_eq!(requested_quantity(Some(-2)), -2);
    }

    #[test]
    fn add_with_defaulted_quantity_never_stores_a_zero_line() {
        let id = Uuid::new_v4();
        let mut cart = Vec::new();

        add_line(&mut cart, id, requested_quantity(Some(0)));

        assert_eq!(cart, vec![line(id, 1)]);
    }

    #[test]
    fn add_appends_distinct_sweets_in_order() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let mut cart = Vec::new();

        add_line(&mut cart, first, 2);
        add_line(&mut cart, second, 3);

        assert_eq!(cart, vec![line(first, 2), line(second, 3)]);
    }

    #[test]
    fn set_quantity_overwrites_exactly() {
        let id = Uuid::new_v4();
        let mut cart = vec![line(id, 5)];

        assert!(set_quantity(&mut cart, id, 2));
        assert_eq!(cart, vec![line(id, 2)]);
    }

    #[test]
    fn set_quantity_at_or_below_zero_removes_the_line() {
        let id = Uuid::new_v4();
        let other = Uuid::new_v4();

        let mut cart = vec![line(id, 5), line(other, 1)];
        assert!(set_quantity(&mut cart, id, 0));
        assert_eq!(cart, vec![line(other, 1)]);

        let mut cart = vec![line(id, 5)];
        assert!(set_quantity(&mut cart, id, -3));
        assert!(cart.is_empty());
    }

    #[test]
    fn set_quantity_on_missing_line_is_a_noop() {
        let id = Uuid::new_v4();
        let mut cart = vec![line(id, 5)];

        assert!(!set_quantity(&mut cart, Uuid::new_v4(), 9));
        assert_eq!(cart, vec![line(id, 5)]);
    }

    #[test]
    fn remove_is_idempotent() {
        let id = Uuid::new_v4();
        let mut cart = vec![line(id, 5)];

        remove_line(&mut cart, id);
        remove_line(&mut cart, id);

        assert!(cart.is_empty());
    }
}
