use bigdecimal::BigDecimal;

use super::errors::DomainError;
use super::limits::max_amount;

/// Largest quantity a single cart line may hold.
pub const MAX_LINE_QUANTITY: i32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartItemInput {
    pub product_variant_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct CartLineView {
    pub id: i32,
    pub product_variant_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub line_total: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct CartView {
    pub cart_id: Option<i32>,
    pub user_id: i32,
    pub lines: Vec<CartLineView>,
}

impl CartView {
    pub fn empty(user_id: i32) -> Self {
        Self {
            cart_id: None,
            user_id,
            lines: vec![],
        }
    }

    /// Recomputed from the lines on every call.
    pub fn subtotal(&self) -> BigDecimal {
        self.lines.iter().map(|l| &l.line_total).sum()
    }
}

/// Price times quantity, refused once it no longer fits an order total.
pub fn line_total(unit_price: &BigDecimal, quantity: i32) -> Result<BigDecimal, DomainError> {
    let total = unit_price * BigDecimal::from(quantity);
    if total > max_amount() {
        return Err(DomainError::invalid(
            "line total exceeds the maximum order amount",
        ));
    }
    Ok(total)
}

/// Every cart must stay checkoutable: its subtotal becomes the order total.
pub fn check_subtotal(subtotal: &BigDecimal) -> Result<(), DomainError> {
    if *subtotal > max_amount() {
        return Err(DomainError::invalid(
            "cart subtotal exceeds the maximum order amount",
        ));
    }
    Ok(())
}

pub fn validate_quantity(quantity: i32) -> Result<(), DomainError> {
    if quantity <= 0 {
        return Err(DomainError::invalid("quantity must be a positive integer"));
    }
    if quantity > MAX_LINE_QUANTITY {
        return Err(DomainError::invalid(format!(
            "quantity must be at most {MAX_LINE_QUANTITY}"
        )));
    }
    Ok(())
}
