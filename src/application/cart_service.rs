use crate::domain::cart::{validate_quantity, CartItemInput, CartView};
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;

pub struct CartService<R> {
    repo: R,
}

fn validate_user(user_id: i32) -> Result<(), DomainError> {
    if user_id <= 0 {
        return Err(DomainError::invalid("userId must be a positive integer"));
    }
    Ok(())
}

/// Folds repeated variants into one item so each variant is written once.
fn coalesce(items: &[CartItemInput]) -> Result<Vec<CartItemInput>, DomainError> {
    let mut merged: Vec<CartItemInput> = Vec::with_capacity(items.len());
    for item in items {
        match merged
            .iter_mut()
            .find(|m| m.product_variant_id == item.product_variant_id)
        {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(item.quantity)
                    .ok_or_else(|| DomainError::invalid("quantity is too large"))?;
            }
            None => merged.push(*item),
        }
    }
    for item in &merged {
        validate_quantity(item.quantity)?;
    }
    Ok(merged)
}

impl<R: CartRepository> CartService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get_cart(&self, user_id: i32) -> Result<CartView, DomainError> {
        validate_user(user_id)?;
        Ok(self
            .repo
            .find_by_user(user_id)?
            .unwrap_or_else(|| CartView::empty(user_id)))
    }

    pub fn add_items(
        &self,
        user_id: i32,
        items: Vec<CartItemInput>,
    ) -> Result<CartView, DomainError> {
        validate_user(user_id)?;
        if items.is_empty() {
            return Err(DomainError::invalid("products must not be empty"));
        }
        for item in &items {
            if item.product_variant_id <= 0 {
                return Err(DomainError::invalid(
                    "productVariantId must be a positive integer",
                ));
            }
            validate_quantity(item.quantity)?;
        }

        self.repo.add_items(user_id, &coalesce(&items)?)?;
        self.get_cart(user_id)
    }

    pub fn update_quantity(
        &self,
        user_id: i32,
        line_id: i32,
        quantity: i32,
    ) -> Result<CartView, DomainError> {
        validate_user(user_id)?;
        validate_quantity(quantity)?;
        self.repo.update_quantity(user_id, line_id, quantity)?;
        self.get_cart(user_id)
    }

    pub fn remove_line(&self, user_id: i32, line_id: i32) -> Result<CartView, DomainError> {
        validate_user(user_id)?;
        self.repo.remove_line(user_id, line_id)?;
        self.get_cart(user_id)
    }
}
