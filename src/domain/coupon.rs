use bigdecimal::BigDecimal;

use super::errors::DomainError;
use super::limits::{check_cents, check_len, CODE_MAX_LEN};

#[derive(Debug, Clone)]
pub struct Coupon {
    pub id: i32,
    pub code: String,
    pub discount_percentage: BigDecimal,
    pub active: bool,
}

impl Coupon {
    /// Applies the discount to `total`, rounded to cents. Coupons are never
    /// persisted against an order; this is for callers that want to display
    /// the reduced amount.
    pub fn discounted_total(&self, total: &BigDecimal) -> BigDecimal {
        let hundred = BigDecimal::from(100);
        let remaining = &hundred - &self.discount_percentage;
        (total * remaining / hundred).round(2)
    }
}

#[derive(Debug, Clone)]
pub struct ApplyCoupon {
    /// Accepted for the record but not used for eligibility.
    pub user_id: i32,
    pub code: String,
}

#[derive(Debug, Clone)]
pub struct NewCoupon {
    pub code: String,
    pub discount_percentage: BigDecimal,
}

impl NewCoupon {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.code.trim().is_empty() {
            return Err(DomainError::invalid("code must not be empty"));
        }
        check_len("code", self.code.trim(), CODE_MAX_LEN)?;
        check_cents("discountPercentage", &self.discount_percentage)?;
        if self.discount_percentage <= BigDecimal::from(0)
            || self.discount_percentage > BigDecimal::from(100)
        {
            return Err(DomainError::invalid(
                "discountPercentage must be greater than 0 and at most 100",
            ));
        }
        Ok(())
    }
}
