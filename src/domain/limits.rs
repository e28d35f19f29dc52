//! Bounds imposed by the columns the domain is stored in.

use bigdecimal::BigDecimal;

use super::errors::DomainError;

/// `VARCHAR(64)` codes: product and coupon codes.
pub const CODE_MAX_LEN: usize = 64;

/// `VARCHAR(255)` names and references.
pub const NAME_MAX_LEN: usize = 255;

/// Largest amount a `NUMERIC(12,2)` money column holds.
pub fn max_amount() -> BigDecimal {
    BigDecimal::new(999_999_999_999_i64.into(), 2)
}

/// Rejects values with more than two decimal places.
pub fn check_cents(field: &str, value: &BigDecimal) -> Result<(), DomainError> {
    if value.with_scale(2) != *value {
        return Err(DomainError::invalid(format!(
            "{field} must have at most 2 decimal places"
        )));
    }
    Ok(())
}

/// A money value that fits `NUMERIC(12,2)` without rounding.
pub fn check_amount(field: &str, value: &BigDecimal) -> Result<(), DomainError> {
    check_cents(field, value)?;
    if value.abs() > max_amount() {
        return Err(DomainError::invalid(format!("{field} is too large")));
    }
    Ok(())
}

/// Length in characters, as Postgres counts `VARCHAR(n)`.
pub fn check_len(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.chars().count() > max {
        return Err(DomainError::invalid(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}
