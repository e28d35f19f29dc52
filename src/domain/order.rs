use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use rand::Rng;

use super::errors::DomainError;
use super::limits::{check_len, NAME_MAX_LEN};

/// Smallest and largest decorative order number handed out at checkout.
pub const ORDER_NUMBER_RANGE: std::ops::RangeInclusive<i32> = 100_000..=99_999_999;

/// Status every freshly placed order starts in (`order_statuses` row 2).
pub const PLACED_ORDER_STATUS_ID: i32 = 2;

/// Initial status of the payment record written at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    /// Prepaid methods: the money has already moved.
    Completed,
    /// Cash on delivery: collected when the parcel arrives.
    Pending,
}

impl PaymentStatus {
    /// Derives the initial status from the chosen payment method. Only the
    /// reserved cash-on-delivery method yields `Pending`.
    pub fn for_method(payment_method_id: i32, cash_on_delivery_method_id: i32) -> Self {
        if payment_method_id == cash_on_delivery_method_id {
            PaymentStatus::Pending
        } else {
            PaymentStatus::Completed
        }
    }

    /// Primary key in `payment_statuses`.
    pub fn id(self) -> i32 {
        match self {
            PaymentStatus::Completed => 1,
            PaymentStatus::Pending => 2,
        }
    }
}

/// Draws a display-only order number. Not unique; the order id is the
/// canonical reference.
pub fn generate_order_number<R: Rng>(rng: &mut R) -> i32 {
    rng.gen_range(ORDER_NUMBER_RANGE)
}

/// What the caller asks for at checkout.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub user_id: i32,
    pub cart_id: Option<i32>,
    pub payment_method_id: i32,
    pub shipping_method_id: i32,
    pub shipping_address: String,
    pub transaction_id: Option<String>,
}

impl CheckoutRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.user_id <= 0 {
            return Err(DomainError::invalid("userId must be a positive integer"));
        }
        if self.payment_method_id <= 0 {
            return Err(DomainError::invalid(
                "paymentMethodId must be a positive integer",
            ));
        }
        if self.shipping_method_id <= 0 {
            return Err(DomainError::invalid(
                "shippingMethodId must be a positive integer",
            ));
        }
        if matches!(self.cart_id, Some(id) if id <= 0) {
            return Err(DomainError::invalid("cartId must be a positive integer"));
        }
        if self.shipping_address.trim().is_empty() {
            return Err(DomainError::invalid("shippingAddress must not be empty"));
        }
        if let Some(transaction_id) = &self.transaction_id {
            check_len("transactionId", transaction_id, NAME_MAX_LEN)?;
        }
        Ok(())
    }
}

/// A fully resolved checkout, ready for the repository to persist.
#[derive(Debug, Clone)]
pub struct Checkout {
    pub user_id: i32,
    pub cart_id: Option<i32>,
    pub payment_method_id: i32,
    pub shipping_method_id: i32,
    pub shipping_address: String,
    pub transaction_id: Option<String>,
    pub payment_status: PaymentStatus,
    pub order_number: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    pub order_id: i32,
    pub order_number: i32,
    pub total_amount: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub id: i32,
    pub product_variant_id: i32,
    pub quantity: i32,
    pub line_total: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct PaymentView {
    pub payment_method_id: i32,
    pub payment_status_id: i32,
    pub transaction_id: Option<String>,
    pub payment_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ShipmentView {
    pub shipping_method_id: i32,
    pub address: String,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: i32,
    pub user_id: i32,
    pub total_amount: BigDecimal,
    pub order_number: i32,
    pub order_date: DateTime<Utc>,
    pub order_status_id: i32,
    pub lines: Vec<OrderLineView>,
    pub payment: Option<PaymentView>,
    pub shipment: Option<ShipmentView>,
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<OrderView>,
    pub total: i64,
}
