use crate::domain::errors::DomainError;
use crate::domain::order::{
    generate_order_number, Checkout, CheckoutRequest, ListResult, OrderView, PaymentStatus,
    PlacedOrder,
};
use crate::domain::ports::OrderRepository;

#[derive(Debug, Clone)]
pub struct CheckoutPolicy {
    /// The one payment method whose payments start out pending.
    pub cash_on_delivery_method_id: i32,
    /// Where the storefront should send the customer after a successful checkout.
    pub redirect: String,
}

pub struct CheckoutService<R> {
    repo: R,
    policy: CheckoutPolicy,
}

impl<R: OrderRepository> CheckoutService<R> {
    pub fn new(repo: R, policy: CheckoutPolicy) -> Self {
        Self { repo, policy }
    }

    pub fn policy(&self) -> &CheckoutPolicy {
        &self.policy
    }

    pub fn place_order(&self, request: CheckoutRequest) -> Result<PlacedOrder, DomainError> {
        request.validate()?;

        let checkout = Checkout {
            user_id: request.user_id,
            cart_id: request.cart_id,
            payment_method_id: request.payment_method_id,
            shipping_method_id: request.shipping_method_id,
            shipping_address: request.shipping_address.trim().to_string(),
            transaction_id: request.transaction_id.filter(|t| !t.trim().is_empty()),
            payment_status: PaymentStatus::for_method(
                request.payment_method_id,
                self.policy.cash_on_delivery_method_id,
            ),
            order_number: generate_order_number(&mut rand::thread_rng()),
        };

        match self.repo.place_order(&checkout) {
            Ok(placed) => {
                log::info!(
                    "Order {} (number {}) placed for user {}, total {}",
                    placed.order_id,
                    placed.order_number,
                    checkout.user_id,
                    placed.total_amount
                );
                Ok(placed)
            }
            Err(e) => {
                log::warn!("Checkout for user {} failed: {}", checkout.user_id, e);
                Err(e)
            }
        }
    }

    pub fn get_order(&self, id: i32) -> Result<Option<OrderView>, DomainError> {
        self.repo.find_by_id(id)
    }

    pub fn list_orders(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        self.repo.list(page.max(1), limit.clamp(1, 100))
    }
}
