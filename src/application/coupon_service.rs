use crate::domain::coupon::{ApplyCoupon, Coupon, NewCoupon};
use crate::domain::errors::DomainError;
use crate::domain::ports::CouponRepository;

pub struct CouponService<R> {
    repo: R,
}

impl<R: CouponRepository> CouponService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Looks up an active coupon. Nothing is recorded against the user or an
    /// order.
    pub fn apply(&self, request: ApplyCoupon) -> Result<Coupon, DomainError> {
        let code = request.code.trim();
        if request.user_id <= 0 || code.is_empty() {
            return Err(DomainError::invalid(
                "User ID and Coupon Code are required",
            ));
        }

        self.repo
            .find_active_by_code(code)?
            .ok_or_else(|| DomainError::invalid("Invalid or inactive coupon code"))
    }

    pub fn create(&self, coupon: NewCoupon) -> Result<Coupon, DomainError> {
        coupon.validate()?;
        let coupon = NewCoupon {
            code: coupon.code.trim().to_string(),
            ..coupon
        };
        self.repo.create(&coupon)
    }
}
