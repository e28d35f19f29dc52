use bigdecimal::BigDecimal;

use super::cart::{CartItemInput, CartView};
use super::catalog::{
    Lookup, LookupKind, NewProduct, ProductDetail, ProductSummary, ValidLookup,
};
use super::coupon::{Coupon, NewCoupon};
use super::errors::DomainError;
use super::order::{Checkout, ListResult, OrderView, PlacedOrder};

pub trait OrderRepository: Send + Sync + 'static {
    /// Turns the user's cart into an order, payment and shipment, then deletes
    /// the cart. All or nothing.
    fn place_order(&self, checkout: &Checkout) -> Result<PlacedOrder, DomainError>;
    fn find_by_id(&self, id: i32) -> Result<Option<OrderView>, DomainError>;
    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError>;
}

pub trait CartRepository: Send + Sync + 'static {
    fn find_by_user(&self, user_id: i32) -> Result<Option<CartView>, DomainError>;
    fn add_items(&self, user_id: i32, items: &[CartItemInput]) -> Result<(), DomainError>;
    fn update_quantity(&self, user_id: i32, line_id: i32, quantity: i32)
        -> Result<(), DomainError>;
    fn remove_line(&self, user_id: i32, line_id: i32) -> Result<(), DomainError>;
}

pub trait CouponRepository: Send + Sync + 'static {
    /// Case-insensitive lookup among active coupons.
    fn find_active_by_code(&self, code: &str) -> Result<Option<Coupon>, DomainError>;
    fn create(&self, coupon: &NewCoupon) -> Result<Coupon, DomainError>;
}

pub trait CatalogRepository: Send + Sync + 'static {
    fn list_lookups(&self, kind: LookupKind) -> Result<Vec<Lookup>, DomainError>;
    fn create_lookup(&self, kind: LookupKind, input: &ValidLookup) -> Result<Lookup, DomainError>;
    fn update_lookup(
        &self,
        kind: LookupKind,
        id: i32,
        input: &ValidLookup,
    ) -> Result<Lookup, DomainError>;
    fn deactivate_lookup(
        &self,
        kind: LookupKind,
        id: i32,
        deleted_by: Option<i32>,
    ) -> Result<(), DomainError>;

    fn search_products(&self, search: Option<&str>) -> Result<Vec<ProductSummary>, DomainError>;
    fn find_product(&self, id: i32) -> Result<Option<ProductDetail>, DomainError>;
    fn create_product(&self, product: &NewProduct) -> Result<i32, DomainError>;
    fn update_variant_price(&self, variant_id: i32, price: &BigDecimal) -> Result<(), DomainError>;
}
