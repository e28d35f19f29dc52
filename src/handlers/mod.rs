pub mod cart;
pub mod catalog;
pub mod coupons;
pub mod orders;
pub mod products;

use std::str::FromStr;

use actix_web::web;
use bigdecimal::BigDecimal;
use utoipa::OpenApi;

use crate::application::cart_service::CartService;
use crate::application::catalog_service::CatalogService;
use crate::application::checkout_service::{CheckoutPolicy, CheckoutService};
use crate::application::coupon_service::CouponService;
use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::errors::AppError;
use crate::infrastructure::{
    DieselCartRepository, DieselCatalogRepository, DieselCouponRepository, DieselOrderRepository,
};

/// Services shared by every worker.
pub struct AppState {
    pub checkout: CheckoutService<DieselOrderRepository>,
    pub carts: CartService<DieselCartRepository>,
    pub coupons: CouponService<DieselCouponRepository>,
    pub catalog: CatalogService<DieselCatalogRepository>,
}

impl AppState {
    pub fn new(pool: DbPool, policy: CheckoutPolicy) -> Self {
        Self {
            checkout: CheckoutService::new(DieselOrderRepository::new(pool.clone()), policy),
            carts: CartService::new(DieselCartRepository::new(pool.clone())),
            coupons: CouponService::new(DieselCouponRepository::new(pool.clone())),
            catalog: CatalogService::new(DieselCatalogRepository::new(pool)),
        }
    }
}

/// Runs a service call on the blocking pool; diesel is synchronous.
pub(crate) async fn blocking<T, F>(state: &web::Data<AppState>, f: F) -> Result<T, AppError>
where
    F: FnOnce(&AppState) -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    Ok(web::block(move || f(state.get_ref())).await??)
}

/// Money travels as decimal strings, e.g. "9.99".
pub(crate) fn parse_money(field: &str, value: &str) -> Result<BigDecimal, AppError> {
    BigDecimal::from_str(value.trim())
        .map_err(|_| AppError::BadRequest(format!("{field} must be a decimal number")))
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Storefront API", version = "0.1.0"),
    paths(
        orders::checkout,
        orders::get_order,
        orders::list_orders,
        cart::get_cart,
        cart::add_to_cart,
        cart::update_line,
        cart::remove_line,
        coupons::apply_coupon,
        coupons::create_coupon,
        catalog::list_lookups,
        catalog::create_lookup,
        catalog::update_lookup,
        catalog::delete_lookup,
        products::search_products,
        products::get_product,
        products::create_product,
        products::update_variant_price,
    ),
    tags(
        (name = "orders", description = "Checkout and placed orders"),
        (name = "cart", description = "Shopping cart"),
        (name = "coupons", description = "Discount coupons"),
        (name = "catalog", description = "Catalog reference data"),
        (name = "products", description = "Products and variants"),
    )
)]
pub struct ApiDoc;
