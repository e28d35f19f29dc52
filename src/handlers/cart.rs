use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::cart::{CartItemInput, CartView};
use crate::errors::AppError;

use super::{blocking, AppState};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserParams {
    pub user_id: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItemBody {
    pub product_variant_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartBody {
    pub user_id: i32,
    pub products: Vec<CartItemBody>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLineBody {
    pub user_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLineResponse {
    pub id: i32,
    pub product_variant_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: String,
    pub line_total: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub cart_id: Option<i32>,
    pub user_id: i32,
    pub lines: Vec<CartLineResponse>,
    pub subtotal: String,
}

impl From<CartView> for CartResponse {
    fn from(cart: CartView) -> Self {
        let subtotal = cart.subtotal().to_string();
        CartResponse {
            cart_id: cart.cart_id,
            user_id: cart.user_id,
            lines: cart
                .lines
                .into_iter()
                .map(|l| CartLineResponse {
                    id: l.id,
                    product_variant_id: l.product_variant_id,
                    product_name: l.product_name,
                    quantity: l.quantity,
                    unit_price: l.unit_price.to_string(),
                    line_total: l.line_total.to_string(),
                })
                .collect(),
            subtotal,
        }
    }
}

/// GET /cart?userId=
#[utoipa::path(
    get,
    path = "/cart",
    params(("userId" = i32, Query, description = "Cart owner")),
    responses(
        (status = 200, description = "The user's cart; empty when none exists", body = CartResponse),
        (status = 400, description = "Missing or invalid userId"),
    ),
    tag = "cart"
)]
pub async fn get_cart(
    state: web::Data<AppState>,
    query: web::Query<UserParams>,
) -> Result<HttpResponse, AppError> {
    let user_id = query.user_id;
    let cart = blocking(&state, move |s| s.carts.get_cart(user_id)).await?;
    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}

/// POST /cart
///
/// Adds products to the cart, merging quantities for variants already in it.
#[utoipa::path(
    post,
    path = "/cart",
    request_body = AddToCartBody,
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 404, description = "Unknown product variant"),
    ),
    tag = "cart"
)]
pub async fn add_to_cart(
    state: web::Data<AppState>,
    body: web::Json<AddToCartBody>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let user_id = body.user_id;
    let items: Vec<CartItemInput> = body
        .products
        .into_iter()
        .map(|p| CartItemInput {
            product_variant_id: p.product_variant_id,
            quantity: p.quantity,
        })
        .collect();

    let cart = blocking(&state, move |s| s.carts.add_items(user_id, items)).await?;
    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}

/// PUT /cart/lines/{lineId}
#[utoipa::path(
    put,
    path = "/cart/lines/{lineId}",
    params(("lineId" = i32, Path, description = "Cart line id")),
    request_body = UpdateLineBody,
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 404, description = "No such line in the user's cart"),
    ),
    tag = "cart"
)]
pub async fn update_line(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<UpdateLineBody>,
) -> Result<HttpResponse, AppError> {
    let line_id = path.into_inner();
    let UpdateLineBody { user_id, quantity } = body.into_inner();

    let cart = blocking(&state, move |s| {
        s.carts.update_quantity(user_id, line_id, quantity)
    })
    .await?;
    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}

/// DELETE /cart/lines/{lineId}?userId=
#[utoipa::path(
    delete,
    path = "/cart/lines/{lineId}",
    params(
        ("lineId" = i32, Path, description = "Cart line id"),
        ("userId" = i32, Query, description = "Cart owner"),
    ),
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 404, description = "No such line in the user's cart"),
    ),
    tag = "cart"
)]
pub async fn remove_line(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    query: web::Query<UserParams>,
) -> Result<HttpResponse, AppError> {
    let line_id = path.into_inner();
    let user_id = query.user_id;

    let cart = blocking(&state, move |s| s.carts.remove_line(user_id, line_id)).await?;
    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}
