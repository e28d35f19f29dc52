use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::order::{CheckoutRequest, OrderView};
use crate::errors::AppError;

use super::{blocking, AppState};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutBody {
    pub user_id: i32,
    pub payment_method_id: i32,
    pub shipping_method_id: i32,
    pub shipping_address: String,
    /// Must be the caller's own cart when given.
    pub cart_id: Option<i32>,
    /// Reference from the payment provider, if any.
    pub transaction_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub message: String,
    pub order_id: i32,
    pub order_number: i32,
    /// Decimal as a string, e.g. "800.00"
    pub total_amount: String,
    pub redirect: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineResponse {
    pub id: i32,
    pub product_variant_id: i32,
    pub quantity: i32,
    pub line_total: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub payment_method_id: i32,
    pub payment_status_id: i32,
    pub transaction_id: Option<String>,
    pub payment_date: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentResponse {
    pub shipping_method_id: i32,
    pub address: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i32,
    pub user_id: i32,
    pub order_number: i32,
    pub total_amount: String,
    pub order_date: String,
    pub order_status_id: i32,
    pub lines: Vec<OrderLineResponse>,
    pub payment: Option<PaymentResponse>,
    pub shipment: Option<ShipmentResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(o: OrderView) -> Self {
        OrderResponse {
            id: o.id,
            user_id: o.user_id,
            order_number: o.order_number,
            total_amount: o.total_amount.to_string(),
            order_date: o.order_date.to_rfc3339(),
            order_status_id: o.order_status_id,
            lines: o
                .lines
                .into_iter()
                .map(|l| OrderLineResponse {
                    id: l.id,
                    product_variant_id: l.product_variant_id,
                    quantity: l.quantity,
                    line_total: l.line_total.to_string(),
                })
                .collect(),
            payment: o.payment.map(|p| PaymentResponse {
                payment_method_id: p.payment_method_id,
                payment_status_id: p.payment_status_id,
                transaction_id: p.transaction_id,
                payment_date: p.payment_date.to_rfc3339(),
            }),
            shipment: o.shipment.map(|s| ShipmentResponse {
                shipping_method_id: s.shipping_method_id,
                address: s.address,
            }),
        }
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Turns the user's cart into an order. Order, order lines, payment and
/// shipping records are written and the cart is removed in one transaction;
/// on any failure nothing is written and the cart is left as it was.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CheckoutBody,
    responses(
        (status = 200, description = "Checkout successful", body = CheckoutResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 404, description = "Cart missing or empty, or unknown payment/shipping method"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn checkout(
    state: web::Data<AppState>,
    body: web::Json<CheckoutBody>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let request = CheckoutRequest {
        user_id: body.user_id,
        cart_id: body.cart_id,
        payment_method_id: body.payment_method_id,
        shipping_method_id: body.shipping_method_id,
        shipping_address: body.shipping_address,
        transaction_id: body.transaction_id,
    };

    let placed = blocking(&state, move |s| s.checkout.place_order(request)).await?;

    Ok(HttpResponse::Ok().json(CheckoutResponse {
        message: "Checkout successful".to_string(),
        order_id: placed.order_id,
        order_number: placed.order_number,
        total_amount: placed.total_amount.to_string(),
        redirect: state.checkout.policy().redirect.clone(),
    }))
}

/// GET /orders/{id}
///
/// Returns the order together with its lines, payment and shipping records.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order id"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = blocking(&state, move |s| s.checkout.get_order(order_id)).await?;

    match order {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(order))),
        None => Err(AppError::NotFound("Order not found".to_string())),
    }
}

/// GET /orders
///
/// Returns a paginated list of orders, newest first.
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);

    let result = blocking(&state, move |s| s.checkout.list_orders(page, limit)).await?;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.into_iter().map(OrderResponse::from).collect(),
        total: result.total,
        page,
        limit,
    }))
}
