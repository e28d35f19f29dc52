use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::coupon::{ApplyCoupon, Coupon, NewCoupon};
use crate::errors::AppError;

use super::{blocking, parse_money, AppState};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyCouponBody {
    pub user_id: i32,
    pub coupon_code: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyCouponResponse {
    pub message: String,
    pub discount_percentage: String,
    /// The user's current cart subtotal with the discount applied.
    pub discounted_subtotal: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCouponBody {
    pub code: String,
    /// Decimal as a string, greater than 0 and at most 100.
    pub discount_percentage: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CouponResponse {
    pub id: i32,
    pub code: String,
    pub discount_percentage: String,
    pub active: bool,
}

impl From<Coupon> for CouponResponse {
    fn from(c: Coupon) -> Self {
        CouponResponse {
            id: c.id,
            code: c.code,
            discount_percentage: c.discount_percentage.to_string(),
            active: c.active,
        }
    }
}

/// POST /coupons/apply
///
/// Validates a coupon code. Nothing is recorded; the discount is not tied to
/// any order.
#[utoipa::path(
    post,
    path = "/coupons/apply",
    request_body = ApplyCouponBody,
    responses(
        (status = 200, description = "Coupon applied successfully", body = ApplyCouponResponse),
        (status = 400, description = "Missing fields, or unknown or inactive code"),
    ),
    tag = "coupons"
)]
pub async fn apply_coupon(
    state: web::Data<AppState>,
    body: web::Json<ApplyCouponBody>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let request = ApplyCoupon {
        user_id: body.user_id,
        code: body.coupon_code,
    };

    let (coupon, discounted) = blocking(&state, move |s| {
        let user_id = request.user_id;
        let coupon = s.coupons.apply(request)?;
        let subtotal = s.carts.get_cart(user_id)?.subtotal();
        let discounted = coupon.discounted_total(&subtotal);
        Ok((coupon, discounted))
    })
    .await?;

    Ok(HttpResponse::Ok().json(ApplyCouponResponse {
        message: "Coupon applied successfully".to_string(),
        discount_percentage: coupon.discount_percentage.to_string(),
        discounted_subtotal: discounted.to_string(),
    }))
}

/// POST /coupons
#[utoipa::path(
    post,
    path = "/coupons",
    request_body = CreateCouponBody,
    responses(
        (status = 201, description = "Coupon created", body = CouponResponse),
        (status = 400, description = "Invalid fields or duplicate code"),
    ),
    tag = "coupons"
)]
pub async fn create_coupon(
    state: web::Data<AppState>,
    body: web::Json<CreateCouponBody>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let coupon = NewCoupon {
        discount_percentage: parse_money("discountPercentage", &body.discount_percentage)?,
        code: body.code,
    };

    let created = blocking(&state, move |s| s.coupons.create(coupon)).await?;
    Ok(HttpResponse::Created().json(CouponResponse::from(created)))
}
