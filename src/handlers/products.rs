use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::catalog::{NewProduct, ProductDetail, ProductSummary};
use crate::errors::AppError;

use super::{blocking, parse_money, AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchParams {
    /// Matched against product name, code and brand name, ignoring case.
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummaryResponse {
    pub product_id: i32,
    pub product_variant_id: i32,
    pub name: String,
    pub description: String,
    pub price: String,
    pub brand_name: String,
    pub size_name: String,
    pub quantity: Option<i32>,
}

impl From<ProductSummary> for ProductSummaryResponse {
    fn from(p: ProductSummary) -> Self {
        ProductSummaryResponse {
            product_id: p.product_id,
            product_variant_id: p.product_variant_id,
            name: p.name,
            description: p.description,
            price: p.price.to_string(),
            brand_name: p.brand_name,
            size_name: p.size_name,
            quantity: p.quantity,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VariantResponse {
    pub id: i32,
    pub price: String,
    pub cost_price: String,
    pub category_name: String,
    pub color_name: String,
    pub hex_code: Option<String>,
    pub size_name: String,
    pub brand_name: String,
    pub quantity: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub description: String,
    pub variants: Vec<VariantResponse>,
}

impl From<ProductDetail> for ProductResponse {
    fn from(p: ProductDetail) -> Self {
        ProductResponse {
            id: p.id,
            name: p.name,
            code: p.code,
            description: p.description,
            variants: p
                .variants
                .into_iter()
                .map(|v| VariantResponse {
                    id: v.id,
                    price: v.price.to_string(),
                    cost_price: v.cost_price.to_string(),
                    category_name: v.category_name,
                    color_name: v.color_name,
                    hex_code: v.hex_code,
                    size_name: v.size_name,
                    brand_name: v.brand_name,
                    quantity: v.quantity,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductBody {
    pub name: String,
    pub code: String,
    pub description: String,
    pub created_by: Option<i32>,
    pub category_id: i32,
    pub color_id: i32,
    pub size_id: i32,
    pub brand_id: i32,
    /// Decimal price as a string, e.g. "9.99"
    pub price: String,
    pub cost_price: String,
    /// Initial stock; no inventory row is created when absent.
    pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePriceBody {
    pub price: String,
}

/// GET /products
#[utoipa::path(
    get,
    path = "/products",
    params(("search" = Option<String>, Query, description = "Name, code or brand fragment")),
    responses(
        (status = 200, description = "Matching active products, one entry per variant", body = [ProductSummaryResponse]),
    ),
    tag = "products"
)]
pub async fn search_products(
    state: web::Data<AppState>,
    query: web::Query<SearchParams>,
) -> Result<HttpResponse, AppError> {
    let search = query.into_inner().search;

    let products = blocking(&state, move |s| s.catalog.search_products(search.as_deref())).await?;
    Ok(HttpResponse::Ok().json(
        products
            .into_iter()
            .map(ProductSummaryResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product with its variants", body = ProductResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let product = blocking(&state, move |s| s.catalog.get_product(id)).await?;
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// POST /products
///
/// Creates a product with a single variant and, optionally, its stock level.
#[utoipa::path(
    post,
    path = "/products",
    request_body = CreateProductBody,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid fields or inactive references"),
    ),
    tag = "products"
)]
pub async fn create_product(
    state: web::Data<AppState>,
    body: web::Json<CreateProductBody>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let product = NewProduct {
        price: parse_money("price", &body.price)?,
        cost_price: parse_money("costPrice", &body.cost_price)?,
        name: body.name,
        code: body.code,
        description: body.description,
        created_by: body.created_by,
        category_id: body.category_id,
        color_id: body.color_id,
        size_id: body.size_id,
        brand_id: body.brand_id,
        quantity: body.quantity,
    };

    let created = blocking(&state, move |s| s.catalog.create_product(product)).await?;
    Ok(HttpResponse::Created().json(ProductResponse::from(created)))
}

/// PUT /products/variants/{id}/price
///
/// Changes the unit price used by future cart writes. Placed orders keep
/// the amounts they were checked out with.
#[utoipa::path(
    put,
    path = "/products/variants/{id}/price",
    params(("id" = i32, Path, description = "Product variant id")),
    request_body = UpdatePriceBody,
    responses(
        (status = 204, description = "Price updated"),
        (status = 400, description = "Invalid price"),
        (status = 404, description = "Product variant not found"),
    ),
    tag = "products"
)]
pub async fn update_variant_price(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<UpdatePriceBody>,
) -> Result<HttpResponse, AppError> {
    let variant_id = path.into_inner();
    let price = parse_money("price", &body.price)?;

    blocking(&state, move |s| s.catalog.update_variant_price(variant_id, &price)).await?;
    Ok(HttpResponse::NoContent().finish())
}
