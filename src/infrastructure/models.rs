use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

use crate::schema::{
    cart_headers, cart_lines, catalog_lookups, coupons, inventory, order_lines, orders, payments,
    product_variants, products, shipments,
};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = cart_headers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartHeaderRow {
    pub id: i32,
    pub user_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = cart_headers)]
pub struct NewCartHeaderRow {
    pub user_id: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = cart_lines)]
#[diesel(belongs_to(CartHeaderRow, foreign_key = cart_header_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartLineRow {
    pub id: i32,
    pub cart_header_id: i32,
    pub product_variant_id: i32,
    pub quantity: i32,
    pub line_total: BigDecimal,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = cart_lines)]
pub struct NewCartLineRow {
    pub cart_header_id: i32,
    pub product_variant_id: i32,
    pub quantity: i32,
    pub line_total: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i32,
    pub user_id: i32,
    pub total_amount: BigDecimal,
    pub order_number: i32,
    pub order_date: DateTime<Utc>,
    pub order_status_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub user_id: i32,
    pub total_amount: BigDecimal,
    pub order_number: i32,
    pub order_status_id: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_lines)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderLineRow {
    pub id: i32,
    pub order_id: i32,
    pub product_variant_id: i32,
    pub quantity: i32,
    pub line_total: BigDecimal,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_lines)]
pub struct NewOrderLineRow {
    pub order_id: i32,
    pub product_variant_id: i32,
    pub quantity: i32,
    pub line_total: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PaymentRow {
    pub order_id: i32,
    pub payment_method_id: i32,
    pub transaction_id: Option<String>,
    pub payment_status_id: i32,
    pub payment_date: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = payments)]
pub struct NewPaymentRow {
    pub user_id: i32,
    pub payment_method_id: i32,
    pub order_id: i32,
    pub transaction_id: Option<String>,
    pub payment_status_id: i32,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = shipments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ShipmentRow {
    pub order_id: i32,
    pub shipping_method_id: i32,
    pub address: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = shipments)]
pub struct NewShipmentRow {
    pub order_id: i32,
    pub shipping_method_id: i32,
    pub address: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = coupons)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CouponRow {
    pub id: i32,
    pub code: String,
    pub discount_percentage: BigDecimal,
    pub active: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = coupons)]
pub struct NewCouponRow {
    pub code: String,
    pub discount_percentage: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = catalog_lookups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LookupRow {
    pub id: i32,
    pub kind: String,
    pub name: String,
    pub attributes: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = catalog_lookups)]
pub struct NewLookupRow {
    pub kind: String,
    pub name: String,
    pub attributes: Value,
    pub created_by: Option<i32>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub description: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub name: String,
    pub code: String,
    pub description: String,
    pub created_by: Option<i32>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = product_variants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct VariantRow {
    pub id: i32,
    pub product_id: i32,
    pub category_id: i32,
    pub color_id: i32,
    pub size_id: i32,
    pub brand_id: i32,
    pub price: BigDecimal,
    pub cost_price: BigDecimal,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = product_variants)]
pub struct NewVariantRow {
    pub product_id: i32,
    pub category_id: i32,
    pub color_id: i32,
    pub size_id: i32,
    pub brand_id: i32,
    pub price: BigDecimal,
    pub cost_price: BigDecimal,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = inventory)]
pub struct NewInventoryRow {
    pub product_variant_id: i32,
    pub quantity: i32,
}
