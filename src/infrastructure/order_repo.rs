use std::collections::HashMap;

use bigdecimal::BigDecimal;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::Integer;

use crate::db::DbPool;
use crate::domain::cart::check_subtotal;
use crate::domain::catalog::LookupKind;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    Checkout, ListResult, OrderLineView, OrderView, PaymentView, PlacedOrder, ShipmentView,
    PLACED_ORDER_STATUS_ID,
};
use crate::domain::ports::OrderRepository;
use crate::schema::{cart_headers, cart_lines, order_lines, orders, payments, shipments};

use super::catalog_repo::lookup_is_active;
use super::models::{
    CartHeaderRow, CartLineRow, NewOrderLineRow, NewOrderRow, NewPaymentRow, NewShipmentRow,
    OrderLineRow, OrderRow, PaymentRow, ShipmentRow,
};

/// First half of the advisory lock key held while a user checks out; the
/// user id is the second half.
const CHECKOUT_LOCK_NAMESPACE: i32 = 4_201;

/// Blocks until no other transaction is checking out for `user_id`. Released
/// automatically on commit or rollback.
fn lock_checkout(conn: &mut PgConnection, user_id: i32) -> QueryResult<()> {
    diesel::sql_query("SELECT pg_advisory_xact_lock($1, $2)")
        .bind::<Integer, _>(CHECKOUT_LOCK_NAMESPACE)
        .bind::<Integer, _>(user_id)
        .execute(conn)?;
    Ok(())
}

fn order_view(
    order: OrderRow,
    lines: Vec<OrderLineRow>,
    payment: Option<PaymentRow>,
    shipment: Option<ShipmentRow>,
) -> OrderView {
    OrderView {
        id: order.id,
        user_id: order.user_id,
        total_amount: order.total_amount,
        order_number: order.order_number,
        order_date: order.order_date,
        order_status_id: order.order_status_id,
        lines: lines
            .into_iter()
            .map(|l| OrderLineView {
                id: l.id,
                product_variant_id: l.product_variant_id,
                quantity: l.quantity,
                line_total: l.line_total,
            })
            .collect(),
        payment: payment.map(|p| PaymentView {
            payment_method_id: p.payment_method_id,
            payment_status_id: p.payment_status_id,
            transaction_id: p.transaction_id,
            payment_date: p.payment_date,
        }),
        shipment: shipment.map(|s| ShipmentView {
            shipping_method_id: s.shipping_method_id,
            address: s.address,
        }),
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn place_order(&self, checkout: &Checkout) -> Result<PlacedOrder, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. One checkout per user at a time; a concurrent duplicate waits
            //    here and then finds the cart gone.
            lock_checkout(conn, checkout.user_id)?;

            // 2. Both methods must still be offered.
            if !lookup_is_active(conn, LookupKind::PaymentMethods, checkout.payment_method_id)? {
                return Err(DomainError::not_found(LookupKind::PaymentMethods.label()));
            }
            if !lookup_is_active(conn, LookupKind::ShippingMethods, checkout.shipping_method_id)? {
                return Err(DomainError::not_found(LookupKind::ShippingMethods.label()));
            }

            // 3. The user's cart, locked until commit.
            let header = cart_headers::table
                .filter(cart_headers::user_id.eq(checkout.user_id))
                .select(CartHeaderRow::as_select())
                .for_update()
                .first(conn)
                .optional()?;
            let header = match header {
                Some(h) if checkout.cart_id.map_or(true, |id| id == h.id) => h,
                _ => return Err(DomainError::not_found("Cart")),
            };

            // 4. Lines exactly as they stand in the cart.
            let lines = CartLineRow::belonging_to(&header)
                .select(CartLineRow::as_select())
                .order(cart_lines::id.asc())
                .load(conn)?;
            if lines.is_empty() {
                return Err(DomainError::EmptyCart);
            }
            let total_amount: BigDecimal = lines.iter().map(|l| &l.line_total).sum();
            check_subtotal(&total_amount)?;

            // 5. The order header; its generated id keys every row below.
            let order_id: i32 = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    user_id: checkout.user_id,
                    total_amount: total_amount.clone(),
                    order_number: checkout.order_number,
                    order_status_id: PLACED_ORDER_STATUS_ID,
                })
                .returning(orders::id)
                .get_result(conn)?;

            // 6. Snapshot of each cart line.
            let new_lines: Vec<NewOrderLineRow> = lines
                .iter()
                .map(|l| NewOrderLineRow {
                    order_id,
                    product_variant_id: l.product_variant_id,
                    quantity: l.quantity,
                    line_total: l.line_total.clone(),
                })
                .collect();
            diesel::insert_into(order_lines::table)
                .values(&new_lines)
                .execute(conn)?;

            // 7. Payment and shipping records.
            diesel::insert_into(payments::table)
                .values(&NewPaymentRow {
                    user_id: checkout.user_id,
                    payment_method_id: checkout.payment_method_id,
                    order_id,
                    transaction_id: checkout.transaction_id.clone(),
                    payment_status_id: checkout.payment_status.id(),
                })
                .execute(conn)?;
            diesel::insert_into(shipments::table)
                .values(&NewShipmentRow {
                    order_id,
                    shipping_method_id: checkout.shipping_method_id,
                    address: checkout.shipping_address.clone(),
                })
                .execute(conn)?;

            // 8. The cart is consumed.
            diesel::delete(cart_lines::table.filter(cart_lines::cart_header_id.eq(header.id)))
                .execute(conn)?;
            diesel::delete(cart_headers::table.find(header.id)).execute(conn)?;

            Ok(PlacedOrder {
                order_id,
                order_number: checkout.order_number,
                total_amount,
            })
        })
    }

    fn find_by_id(&self, id: i32) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .find(id)
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let lines = OrderLineRow::belonging_to(&order)
            .select(OrderLineRow::as_select())
            .order(order_lines::id.asc())
            .load(&mut conn)?;
        let payment = payments::table
            .filter(payments::order_id.eq(order.id))
            .select(PaymentRow::as_select())
            .first(&mut conn)
            .optional()?;
        let shipment = shipments::table
            .filter(shipments::order_id.eq(order.id))
            .select(ShipmentRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(Some(order_view(order, lines, payment, shipment)))
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = (page.max(1) - 1)
            .checked_mul(limit)
            .ok_or_else(|| DomainError::invalid("page is out of range"))?;
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = orders::table.count().get_result(conn)?;

            let rows = orders::table
                .select(OrderRow::as_select())
                .order((orders::order_date.desc(), orders::id.desc()))
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            let lines = OrderLineRow::belonging_to(&rows)
                .select(OrderLineRow::as_select())
                .order(order_lines::id.asc())
                .load(conn)?
                .grouped_by(&rows);

            let ids: Vec<i32> = rows.iter().map(|o| o.id).collect();
            let mut payments_by_order: HashMap<i32, PaymentRow> = payments::table
                .filter(payments::order_id.eq_any(&ids))
                .select(PaymentRow::as_select())
                .load(conn)?
                .into_iter()
                .map(|p| (p.order_id, p))
                .collect();
            let mut shipments_by_order: HashMap<i32, ShipmentRow> = shipments::table
                .filter(shipments::order_id.eq_any(&ids))
                .select(ShipmentRow::as_select())
                .load(conn)?
                .into_iter()
                .map(|s| (s.order_id, s))
                .collect();

            Ok(ListResult {
                items: rows
                    .into_iter()
                    .zip(lines)
                    .map(|(order, lines)| {
                        let payment = payments_by_order.remove(&order.id);
                        let shipment = shipments_by_order.remove(&order.id);
                        order_view(order, lines, payment, shipment)
                    })
                    .collect(),
                total,
            })
        })
    }
}
