use bigdecimal::BigDecimal;
use diesel::dsl::{now, sum};
use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::cart::{
    check_subtotal, line_total, validate_quantity, CartItemInput, CartLineView, CartView,
};
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;
use crate::schema::{cart_headers, cart_lines, product_variants, products};

use super::models::{CartHeaderRow, CartLineRow, NewCartHeaderRow, NewCartLineRow};

pub struct DieselCartRepository {
    pool: DbPool,
}

impl DieselCartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Fails, and so rolls back the surrounding transaction, when the lines of
/// `header_id` no longer add up to an amount an order can hold.
fn ensure_subtotal_fits(conn: &mut PgConnection, header_id: i32) -> Result<(), DomainError> {
    let subtotal: Option<BigDecimal> = cart_lines::table
        .filter(cart_lines::cart_header_id.eq(header_id))
        .select(sum(cart_lines::line_total))
        .get_result(conn)?;
    check_subtotal(&subtotal.unwrap_or_default())
}

impl CartRepository for DieselCartRepository {
    fn find_by_user(&self, user_id: i32) -> Result<Option<CartView>, DomainError> {
        let mut conn = self.pool.get()?;

        let header = cart_headers::table
            .filter(cart_headers::user_id.eq(user_id))
            .select(CartHeaderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(header) = header else {
            return Ok(None);
        };

        let rows: Vec<(CartLineRow, String, BigDecimal)> = cart_lines::table
            .inner_join(product_variants::table.inner_join(products::table))
            .filter(cart_lines::cart_header_id.eq(header.id))
            .select((CartLineRow::as_select(), products::name, product_variants::price))
            .order(cart_lines::id.asc())
            .load(&mut conn)?;

        Ok(Some(CartView {
            cart_id: Some(header.id),
            user_id: header.user_id,
            lines: rows
                .into_iter()
                .map(|(line, product_name, unit_price)| CartLineView {
                    id: line.id,
                    product_variant_id: line.product_variant_id,
                    product_name,
                    quantity: line.quantity,
                    unit_price,
                    line_total: line.line_total,
                })
                .collect(),
        }))
    }

    fn add_items(&self, user_id: i32, items: &[CartItemInput]) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            diesel::insert_into(cart_headers::table)
                .values(&NewCartHeaderRow { user_id })
                .on_conflict(cart_headers::user_id)
                .do_nothing()
                .execute(conn)?;

            let header_id: i32 = cart_headers::table
                .filter(cart_headers::user_id.eq(user_id))
                .select(cart_headers::id)
                .for_update()
                .first(conn)?;

            for item in items {
                let unit_price: BigDecimal = product_variants::table
                    .find(item.product_variant_id)
                    .select(product_variants::price)
                    .first(conn)
                    .optional()?
                    .ok_or_else(|| DomainError::not_found("Product variant"))?;

                let existing = cart_lines::table
                    .filter(cart_lines::cart_header_id.eq(header_id))
                    .filter(cart_lines::product_variant_id.eq(item.product_variant_id))
                    .select(CartLineRow::as_select())
                    .first(conn)
                    .optional()?;

                match existing {
                    Some(line) => {
                        let quantity = line
                            .quantity
                            .checked_add(item.quantity)
                            .ok_or_else(|| DomainError::invalid("quantity is too large"))?;
                        validate_quantity(quantity)?;
                        diesel::update(cart_lines::table.find(line.id))
                            .set((
                                cart_lines::quantity.eq(quantity),
                                cart_lines::line_total.eq(line_total(&unit_price, quantity)?),
                                cart_lines::updated_at.eq(now),
                            ))
                            .execute(conn)?;
                    }
                    None => {
                        diesel::insert_into(cart_lines::table)
                            .values(&NewCartLineRow {
                                cart_header_id: header_id,
                                product_variant_id: item.product_variant_id,
                                quantity: item.quantity,
                                line_total: line_total(&unit_price, item.quantity)?,
                            })
                            .execute(conn)?;
                    }
                }
            }
            ensure_subtotal_fits(conn, header_id)?;

            diesel::update(cart_headers::table.find(header_id))
                .set(cart_headers::updated_at.eq(now))
                .execute(conn)?;
            Ok(())
        })
    }

    fn update_quantity(&self, user_id: i32, line_id: i32, quantity: i32) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // Ownership goes through the header; someone else's line is
            // indistinguishable from a missing one.
            let (header_id, unit_price): (i32, BigDecimal) = cart_lines::table
                .inner_join(cart_headers::table)
                .inner_join(product_variants::table)
                .filter(cart_lines::id.eq(line_id))
                .filter(cart_headers::user_id.eq(user_id))
                .select((cart_headers::id, product_variants::price))
                .first(conn)
                .optional()?
                .ok_or_else(|| DomainError::not_found("Cart line"))?;

            diesel::update(cart_lines::table.find(line_id))
                .set((
                    cart_lines::quantity.eq(quantity),
                    cart_lines::line_total.eq(line_total(&unit_price, quantity)?),
                    cart_lines::updated_at.eq(now),
                ))
                .execute(conn)?;
            ensure_subtotal_fits(conn, header_id)
        })
    }

    fn remove_line(&self, user_id: i32, line_id: i32) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let owned_headers = cart_headers::table
            .filter(cart_headers::user_id.eq(user_id))
            .select(cart_headers::id);
        let deleted = diesel::delete(
            cart_lines::table
                .filter(cart_lines::id.eq(line_id))
                .filter(cart_lines::cart_header_id.eq_any(owned_headers)),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(DomainError::not_found("Cart line"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::DieselCartRepository;
    use crate::domain::cart::{CartItemInput, MAX_LINE_QUANTITY};
    use crate::domain::errors::DomainError;
    use crate::domain::ports::{CartRepository, CatalogRepository};
    use crate::infrastructure::test_db::{seed_catalog, setup_db};
    use crate::infrastructure::DieselCatalogRepository;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    fn item(product_variant_id: i32, quantity: i32) -> CartItemInput {
        CartItemInput {
            product_variant_id,
            quantity,
        }
    }

    #[tokio::test]
    async fn find_by_user_returns_none_without_cart() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCartRepository::new(pool);

        assert!(repo.find_by_user(42).expect("find").is_none());
    }

    #[tokio::test]
    async fn add_items_creates_cart_and_prices_lines() {
        let (_container, pool) = setup_db().await;
        let seeded = seed_catalog(&pool, &["250", "19.99"]);
        let repo = DieselCartRepository::new(pool);

        repo.add_items(42, &[item(seeded.variants[0], 2), item(seeded.variants[1], 3)])
            .expect("add");

        let cart = repo.find_by_user(42).expect("find").expect("cart");
        assert!(cart.cart_id.is_some());
        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.lines[0].product_name, "Tee 0");
        assert_eq!(cart.lines[0].line_total, dec("500"));
        assert_eq!(cart.lines[1].unit_price, dec("19.99"));
        assert_eq!(cart.lines[1].line_total, dec("59.97"));
        assert_eq!(cart.subtotal(), dec("559.97"));
    }

    #[tokio::test]
    async fn adding_same_variant_again_merges_quantities() {
        let (_container, pool) = setup_db().await;
        let seeded = seed_catalog(&pool, &["250"]);
        let repo = DieselCartRepository::new(pool);

        repo.add_items(42, &[item(seeded.variants[0], 1)]).expect("first add");
        repo.add_items(42, &[item(seeded.variants[0], 2)]).expect("second add");

        let cart = repo.find_by_user(42).expect("find").expect("cart");
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 3);
        assert_eq!(cart.lines[0].line_total, dec("750"));
    }

    #[tokio::test]
    async fn unknown_variant_leaves_cart_untouched() {
        let (_container, pool) = setup_db().await;
        let seeded = seed_catalog(&pool, &["250"]);
        let repo = DieselCartRepository::new(pool);

        let result = repo.add_items(42, &[item(seeded.variants[0], 1), item(9_999, 1)]);

        assert!(matches!(result, Err(DomainError::NotFound(_))));
        assert!(repo.find_by_user(42).expect("find").is_none());
    }

    #[tokio::test]
    async fn oversized_line_is_invalid_and_writes_nothing() {
        let (_container, pool) = setup_db().await;
        let seeded = seed_catalog(&pool, &["250"]);
        let repo = DieselCartRepository::new(pool);

        let result = repo.add_items(42, &[item(seeded.variants[0], 100_000_000)]);

        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
        assert!(repo.find_by_user(42).expect("find").is_none());
    }

    #[tokio::test]
    async fn cart_subtotal_stays_within_order_total() {
        let (_container, pool) = setup_db().await;
        let seeded = seed_catalog(&pool, &["9000000000", "9000000000"]);
        let repo = DieselCartRepository::new(pool);
        repo.add_items(42, &[item(seeded.variants[0], 1)]).expect("first add");

        let second = repo.add_items(42, &[item(seeded.variants[1], 1)]);
        assert!(matches!(second, Err(DomainError::InvalidInput(_))));

        let cart = repo.find_by_user(42).expect("find").expect("cart");
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.subtotal(), dec("9000000000"));

        let line_id = cart.lines[0].id;
        assert!(matches!(
            repo.update_quantity(42, line_id, 2),
            Err(DomainError::InvalidInput(_))
        ));
        let cart = repo.find_by_user(42).expect("find").expect("cart");
        assert_eq!(cart.lines[0].quantity, 1);
    }

    #[tokio::test]
    async fn merged_quantity_is_bounded() {
        let (_container, pool) = setup_db().await;
        let seeded = seed_catalog(&pool, &["1"]);
        let repo = DieselCartRepository::new(pool);
        repo.add_items(42, &[item(seeded.variants[0], MAX_LINE_QUANTITY)])
            .expect("add up to the limit");

        let result = repo.add_items(42, &[item(seeded.variants[0], 1)]);

        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
        let cart = repo.find_by_user(42).expect("find").expect("cart");
        assert_eq!(cart.lines[0].quantity, MAX_LINE_QUANTITY);
    }

    #[tokio::test]
    async fn update_quantity_uses_current_price() {
        let (_container, pool) = setup_db().await;
        let seeded = seed_catalog(&pool, &["250"]);
        let repo = DieselCartRepository::new(pool.clone());
        repo.add_items(42, &[item(seeded.variants[0], 1)]).expect("add");
        let line_id = repo.find_by_user(42).expect("find").expect("cart").lines[0].id;

        DieselCatalogRepository::new(pool)
            .update_variant_price(seeded.variants[0], &dec("100"))
            .expect("reprice");
        repo.update_quantity(42, line_id, 4).expect("update");

        let cart = repo.find_by_user(42).expect("find").expect("cart");
        assert_eq!(cart.lines[0].quantity, 4);
        assert_eq!(cart.lines[0].line_total, dec("400"));
    }

    #[tokio::test]
    async fn lines_of_other_users_are_not_found() {
        let (_container, pool) = setup_db().await;
        let seeded = seed_catalog(&pool, &["250"]);
        let repo = DieselCartRepository::new(pool);
        repo.add_items(42, &[item(seeded.variants[0], 1)]).expect("add");
        let line_id = repo.find_by_user(42).expect("find").expect("cart").lines[0].id;

        assert!(matches!(
            repo.update_quantity(7, line_id, 2),
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            repo.remove_line(7, line_id),
            Err(DomainError::NotFound(_))
        ));

        repo.remove_line(42, line_id).expect("owner may remove");
        let cart = repo.find_by_user(42).expect("find").expect("header remains");
        assert!(cart.lines.is_empty());
    }
}
