use std::collections::HashMap;

use bigdecimal::BigDecimal;
use diesel::dsl::{exists, now};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde_json::Value;

use crate::db::DbPool;
use crate::domain::catalog::{
    Lookup, LookupKind, NewProduct, ProductDetail, ProductSummary, ValidLookup, VariantView,
};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;
use crate::schema::{catalog_lookups, inventory, product_variants, products};

use super::models::{
    LookupRow, NewInventoryRow, NewLookupRow, NewProductRow, NewVariantRow, ProductRow, VariantRow,
};
use super::{contains_pattern, lower};

/// Whether `id` names an active lookup of `kind`.
pub(crate) fn lookup_is_active(
    conn: &mut PgConnection,
    kind: LookupKind,
    id: i32,
) -> QueryResult<bool> {
    diesel::select(exists(
        catalog_lookups::table
            .filter(catalog_lookups::id.eq(id))
            .filter(catalog_lookups::kind.eq(kind.as_str()))
            .filter(catalog_lookups::active.eq(true)),
    ))
    .get_result(conn)
}

/// Whether another active lookup of `kind` already uses `name`, ignoring case.
fn name_taken(
    conn: &mut PgConnection,
    kind: LookupKind,
    name: &str,
    except_id: Option<i32>,
) -> QueryResult<bool> {
    diesel::select(exists(
        catalog_lookups::table
            .filter(catalog_lookups::kind.eq(kind.as_str()))
            .filter(catalog_lookups::active.eq(true))
            .filter(lower(catalog_lookups::name).eq(lower(name)))
            .filter(catalog_lookups::id.ne(except_id.unwrap_or(0))),
    ))
    .get_result(conn)
}

fn duplicate_name(kind: LookupKind) -> DomainError {
    DomainError::Conflict(format!("{} name already exists", kind.label()))
}

fn to_lookup(kind: LookupKind, row: LookupRow) -> Lookup {
    Lookup {
        id: row.id,
        kind,
        name: row.name,
        attributes: row.attributes,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

/// Loads lookups by id regardless of their active flag, so products keep
/// showing the names they were created with.
fn lookups_by_id(
    conn: &mut PgConnection,
    ids: impl IntoIterator<Item = i32>,
) -> QueryResult<HashMap<i32, LookupRow>> {
    let mut ids: Vec<i32> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    Ok(catalog_lookups::table
        .filter(catalog_lookups::id.eq_any(ids))
        .select(LookupRow::as_select())
        .load(conn)?
        .into_iter()
        .map(|row| (row.id, row))
        .collect())
}

fn name_of(lookups: &HashMap<i32, LookupRow>, id: i32) -> String {
    lookups.get(&id).map(|l| l.name.clone()).unwrap_or_default()
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CatalogRepository for DieselCatalogRepository {
    fn list_lookups(&self, kind: LookupKind) -> Result<Vec<Lookup>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = catalog_lookups::table
            .filter(catalog_lookups::kind.eq(kind.as_str()))
            .filter(catalog_lookups::active.eq(true))
            .select(LookupRow::as_select())
            .order(catalog_lookups::id.asc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(|row| to_lookup(kind, row)).collect())
    }

    fn create_lookup(&self, kind: LookupKind, input: &ValidLookup) -> Result<Lookup, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            if name_taken(conn, kind, &input.name, None)? {
                return Err(duplicate_name(kind));
            }

            let row = diesel::insert_into(catalog_lookups::table)
                .values(&NewLookupRow {
                    kind: kind.as_str().to_string(),
                    name: input.name.clone(),
                    attributes: input.attributes.clone(),
                    created_by: input.actor_id,
                })
                .returning(LookupRow::as_returning())
                .get_result(conn)?;
            Ok(to_lookup(kind, row))
        })
    }

    fn update_lookup(
        &self,
        kind: LookupKind,
        id: i32,
        input: &ValidLookup,
    ) -> Result<Lookup, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            if name_taken(conn, kind, &input.name, Some(id))? {
                return Err(duplicate_name(kind));
            }

            let row = diesel::update(
                catalog_lookups::table
                    .filter(catalog_lookups::id.eq(id))
                    .filter(catalog_lookups::kind.eq(kind.as_str()))
                    .filter(catalog_lookups::active.eq(true)),
            )
            .set((
                catalog_lookups::name.eq(&input.name),
                catalog_lookups::attributes.eq(input.attributes.clone()),
                catalog_lookups::updated_by.eq(input.actor_id),
                catalog_lookups::updated_at.eq(now),
            ))
            .returning(LookupRow::as_returning())
            .get_result(conn)
            .optional()?
            .ok_or_else(|| DomainError::not_found(kind.label()))?;
            Ok(to_lookup(kind, row))
        })
    }

    fn deactivate_lookup(
        &self,
        kind: LookupKind,
        id: i32,
        deleted_by: Option<i32>,
    ) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(
            catalog_lookups::table
                .filter(catalog_lookups::id.eq(id))
                .filter(catalog_lookups::kind.eq(kind.as_str()))
                .filter(catalog_lookups::active.eq(true)),
        )
        .set((
            catalog_lookups::active.eq(false),
            catalog_lookups::deleted_by.eq(deleted_by),
            catalog_lookups::deleted_at.eq(now),
        ))
        .execute(&mut conn)?;

        if updated == 0 {
            return Err(DomainError::not_found(kind.label()));
        }
        Ok(())
    }

    fn search_products(&self, search: Option<&str>) -> Result<Vec<ProductSummary>, DomainError> {
        let mut conn = self.pool.get()?;

        let mut query = product_variants::table
            .inner_join(products::table)
            .left_join(inventory::table)
            .filter(products::active.eq(true))
            .select((
                VariantRow::as_select(),
                ProductRow::as_select(),
                inventory::quantity.nullable(),
            ))
            .order((products::id.asc(), product_variants::id.asc()))
            .into_boxed();

        if let Some(term) = search {
            let pattern = contains_pattern(term);
            let brand_ids: Vec<i32> = catalog_lookups::table
                .filter(catalog_lookups::kind.eq(LookupKind::Brands.as_str()))
                .filter(lower(catalog_lookups::name).like(lower(pattern.as_str())))
                .select(catalog_lookups::id)
                .load(&mut conn)?;
            query = query.filter(
                lower(products::name)
                    .like(lower(pattern.clone()))
                    .or(lower(products::code).like(lower(pattern)))
                    .or(product_variants::brand_id.eq_any(brand_ids)),
            );
        }

        let rows: Vec<(VariantRow, ProductRow, Option<i32>)> = query.load(&mut conn)?;
        let lookups = lookups_by_id(
            &mut conn,
            rows.iter().flat_map(|(v, _, _)| [v.brand_id, v.size_id]),
        )?;

        Ok(rows
            .into_iter()
            .map(|(variant, product, quantity)| ProductSummary {
                product_id: product.id,
                product_variant_id: variant.id,
                name: product.name,
                description: product.description,
                price: variant.price,
                brand_name: name_of(&lookups, variant.brand_id),
                size_name: name_of(&lookups, variant.size_id),
                quantity,
            })
            .collect())
    }

    fn find_product(&self, id: i32) -> Result<Option<ProductDetail>, DomainError> {
        let mut conn = self.pool.get()?;

        let product = products::table
            .filter(products::id.eq(id))
            .filter(products::active.eq(true))
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(product) = product else {
            return Ok(None);
        };

        let variants: Vec<(VariantRow, Option<i32>)> = product_variants::table
            .left_join(inventory::table)
            .filter(product_variants::product_id.eq(product.id))
            .select((VariantRow::as_select(), inventory::quantity.nullable()))
            .order(product_variants::id.asc())
            .load(&mut conn)?;

        let lookups = lookups_by_id(
            &mut conn,
            variants
                .iter()
                .flat_map(|(v, _)| [v.category_id, v.color_id, v.size_id, v.brand_id]),
        )?;

        Ok(Some(ProductDetail {
            id: product.id,
            name: product.name,
            code: product.code,
            description: product.description,
            variants: variants
                .into_iter()
                .map(|(v, quantity)| VariantView {
                    id: v.id,
                    price: v.price,
                    cost_price: v.cost_price,
                    category_name: name_of(&lookups, v.category_id),
                    color_name: name_of(&lookups, v.color_id),
                    hex_code: lookups
                        .get(&v.color_id)
                        .and_then(|c| c.attributes.get("hexCode"))
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    size_name: name_of(&lookups, v.size_id),
                    brand_name: name_of(&lookups, v.brand_id),
                    quantity,
                })
                .collect(),
        }))
    }

    fn create_product(&self, product: &NewProduct) -> Result<i32, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            for (kind, id) in product.references() {
                if !lookup_is_active(conn, kind, id)? {
                    return Err(DomainError::invalid(
                        "One or more related entities are not active",
                    ));
                }
            }

            let product_id: i32 = diesel::insert_into(products::table)
                .values(&NewProductRow {
                    name: product.name.trim().to_string(),
                    code: product.code.trim().to_string(),
                    description: product.description.trim().to_string(),
                    created_by: product.created_by,
                })
                .returning(products::id)
                .get_result(conn)?;

            let variant_id: i32 = diesel::insert_into(product_variants::table)
                .values(&NewVariantRow {
                    product_id,
                    category_id: product.category_id,
                    color_id: product.color_id,
                    size_id: product.size_id,
                    brand_id: product.brand_id,
                    price: product.price.clone(),
                    cost_price: product.cost_price.clone(),
                })
                .returning(product_variants::id)
                .get_result(conn)?;

            if let Some(quantity) = product.quantity {
                diesel::insert_into(inventory::table)
                    .values(&NewInventoryRow {
                        product_variant_id: variant_id,
                        quantity,
                    })
                    .execute(conn)?;
            }

            Ok(product_id)
        })
    }

    fn update_variant_price(&self, variant_id: i32, price: &BigDecimal) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(product_variants::table.find(variant_id))
            .set((
                product_variants::price.eq(price),
                product_variants::updated_at.eq(now),
            ))
            .execute(&mut conn)?;

        if updated == 0 {
            return Err(DomainError::not_found("Product variant"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;
    use serde_json::json;

    use super::DieselCatalogRepository;
    use crate::domain::catalog::{LookupInput, LookupKind, NewProduct, ValidLookup};
    use crate::domain::errors::DomainError;
    use crate::domain::ports::CatalogRepository;
    use crate::infrastructure::test_db::{seed_catalog, setup_db};

    fn valid(kind: LookupKind, name: &str, attributes: Option<serde_json::Value>) -> ValidLookup {
        LookupInput {
            name: name.to_string(),
            attributes,
            actor_id: Some(1),
        }
        .validate(kind)
        .expect("valid lookup")
    }

    #[tokio::test]
    async fn cash_on_delivery_is_seeded() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);

        let methods = repo
            .list_lookups(LookupKind::PaymentMethods)
            .expect("list");

        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].id, 1);
        assert_eq!(methods[0].name, "Cash on Delivery");
    }

    #[tokio::test]
    async fn names_are_unique_per_kind_ignoring_case() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);
        repo.create_lookup(LookupKind::Brands, &valid(LookupKind::Brands, "Acme", None))
            .expect("create");

        let dup = repo.create_lookup(LookupKind::Brands, &valid(LookupKind::Brands, "ACME", None));
        assert!(matches!(dup, Err(DomainError::Conflict(msg)) if msg == "Brand name already exists"));

        // Same name under a different kind is fine.
        repo.create_lookup(
            LookupKind::Categories,
            &valid(LookupKind::Categories, "Acme", None),
        )
        .expect("other kind");
    }

    #[tokio::test]
    async fn non_ascii_names_are_compared_in_sql() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);
        repo.create_lookup(LookupKind::Brands, &valid(LookupKind::Brands, "ΟΔΟΣ", None))
            .expect("create");

        let dup = repo.create_lookup(LookupKind::Brands, &valid(LookupKind::Brands, "ΟΔΟΣ", None));
        assert!(matches!(dup, Err(DomainError::Conflict(msg)) if msg == "Brand name already exists"));
    }

    #[tokio::test]
    async fn deactivated_names_can_be_reused() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);
        let first = repo
            .create_lookup(LookupKind::Brands, &valid(LookupKind::Brands, "Acme", None))
            .expect("create");

        repo.deactivate_lookup(LookupKind::Brands, first.id, Some(2))
            .expect("deactivate");
        assert!(repo.list_lookups(LookupKind::Brands).expect("list").is_empty());
        assert!(matches!(
            repo.deactivate_lookup(LookupKind::Brands, first.id, Some(2)),
            Err(DomainError::NotFound(_))
        ));

        repo.create_lookup(LookupKind::Brands, &valid(LookupKind::Brands, "acme", None))
            .expect("name is free again");
    }

    #[tokio::test]
    async fn update_lookup_renames_and_checks_kind() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);
        let color = repo
            .create_lookup(
                LookupKind::Colors,
                &valid(LookupKind::Colors, "Navy", Some(json!({ "hexCode": "#000080" }))),
            )
            .expect("create");

        let updated = repo
            .update_lookup(
                LookupKind::Colors,
                color.id,
                &valid(LookupKind::Colors, "Midnight", Some(json!({ "hexCode": "#191970" }))),
            )
            .expect("update");
        assert_eq!(updated.name, "Midnight");
        assert_eq!(updated.attributes, json!({ "hexCode": "#191970" }));
        assert!(updated.updated_at.is_some());

        let wrong_kind = repo.update_lookup(
            LookupKind::Brands,
            color.id,
            &valid(LookupKind::Brands, "Midnight", None),
        );
        assert!(matches!(wrong_kind, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn product_detail_resolves_lookup_names() {
        let (_container, pool) = setup_db().await;
        let seeded = seed_catalog(&pool, &["25.50"]);
        let repo = DieselCatalogRepository::new(pool);

        let hits = repo.search_products(None).expect("search");
        assert_eq!(hits.len(), 1);
        let detail = repo
            .find_product(hits[0].product_id)
            .expect("find")
            .expect("product");

        let variant = &detail.variants[0];
        assert_eq!(variant.id, seeded.variants[0]);
        assert_eq!(variant.category_name, "Shirts");
        assert_eq!(variant.color_name, "Navy");
        assert_eq!(variant.hex_code.as_deref(), Some("#000080"));
        assert_eq!(variant.size_name, "M");
        assert_eq!(variant.brand_name, "Acme");
        assert_eq!(variant.quantity, Some(10));
    }

    #[tokio::test]
    async fn search_matches_name_code_or_brand() {
        let (_container, pool) = setup_db().await;
        seed_catalog(&pool, &["10", "20"]);
        let repo = DieselCatalogRepository::new(pool);

        assert_eq!(repo.search_products(Some("tee 1")).expect("search").len(), 1);
        assert_eq!(repo.search_products(Some("tee-0")).expect("search").len(), 1);
        assert_eq!(repo.search_products(Some("acm")).expect("search").len(), 2);
        assert!(repo.search_products(Some("100%")).expect("search").is_empty());
    }

    #[tokio::test]
    async fn create_product_requires_active_lookups() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);
        let brand = repo
            .create_lookup(LookupKind::Brands, &valid(LookupKind::Brands, "Acme", None))
            .expect("brand");

        // Every reference points at the brand, so three of them have the
        // wrong kind.
        let result = repo.create_product(&NewProduct {
            name: "Tee".to_string(),
            code: "TEE".to_string(),
            description: "Cotton".to_string(),
            created_by: None,
            category_id: brand.id,
            color_id: brand.id,
            size_id: brand.id,
            brand_id: brand.id,
            price: BigDecimal::from(10),
            cost_price: BigDecimal::from(5),
            quantity: None,
        });

        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
        assert!(repo.search_products(None).expect("search").is_empty());
    }

    #[tokio::test]
    async fn unknown_variant_price_update_is_not_found() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);

        let result = repo.update_variant_price(404, &BigDecimal::from(10));

        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }
}
