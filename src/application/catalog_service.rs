use bigdecimal::BigDecimal;

use crate::domain::catalog::{
    Lookup, LookupInput, LookupKind, NewProduct, ProductDetail, ProductSummary,
};
use crate::domain::errors::DomainError;
use crate::domain::limits::check_amount;
use crate::domain::ports::CatalogRepository;

pub struct CatalogService<R> {
    repo: R,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_lookups(&self, kind: LookupKind) -> Result<Vec<Lookup>, DomainError> {
        self.repo.list_lookups(kind)
    }

    pub fn create_lookup(
        &self,
        kind: LookupKind,
        input: LookupInput,
    ) -> Result<Lookup, DomainError> {
        let input = input.validate(kind)?;
        self.repo.create_lookup(kind, &input)
    }

    pub fn update_lookup(
        &self,
        kind: LookupKind,
        id: i32,
        input: LookupInput,
    ) -> Result<Lookup, DomainError> {
        let input = input.validate(kind)?;
        self.repo.update_lookup(kind, id, &input)
    }

    pub fn delete_lookup(
        &self,
        kind: LookupKind,
        id: i32,
        deleted_by: Option<i32>,
    ) -> Result<(), DomainError> {
        self.repo.deactivate_lookup(kind, id, deleted_by)
    }

    pub fn search_products(&self, search: Option<&str>) -> Result<Vec<ProductSummary>, DomainError> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        self.repo.search_products(search)
    }

    pub fn get_product(&self, id: i32) -> Result<ProductDetail, DomainError> {
        self.repo
            .find_product(id)?
            .ok_or_else(|| DomainError::not_found("Product"))
    }

    pub fn create_product(&self, product: NewProduct) -> Result<ProductDetail, DomainError> {
        product.validate()?;
        let id = self.repo.create_product(&product)?;
        log::info!("Product {} ({}) created", id, product.code);
        self.get_product(id)
    }

    /// Only future cart writes see the new price; order lines keep theirs.
    pub fn update_variant_price(&self, variant_id: i32, price: &BigDecimal) -> Result<(), DomainError> {
        if *price < BigDecimal::from(0) {
            return Err(DomainError::invalid("price must not be negative"));
        }
        check_amount("price", price)?;
        self.repo.update_variant_price(variant_id, price)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::domain::catalog::ValidLookup;

    #[derive(Default)]
    struct FakeCatalog {
        created: Mutex<Vec<(LookupKind, ValidLookup)>>,
        searches: Mutex<Vec<Option<String>>>,
    }

    impl CatalogRepository for FakeCatalog {
        fn list_lookups(&self, _kind: LookupKind) -> Result<Vec<Lookup>, DomainError> {
            Ok(vec![])
        }

        fn create_lookup(
            &self,
            kind: LookupKind,
            input: &ValidLookup,
        ) -> Result<Lookup, DomainError> {
            self.created
                .lock()
                .expect("lock")
                .push((kind, input.clone()));
            Ok(Lookup {
                id: 1,
                kind,
                name: input.name.clone(),
                attributes: input.attributes.clone(),
                created_at: chrono::Utc::now(),
                updated_at: None,
            })
        }

        fn update_lookup(
            &self,
            _kind: LookupKind,
            _id: i32,
            _input: &ValidLookup,
        ) -> Result<Lookup, DomainError> {
            Err(DomainError::not_found("Lookup"))
        }

        fn deactivate_lookup(
            &self,
            _kind: LookupKind,
            _id: i32,
            _deleted_by: Option<i32>,
        ) -> Result<(), DomainError> {
            Ok(())
        }

        fn search_products(
            &self,
            search: Option<&str>,
        ) -> Result<Vec<ProductSummary>, DomainError> {
            self.searches
                .lock()
                .expect("lock")
                .push(search.map(str::to_string));
            Ok(vec![])
        }

        fn find_product(&self, _id: i32) -> Result<Option<ProductDetail>, DomainError> {
            Ok(None)
        }

        fn create_product(&self, _product: &NewProduct) -> Result<i32, DomainError> {
            Ok(1)
        }

        fn update_variant_price(
            &self,
            _variant_id: i32,
            _price: &BigDecimal,
        ) -> Result<(), DomainError> {
            Ok(())
        }
    }

    #[test]
    fn create_lookup_validates_before_writing() {
        let svc = CatalogService::new(FakeCatalog::default());
        let bad = svc.create_lookup(
            LookupKind::Colors,
            LookupInput {
                name: "Crimson".to_string(),
                attributes: None,
                actor_id: None,
            },
        );
        assert!(matches!(bad, Err(DomainError::InvalidInput(_))));
        assert!(svc.repo.created.lock().expect("lock").is_empty());

        let ok = svc
            .create_lookup(
                LookupKind::Colors,
                LookupInput {
                    name: " Crimson ".to_string(),
                    attributes: Some(json!({ "hexCode": "#DC143C" })),
                    actor_id: Some(1),
                },
            )
            .expect("created");
        assert_eq!(ok.name, "Crimson");
    }

    #[test]
    fn blank_search_means_no_filter() {
        let svc = CatalogService::new(FakeCatalog::default());
        svc.search_products(Some("   ")).expect("search");
        svc.search_products(Some(" tee ")).expect("search");
        assert_eq!(
            *svc.repo.searches.lock().expect("lock"),
            vec![None, Some("tee".to_string())]
        );
    }

    #[test]
    fn missing_product_is_not_found() {
        let svc = CatalogService::new(FakeCatalog::default());
        assert!(matches!(svc.get_product(5), Err(DomainError::NotFound(_))));
    }

    #[test]
    fn negative_price_is_rejected() {
        let svc = CatalogService::new(FakeCatalog::default());
        assert!(matches!(
            svc.update_variant_price(1, &BigDecimal::from(-1)),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn price_must_be_whole_cents_within_range() {
        use std::str::FromStr;

        let svc = CatalogService::new(FakeCatalog::default());
        let price = |s: &str| BigDecimal::from_str(s).expect("valid decimal");

        assert!(svc.update_variant_price(1, &price("9.990")).is_ok());
        assert!(matches!(
            svc.update_variant_price(1, &price("9.999")),
            Err(DomainError::InvalidInput(msg)) if msg == "price must have at most 2 decimal places"
        ));
        assert!(matches!(
            svc.update_variant_price(1, &price("10000000000")),
            Err(DomainError::InvalidInput(_))
        ));
    }
}
