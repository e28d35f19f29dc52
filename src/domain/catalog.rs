use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::errors::DomainError;
use super::limits::{check_amount, check_len, CODE_MAX_LEN, NAME_MAX_LEN};

/// The kinds of reference data kept in `catalog_lookups`. The serialized form
/// doubles as the URL segment and the `kind` column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum LookupKind {
    Brands,
    Categories,
    Colors,
    Sizes,
    ShippingMethods,
    PaymentMethods,
    Faqs,
}

impl LookupKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LookupKind::Brands => "brands",
            LookupKind::Categories => "categories",
            LookupKind::Colors => "colors",
            LookupKind::Sizes => "sizes",
            LookupKind::ShippingMethods => "shipping-methods",
            LookupKind::PaymentMethods => "payment-methods",
            LookupKind::Faqs => "faqs",
        }
    }

    /// Singular label used in user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            LookupKind::Brands => "Brand",
            LookupKind::Categories => "Category",
            LookupKind::Colors => "Color",
            LookupKind::Sizes => "Size",
            LookupKind::ShippingMethods => "Shipping method",
            LookupKind::PaymentMethods => "Payment method",
            LookupKind::Faqs => "FAQ question",
        }
    }

    /// Checks kind-specific attributes and returns them normalised to a JSON
    /// object. Unknown keys are rejected so typos do not silently vanish.
    pub fn normalize_attributes(self, attributes: Option<Value>) -> Result<Value, DomainError> {
        let map = match attributes {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map,
            Some(_) => return Err(DomainError::invalid("attributes must be a JSON object")),
        };

        let allowed: &[&str] = match self {
            LookupKind::Colors => &["hexCode"],
            LookupKind::Sizes => &["chest", "waist"],
            LookupKind::Faqs => &["answer"],
            _ => &[],
        };
        if let Some(key) = map.keys().find(|k| !allowed.contains(&k.as_str())) {
            return Err(DomainError::invalid(format!(
                "unexpected attribute '{key}' for {}",
                self.as_str()
            )));
        }

        match self {
            LookupKind::Colors => {
                let hex = map.get("hexCode").and_then(Value::as_str).unwrap_or("");
                if !is_hex_color(hex) {
                    return Err(DomainError::invalid("hexCode must look like #RRGGBB"));
                }
            }
            LookupKind::Sizes => {
                for key in ["chest", "waist"] {
                    match map.get(key).and_then(Value::as_i64) {
                        Some(v) if v >= 0 => {}
                        _ => {
                            return Err(DomainError::invalid(format!(
                                "{key} must be a non-negative integer"
                            )))
                        }
                    }
                }
            }
            LookupKind::Faqs => {
                let answer = map.get("answer").and_then(Value::as_str).unwrap_or("");
                if answer.trim().is_empty() {
                    return Err(DomainError::invalid("answer must not be empty"));
                }
            }
            _ => {}
        }

        Ok(Value::Object(map))
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LookupKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            LookupKind::Brands,
            LookupKind::Categories,
            LookupKind::Colors,
            LookupKind::Sizes,
            LookupKind::ShippingMethods,
            LookupKind::PaymentMethods,
            LookupKind::Faqs,
        ]
        .into_iter()
        .find(|k| k.as_str() == s)
        .ok_or_else(|| DomainError::invalid(format!("unknown catalog kind '{s}'")))
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[derive(Debug, Clone)]
pub struct Lookup {
    pub id: i32,
    pub kind: LookupKind,
    pub name: String,
    pub attributes: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct LookupInput {
    pub name: String,
    pub attributes: Option<Value>,
    pub actor_id: Option<i32>,
}

/// A lookup input that passed validation.
#[derive(Debug, Clone)]
pub struct ValidLookup {
    pub name: String,
    pub attributes: Value,
    pub actor_id: Option<i32>,
}

impl LookupInput {
    pub fn validate(self, kind: LookupKind) -> Result<ValidLookup, DomainError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::invalid("name must not be empty"));
        }
        check_len("name", &name, NAME_MAX_LEN)?;
        Ok(ValidLookup {
            name,
            attributes: kind.normalize_attributes(self.attributes)?,
            actor_id: self.actor_id,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProductSummary {
    pub product_id: i32,
    pub product_variant_id: i32,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub brand_name: String,
    pub size_name: String,
    pub quantity: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct VariantView {
    pub id: i32,
    pub price: BigDecimal,
    pub cost_price: BigDecimal,
    pub category_name: String,
    pub color_name: String,
    pub hex_code: Option<String>,
    pub size_name: String,
    pub brand_name: String,
    pub quantity: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub description: String,
    pub variants: Vec<VariantView>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub code: String,
    pub description: String,
    pub created_by: Option<i32>,
    pub category_id: i32,
    pub color_id: i32,
    pub size_id: i32,
    pub brand_id: i32,
    pub price: BigDecimal,
    pub cost_price: BigDecimal,
    pub quantity: Option<i32>,
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), DomainError> {
        for (field, value) in [
            ("name", &self.name),
            ("code", &self.code),
            ("description", &self.description),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::invalid(format!("{field} must not be empty")));
            }
        }
        check_len("name", &self.name, NAME_MAX_LEN)?;
        check_len("code", &self.code, CODE_MAX_LEN)?;
        let zero = BigDecimal::from(0);
        if self.price < zero || self.cost_price < zero {
            return Err(DomainError::invalid("prices must not be negative"));
        }
        check_amount("price", &self.price)?;
        check_amount("costPrice", &self.cost_price)?;
        if matches!(self.quantity, Some(q) if q < 0) {
            return Err(DomainError::invalid("quantity must not be negative"));
        }
        Ok(())
    }

    /// The lookup references a variant makes, paired with the kind each must be.
    pub fn references(&self) -> [(LookupKind, i32); 4] {
        [
            (LookupKind::Categories, self.category_id),
            (LookupKind::Colors, self.color_id),
            (LookupKind::Sizes, self.size_id),
            (LookupKind::Brands, self.brand_id),
        ]
    }
}
