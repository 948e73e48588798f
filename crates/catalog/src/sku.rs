use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use wms_core::{DomainError, DomainResult, SellerId, SkuId};

use crate::{limited, required};

/// A stock keeping unit sold by a seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sku {
    pub id: SkuId,
    pub seller_id: SellerId,
    pub name: String,
    pub code: String,
    pub description: String,
    pub category: String,
    pub subcategory: String,
    pub brand: String,
    pub model: String,
    /// Unit of measure (e.g. "EA", "KG").
    pub uom: String,
    pub weight: f64,
    /// Free-form dimensions document (length/width/height, units, ...).
    pub dimensions: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a SKU.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewSku {
    pub seller_id: Option<SellerId>,
    pub name: String,
    pub code: String,
    pub description: String,
    pub category: String,
    pub subcategory: String,
    pub brand: String,
    pub model: String,
    pub uom: String,
    pub weight: f64,
    pub dimensions: JsonValue,
}

impl NewSku {
    pub fn into_sku(self, id: SkuId, now: DateTime<Utc>) -> DomainResult<Sku> {
        let seller_id = self
            .seller_id
            .ok_or_else(|| DomainError::invalid_id("seller_id is required"))?
            .ensure_present()?;

        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(DomainError::validation("weight must be a non-negative number"));
        }

        Ok(Sku {
            id,
            seller_id,
            name: required("name", self.name, 100)?,
            code: required("code", self.code, 50)?,
            description: limited("description", self.description, 500)?,
            category: limited("category", self.category, 100)?,
            subcategory: limited("subcategory", self.subcategory, 100)?,
            brand: limited("brand", self.brand, 100)?,
            model: limited("model", self.model, 100)?,
            uom: required("uom", self.uom, 20)?,
            weight: self.weight,
            dimensions: self.dimensions,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn new_sku() -> NewSku {
        NewSku {
            seller_id: Some(SellerId::new()),
            name: "Widget".to_string(),
            code: "WID-1".to_string(),
            uom: "EA".to_string(),
            weight: 1.25,
            dimensions: serde_json::json!({ "l": 10, "w": 5, "h": 2 }),
            ..Default::default()
        }
    }

    #[test]
    fn into_sku_keeps_dimensions() {
        let sku = new_sku().into_sku(SkuId::new(), Utc::now()).unwrap();
        assert_eq!(sku.dimensions["l"], 10);
        assert_eq!(sku.uom, "EA");
    }

    #[test]
    fn missing_uom_is_rejected() {
        let err = NewSku {
            uom: String::new(),
            ..new_sku()
        }
        .into_sku(SkuId::new(), Utc::now())
        .unwrap_err();
        assert_eq!(err, DomainError::validation("uom cannot be empty"));
    }

    #[test]
    fn overlong_text_fields_are_rejected() {
        let err = NewSku {
            code: "C".repeat(51),
            ..new_sku()
        }
        .into_sku(SkuId::new(), Utc::now())
        .unwrap_err();
        assert_eq!(err, DomainError::validation("code cannot exceed 50 characters"));

        let err = NewSku {
            description: "d".repeat(501),
            ..new_sku()
        }
        .into_sku(SkuId::new(), Utc::now())
        .unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("description cannot exceed 500 characters")
        );
    }

    #[test]
    fn deserializes_sparse_payload() {
        let json = serde_json::json!({
            "seller_id": SellerId::new().to_string(),
            "name": "Bolt",
            "code": "B-1",
            "uom": "EA",
        });
        let input: NewSku = serde_json::from_value(json).unwrap();
        let sku = input.into_sku(SkuId::new(), Utc::now()).unwrap();
        assert_eq!(sku.weight, 0.0);
        assert!(sku.dimensions.is_null());
    }

    proptest! {
        #[test]
        fn negative_weight_is_always_rejected(weight in -1.0e6f64..-1.0e-9) {
            let result = NewSku { weight, ..new_sku() }.into_sku(SkuId::new(), Utc::now());
            prop_assert!(matches!(result, Err(DomainError::Validation(_))));
        }
    }
}
