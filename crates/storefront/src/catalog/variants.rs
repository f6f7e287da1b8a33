//! Synthetic variant enrichment.
//!
//! Variant groups are invented on the read path and carry no backing
//! storage: two fetches of the same product always yield structurally
//! identical groups, and nothing here ever flows back into a persisted row.
//! Selection state lives only in the client and is cleared after add-to-cart.

use serde::{Deserialize, Serialize};

use gadget_grove_core::VariantGroupId;

/// A named set of selectable options attached to a product at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantGroup {
    pub id: VariantGroupId,
    pub name: String,
    pub options: Vec<String>,
}

/// Attach the synthetic variant groups for a product.
///
/// Deterministic given the product name. Every product currently receives
/// the same RAM/Storage/Processor options regardless of its category; the
/// name parameter keeps the seam in place for per-category rules later.
#[must_use]
pub fn synthetic_variant_groups(_product_name: &str) -> Vec<VariantGroup> {
    vec![
        VariantGroup {
            id: VariantGroupId::new("ram"),
            name: "RAM".to_string(),
            options: vec!["8GB".to_string(), "16GB".to_string(), "32GB".to_string()],
        },
        VariantGroup {
            id: VariantGroupId::new("storage"),
            name: "Storage".to_string(),
            options: vec![
                "256GB SSD".to_string(),
                "512GB SSD".to_string(),
                "1TB SSD".to_string(),
            ],
        },
        VariantGroup {
            id: VariantGroupId::new("processor"),
            name: "Processor".to_string(),
            options: vec![
                "Intel i5".to_string(),
                "Intel i7".to_string(),
                "Intel i9".to_string(),
                "AMD Ryzen 7".to_string(),
                "AMD Ryzen 9".to_string(),
            ],
        },
    ]
}
