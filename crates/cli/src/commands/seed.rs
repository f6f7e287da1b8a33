//! Seed the catalog with the sample laptop products.

use rust_decimal::Decimal;
use tracing::info;

use gadget_grove_core::{Price, ProductId};
use gadget_grove_remote_store::rows::{self, NewProduct};

use super::store_from_env;

fn laptop(
    id: &str,
    name: &str,
    description: &str,
    price_cents: i64,
    image_url: &str,
) -> NewProduct {
    NewProduct {
        id: Some(ProductId::new(id)),
        name: name.to_string(),
        description: description.to_string(),
        // Seed data is fixed and known non-negative
        price: Price::new(Decimal::new(price_cents, 2)).expect("seed price is non-negative"),
        image_url: Some(image_url.to_string()),
        image_url_2: Some(image_url.to_string()),
        image_url_3: Some(image_url.to_string()),
        image_url_4: None,
        image_url_5: None,
    }
}

fn sample_catalog() -> Vec<NewProduct> {
    vec![
        laptop(
            "123e4567-e89b-12d3-a456-426614174000",
            "MacBook Pro 16\"",
            "Powerful laptop with M2 Pro chip, perfect for professionals and creatives.",
            2_499_99,
            "https://images.unsplash.com/photo-1517336714731-489689fd1ca8",
        ),
        laptop(
            "123e4567-e89b-12d3-a456-426614174001",
            "Dell XPS 15",
            "Premium ultrabook with stunning display and powerful performance.",
            1_999_99,
            "https://images.unsplash.com/photo-1593642632823-8f785ba67e45",
        ),
        laptop(
            "123e4567-e89b-12d3-a456-426614174002",
            "Lenovo ThinkPad X1",
            "Business laptop with legendary durability and security features.",
            1_799_99,
            "https://images.unsplash.com/photo-1496181133206-80ce9b88a853",
        ),
        laptop(
            "123e4567-e89b-12d3-a456-426614174003",
            "ASUS ROG Zephyrus",
            "Gaming laptop with high refresh rate display and powerful GPU.",
            2_299_99,
            "https://images.unsplash.com/photo-1603302576837-37561b2e2302",
        ),
        laptop(
            "123e4567-e89b-12d3-a456-426614174004",
            "HP Spectre x360",
            "Convertible laptop with premium design and all-day battery life.",
            1_599_99,
            "https://images.unsplash.com/photo-1496181133206-80ce9b88a853",
        ),
    ]
}

/// Seed the `products` table.
///
/// # Errors
///
/// Returns an error if the environment is incomplete or a remote call fails.
pub async fn products(clear: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = store_from_env()?;

    if clear {
        info!("Clearing existing products");
        store
            .from(rows::PRODUCTS_TABLE)
            .not_null("id")
            .delete(None)
            .await?;
    }

    let catalog = sample_catalog();
    info!(count = catalog.len(), "Inserting sample products");
    store
        .from(rows::PRODUCTS_TABLE)
        .insert(&catalog, None)
        .await?;

    info!("Catalog seeded successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_sample_catalog_has_five_laptops_with_pinned_ids() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 5);
        assert!(catalog.iter().all(|p| p.id.is_some()));
        assert!(catalog.iter().all(|p| p.image_url.is_some()));
    }
}
