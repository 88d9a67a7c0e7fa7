use anyhow::Result;
use log::debug;

use crate::merchant::{MerchantApi, ProductFilter};

/// List catalog products, optionally filtered.
#[tracing::instrument(skip(api, filter))]
pub async fn products(api: &dyn MerchantApi, filter: &ProductFilter) -> Result<()> {
    debug!("Listing products with filter {:?}", filter);

    let products = api.list_products(filter).await?;
    if products.is_empty() {
        println!("No products available.");
        return Ok(());
    }

    println!("Found {} product(s):", products.len());
    for product in &products {
        println!("  - {}: ${:.2} ({})", product.name, product.price, product.kind);
    }

    Ok(())
}
