//! CLI command implementations.
//!
//! All user-facing output happens in this layer; the merchant client below
//! it only returns values and errors.

use anyhow::Result;

use crate::merchant::{ClientConfig, CommerceClient, Order};

mod checkout;
mod demo;
mod discover;
mod order;
mod products;

pub use checkout::{ItemSpec, checkout};
pub use demo::{DemoOptions, demo};
pub use discover::discover;
pub use order::order;
pub use products::products;

/// Builds a client for the given merchant endpoint with default settings.
pub fn build_client(merchant_url: &str) -> Result<CommerceClient> {
    let config = ClientConfig::new(merchant_url);
    Ok(CommerceClient::new(config)?)
}

/// Prints an order the way checkout and order lookup both show it.
pub(crate) fn print_order(order: &Order) {
    println!("Order ID: {}", order.order_id);
    println!("Status: {}", order.status);
    if let Some(totals) = &order.totals {
        println!(
            "Total: ${:.2} (subtotal ${:.2}, tax ${:.2}, shipping ${:.2})",
            totals.total, totals.subtotal, totals.tax, totals.shipping
        );
    }
    for fulfillment in &order.fulfillment {
        println!("Fulfillment: {} ({})", fulfillment.kind, fulfillment.status);
        if let Some(url) = &fulfillment.download_url {
            println!("  Download URL: {}", url);
        }
        if let Some(tracking) = &fulfillment.tracking_number {
            println!("  Tracking number: {}", tracking);
        }
        if let Some(code) = &fulfillment.confirmation_code {
            println!("  Confirmation code: {}", code);
        }
    }
}
