//! Merchant API client and domain types.

pub mod client;
pub mod types;

pub use client::{ClientConfig, CommerceClient, DEFAULT_TIMEOUT_SECS, MerchantApi};
pub use types::{
    Buyer, DiscoveryDocument, Fulfillment, LineItem, Merchant, Order, OrderStatus, Product,
    ProductFilter, Totals,
};

#[cfg(test)]
pub use client::MockMerchantApi;
