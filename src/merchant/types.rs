//! Domain types for the merchant API.

use serde::Serialize;

/// Merchant identity from the discovery document.
#[derive(Debug, Clone, PartialEq)]
pub struct Merchant {
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub contact: Option<String>,
}

/// Discovery document describing a merchant endpoint.
///
/// Immutable once fetched; a fresh call re-fetches.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryDocument {
    pub merchant: Merchant,
    /// Whether transactions against this merchant are simulated.
    pub sandbox: bool,
    pub version: Option<String>,
}

/// A single catalog entry. Listing order reflects server-assigned ranking
/// and is not guaranteed stable across calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    /// Product type tag, e.g. "digital", "physical", "booking".
    pub kind: String,
    pub description: Option<String>,
    pub currency: Option<String>,
    pub in_stock: Option<bool>,
}

/// One requested product and quantity in a checkout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub product_id: String,
    pub quantity: u32,
}

impl LineItem {
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Buyer identity attached to a checkout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Buyer {
    pub name: String,
    pub email: String,
}

impl Buyer {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Order money totals.
#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
    pub total: f64,
}

impl Totals {
    /// Whether the parts are non-negative and add up to the total within a
    /// one-cent rounding tolerance.
    pub fn is_consistent(&self) -> bool {
        self.subtotal >= 0.0
            && self.tax >= 0.0
            && self.shipping >= 0.0
            && self.total >= 0.0
            && (self.subtotal + self.tax + self.shipping - self.total).abs() <= 0.01
    }
}

/// One fulfillment record on an order.
#[derive(Debug, Clone, PartialEq)]
pub struct Fulfillment {
    /// Fulfillment type tag, e.g. "instant_download", "shipping".
    pub kind: String,
    pub status: String,
    pub product_id: Option<String>,
    /// Present only when the fulfillment is a delivered download.
    pub download_url: Option<String>,
    pub tracking_number: Option<String>,
    pub confirmation_code: Option<String>,
    pub redirect_url: Option<String>,
}

/// Order lifecycle status.
///
/// The server defines the authoritative set; unrecognized values are kept
/// verbatim in [`OrderStatus::Other`] rather than rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderStatus {
    Created,
    Paid,
    Fulfilled,
    /// Sandbox servers report fully processed orders as "completed".
    Completed,
    Failed,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Paid => "paid",
            OrderStatus::Fulfilled => "fulfilled",
            OrderStatus::Completed => "completed",
            OrderStatus::Failed => "failed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Other(s) => s,
        }
    }

    /// Position in the forward lifecycle, if this status is part of it.
    /// Terminal failure states and unrecognized values have no stage.
    fn stage(&self) -> Option<u8> {
        match self {
            OrderStatus::Created => Some(0),
            OrderStatus::Paid => Some(1),
            OrderStatus::Fulfilled | OrderStatus::Completed => Some(2),
            _ => None,
        }
    }

    /// Whether this status sits earlier in the lifecycle than a previously
    /// observed one. Status may progress between reads but never revert.
    pub fn regressed_from(&self, earlier: &OrderStatus) -> bool {
        match (self.stage(), earlier.stage()) {
            (Some(now), Some(before)) => now < before,
            _ => false,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "created" => OrderStatus::Created,
            "paid" => OrderStatus::Paid,
            "fulfilled" => OrderStatus::Fulfilled,
            "completed" => OrderStatus::Completed,
            "failed" => OrderStatus::Failed,
            "cancelled" => OrderStatus::Cancelled,
            _ => OrderStatus::Other(s),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A placed order as reported by the merchant.
///
/// Order lookup responses may omit totals and fulfillment; checkout
/// responses carry both.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub order_id: String,
    pub status: OrderStatus,
    pub created_at: Option<String>,
    pub totals: Option<Totals>,
    pub fulfillment: Vec<Fulfillment>,
}

/// Catalog filter options recognized by the products endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Inclusive upper bound on returned product prices.
    pub max_price: Option<f64>,
    /// Restrict to one product type tag.
    pub kind: Option<String>,
    /// Restrict to products currently in stock.
    pub in_stock: Option<bool>,
}

impl ProductFilter {
    pub fn is_empty(&self) -> bool {
        self.max_price.is_none() && self.kind.is_none() && self.in_stock.is_none()
    }

    /// Query parameters in the server's naming.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(max_price) = self.max_price {
            query.push(("max_price", max_price.to_string()));
        }
        if let Some(kind) = &self.kind {
            query.push(("type", kind.clone()));
        }
        if let Some(in_stock) = self.in_stock {
            query.push(("in_stock", in_stock.to_string()));
        }
        query
    }
}
