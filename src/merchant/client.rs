//! Merchant API client.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::error::UcpError;
use crate::http::HttpClient;
use crate::http::retry::{BASE_DELAY_MS, MAX_ATTEMPTS};

use super::{
    Buyer, DiscoveryDocument, Fulfillment, LineItem, Merchant, Order, Product, ProductFilter,
    Totals,
};

/// Default per-attempt request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Merchant API wire types (internal).
mod api {
    use serde::{Deserialize, Serialize};

    #[derive(Deserialize, Debug)]
    pub struct DiscoveryResponse {
        pub ucp: UcpEnvelope,
    }

    #[derive(Deserialize, Debug)]
    pub struct UcpEnvelope {
        pub version: Option<String>,
        pub merchant: MerchantInfo,
        pub sandbox: bool,
    }

    #[derive(Deserialize, Debug)]
    pub struct MerchantInfo {
        pub name: String,
        pub description: String,
        pub website: Option<String>,
        pub contact: Option<String>,
    }

    #[derive(Deserialize, Debug)]
    pub struct ProductsResponse {
        pub count: usize,
        pub products: Vec<ProductInfo>,
    }

    #[derive(Deserialize, Debug)]
    pub struct ProductInfo {
        pub id: String,
        pub name: String,
        pub price: f64,
        #[serde(rename = "type")]
        pub kind: String,
        pub description: Option<String>,
        pub currency: Option<String>,
        pub in_stock: Option<bool>,
    }

    #[derive(Serialize, Debug)]
    pub struct CheckoutRequest<'a> {
        pub line_items: &'a [super::LineItem],
        pub buyer: &'a super::Buyer,
        pub payment_token: &'a str,
    }

    #[derive(Deserialize, Debug)]
    pub struct OrderResponse {
        pub order_id: String,
        pub status: String,
        pub created_at: Option<String>,
        pub totals: Option<TotalsInfo>,
        #[serde(default)]
        pub fulfillment: Vec<FulfillmentInfo>,
    }

    #[derive(Deserialize, Debug)]
    pub struct TotalsInfo {
        pub subtotal: f64,
        #[serde(default)]
        pub tax: f64,
        #[serde(default)]
        pub shipping: f64,
        pub total: f64,
    }

    #[derive(Deserialize, Debug)]
    pub struct FulfillmentInfo {
        #[serde(rename = "type")]
        pub kind: String,
        pub status: String,
        pub product_id: Option<String>,
        pub download_url: Option<String>,
        pub tracking_number: Option<String>,
        pub confirmation_code: Option<String>,
        pub redirect_url: Option<String>,
    }
}

/// Configuration for a [`CommerceClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Merchant base URL, e.g. `https://puddingheroes.com`.
    pub base_url: String,
    /// Per-attempt request timeout. Expiry is classified as transient.
    pub timeout: Duration,
    /// Maximum physical attempts per logical operation.
    pub max_attempts: usize,
    /// Backoff base delay; doubles per attempt, capped.
    pub retry_base_delay: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_attempts: MAX_ATTEMPTS,
            retry_base_delay: Duration::from_millis(BASE_DELAY_MS),
        }
    }
}

/// The four merchant operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MerchantApi: Send + Sync {
    async fn discover(&self) -> Result<DiscoveryDocument, UcpError>;
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, UcpError>;
    async fn checkout(
        &self,
        line_items: &[LineItem],
        buyer: &Buyer,
        payment_token: &str,
    ) -> Result<Order, UcpError>;
    async fn get_order(&self, order_id: &str) -> Result<Order, UcpError>;
}

/// Client for one merchant endpoint.
///
/// Holds no mutable state between calls; clones share the connection pool
/// and concurrent calls on one instance are independent.
#[derive(Clone)]
pub struct CommerceClient {
    http: HttpClient,
    base_url: String,
    key_gen: Arc<dyn Fn() -> String + Send + Sync>,
}

impl CommerceClient {
    /// Creates a client from configuration.
    pub fn new(config: ClientConfig) -> Result<Self, UcpError> {
        let client = Client::builder()
            .user_agent("ucpc-cli")
            .timeout(config.timeout)
            .build()
            .map_err(|e| UcpError::Validation(format!("invalid client configuration: {}", e)))?;

        let http = HttpClient::new(client, config.max_attempts, config.retry_base_delay);
        Ok(Self::from_http_client(http, &config.base_url))
    }

    /// Creates a client from an existing HttpClient.
    pub fn from_http_client(http: HttpClient, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            key_gen: Arc::new(fresh_idempotency_key),
        }
    }

    /// Replaces the idempotency key generator. Each logical checkout calls
    /// it exactly once and reuses the result across retries.
    pub fn with_idempotency_keys<F>(mut self, keys: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.key_gen = Arc::new(keys);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn fresh_idempotency_key() -> String {
    Uuid::new_v4().to_string()
}

fn validate_checkout(
    line_items: &[LineItem],
    buyer: &Buyer,
    payment_token: &str,
) -> Result<(), UcpError> {
    if line_items.is_empty() {
        return Err(UcpError::Validation(
            "checkout requires at least one line item".to_string(),
        ));
    }
    for item in line_items {
        if item.quantity < 1 {
            return Err(UcpError::Validation(format!(
                "quantity must be at least 1 for product '{}'",
                item.product_id
            )));
        }
    }
    if buyer.name.trim().is_empty() {
        return Err(UcpError::Validation("buyer name must not be empty".to_string()));
    }
    if buyer.email.trim().is_empty() {
        return Err(UcpError::Validation(
            "buyer email must not be empty".to_string(),
        ));
    }
    if payment_token.is_empty() {
        return Err(UcpError::Validation(
            "payment token must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_order(order: &Order) -> Result<(), UcpError> {
    if let Some(totals) = &order.totals {
        if !totals.is_consistent() {
            return Err(UcpError::Protocol(format!(
                "order '{}' totals are inconsistent: {} + {} + {} != {}",
                order.order_id, totals.subtotal, totals.tax, totals.shipping, totals.total
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl MerchantApi for CommerceClient {
    /// Fetches the merchant discovery document from the well-known path.
    #[tracing::instrument(skip(self))]
    async fn discover(&self) -> Result<DiscoveryDocument, UcpError> {
        let url = format!("{}/.well-known/ucp.json", self.base_url);
        debug!("Fetching discovery document from {}...", url);

        let response: api::DiscoveryResponse = self.http.get_json(&url).await?;
        Ok(response.into())
    }

    /// Lists catalog products, optionally filtered. Each call re-fetches.
    #[tracing::instrument(skip(self, filter))]
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, UcpError> {
        let url = format!("{}/api/ucp/products", self.base_url);
        debug!("Fetching products from {} with filter {:?}...", url, filter);

        let response: api::ProductsResponse = if filter.is_empty() {
            self.http.get_json(&url).await?
        } else {
            self.http.get_json_with_query(&url, &filter.to_query()).await?
        };

        if response.count != response.products.len() {
            return Err(UcpError::Protocol(format!(
                "product count {} does not match list length {}",
                response.count,
                response.products.len()
            )));
        }

        let products: Vec<Product> = response.products.into_iter().map(|p| p.into()).collect();
        for product in &products {
            if product.price < 0.0 {
                return Err(UcpError::Protocol(format!(
                    "product '{}' has negative price {}",
                    product.id, product.price
                )));
            }
        }

        Ok(products)
    }

    /// Places an order.
    ///
    /// One idempotency key is generated per logical call and reused on every
    /// physical attempt, so at most one order is created even when transient
    /// failures force retries. Rejections (4xx) surface on the first
    /// attempt and are never retried.
    #[tracing::instrument(skip(self, line_items, buyer, payment_token))]
    async fn checkout(
        &self,
        line_items: &[LineItem],
        buyer: &Buyer,
        payment_token: &str,
    ) -> Result<Order, UcpError> {
        validate_checkout(line_items, buyer, payment_token)?;

        let url = format!("{}/api/ucp/checkout", self.base_url);
        let idempotency_key = (self.key_gen)();
        debug!(
            "Posting checkout to {} with idempotency key {}...",
            url, idempotency_key
        );

        let request = api::CheckoutRequest {
            line_items,
            buyer,
            payment_token,
        };

        let response: api::OrderResponse =
            self.http.post_json(&url, &request, &idempotency_key).await?;

        let order: Order = response.into();
        validate_order(&order)?;
        Ok(order)
    }

    /// Fetches the current state of an order. Pure read; retried on
    /// transient failure without an idempotency key.
    #[tracing::instrument(skip(self))]
    async fn get_order(&self, order_id: &str) -> Result<Order, UcpError> {
        let url = format!("{}/api/ucp/orders/{}", self.base_url, order_id);
        debug!("Fetching order from {}...", url);

        let response: api::OrderResponse = self.http.get_json(&url).await?;
        let order: Order = response.into();
        validate_order(&order)?;
        Ok(order)
    }
}

impl From<api::DiscoveryResponse> for DiscoveryDocument {
    fn from(r: api::DiscoveryResponse) -> Self {
        DiscoveryDocument {
            merchant: Merchant {
                name: r.ucp.merchant.name,
                description: r.ucp.merchant.description,
                website: r.ucp.merchant.website,
                contact: r.ucp.merchant.contact,
            },
            sandbox: r.ucp.sandbox,
            version: r.ucp.version,
        }
    }
}

impl From<api::ProductInfo> for Product {
    fn from(p: api::ProductInfo) -> Self {
        Product {
            id: p.id,
            name: p.name,
            price: p.price,
            kind: p.kind,
            description: p.description,
            currency: p.currency,
            in_stock: p.in_stock,
        }
    }
}

impl From<api::OrderResponse> for Order {
    fn from(r: api::OrderResponse) -> Self {
        Order {
            order_id: r.order_id,
            status: r.status.into(),
            created_at: r.created_at,
            totals: r.totals.map(|t| Totals {
                subtotal: t.subtotal,
                tax: t.tax,
                shipping: t.shipping,
                total: t.total,
            }),
            fulfillment: r.fulfillment.into_iter().map(|f| f.into()).collect(),
        }
    }
}

impl From<api::FulfillmentInfo> for Fulfillment {
    fn from(f: api::FulfillmentInfo) -> Self {
        Fulfillment {
            kind: f.kind,
            status: f.status,
            product_id: f.product_id,
            download_url: f.download_url,
            tracking_number: f.tracking_number,
            confirmation_code: f.confirmation_code,
            redirect_url: f.redirect_url,
        }
    }
}
