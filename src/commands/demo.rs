use anyhow::{Result, bail};
use log::warn;

use crate::merchant::{Buyer, LineItem, MerchantApi, Product, ProductFilter};

/// Options for the end-to-end demo flow.
#[derive(Debug, Clone)]
pub struct DemoOptions {
    /// Product to buy; defaults to the first free catalog item.
    pub product: Option<String>,
    pub buyer: Buyer,
    pub payment_token: String,
}

/// Run the full discovery-to-order flow against one merchant:
/// discover, browse the catalog, find free items, buy one, and poll the
/// resulting order.
#[tracing::instrument(skip(api, options))]
pub async fn demo(api: &dyn MerchantApi, options: &DemoOptions) -> Result<()> {
    println!("[1] Discovering merchant...");
    let doc = api.discover().await?;
    println!("    Merchant: {}", doc.merchant.name);
    println!("    Description: {}", doc.merchant.description);
    println!("    Sandbox mode: {}", doc.sandbox);

    println!("[2] Fetching product catalog...");
    let products = api.list_products(&ProductFilter::default()).await?;
    println!("    Found {} product(s):", products.len());
    for product in &products {
        println!("    - {}: ${:.2} ({})", product.name, product.price, product.kind);
    }

    println!("[3] Finding free products...");
    let free = api
        .list_products(&ProductFilter {
            max_price: Some(0.0),
            ..Default::default()
        })
        .await?;
    println!("    Found {} free item(s)", free.len());

    let product = select_product(options.product.as_deref(), &products, &free)?;
    println!("[4] Purchasing '{}'...", product.name);
    let order = api
        .checkout(
            &[LineItem::new(&product.id, 1)],
            &options.buyer,
            &options.payment_token,
        )
        .await?;
    println!("    Order ID: {}", order.order_id);
    println!("    Status: {}", order.status);
    if let Some(totals) = &order.totals {
        println!("    Total: ${:.2}", totals.total);
    }

    if let Some(fulfillment) = order.fulfillment.first() {
        println!("[5] Fulfillment:");
        println!("    Type: {}", fulfillment.kind);
        println!("    Status: {}", fulfillment.status);
        if let Some(url) = &fulfillment.download_url {
            println!("    Download URL: {}", url);
        }
    }

    println!("[6] Checking order status...");
    let latest = api.get_order(&order.order_id).await?;
    println!("    Order {}: {}", latest.order_id, latest.status);
    if latest.status.regressed_from(&order.status) {
        warn!(
            "order {} status went backwards: {} -> {}",
            latest.order_id, order.status, latest.status
        );
    }

    Ok(())
}

/// Picks the product to buy: the explicitly requested one, or the first
/// free catalog item.
fn select_product<'a>(
    requested: Option<&str>,
    products: &'a [Product],
    free: &'a [Product],
) -> Result<&'a Product> {
    if let Some(id) = requested {
        return match products.iter().find(|p| p.id == id) {
            Some(product) => Ok(product),
            None => bail!("product '{}' not found in the catalog", id),
        };
    }

    match free.first() {
        Some(product) => Ok(product),
        None => bail!("no free products available; pass --product to choose one"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merchant::{
        DiscoveryDocument, Fulfillment, Merchant, MockMerchantApi, Order, OrderStatus, Totals,
    };

    fn sample_doc() -> DiscoveryDocument {
        DiscoveryDocument {
            merchant: Merchant {
                name: "Pudding Heroes".to_string(),
                description: "Sci-fi books and experiments".to_string(),
                website: None,
                contact: None,
            },
            sandbox: true,
            version: Some("1.0".to_string()),
        }
    }

    fn free_product() -> Product {
        Product {
            id: "pudding-theory-pdf".to_string(),
            name: "Pudding Theory".to_string(),
            price: 0.0,
            kind: "digital".to_string(),
            description: None,
            currency: Some("USD".to_string()),
            in_stock: Some(true),
        }
    }

    fn sample_order() -> Order {
        Order {
            order_id: "ORD_ABC123".to_string(),
            status: OrderStatus::Completed,
            created_at: None,
            totals: Some(Totals {
                subtotal: 0.0,
                tax: 0.0,
                shipping: 0.0,
                total: 0.0,
            }),
            fulfillment: vec![Fulfillment {
                kind: "instant_download".to_string(),
                status: "delivered".to_string(),
                product_id: Some("pudding-theory-pdf".to_string()),
                download_url: Some("https://example.com/pudding-theory.pdf".to_string()),
                tracking_number: None,
                confirmation_code: None,
                redirect_url: None,
            }],
        }
    }

    fn options() -> DemoOptions {
        DemoOptions {
            product: None,
            buyer: Buyer::new("Test Agent", "agent@example.com"),
            payment_token: "sandbox_test".to_string(),
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_demo_runs_full_flow() {
        let mut api = MockMerchantApi::new();
        api.expect_discover().times(1).returning(|| Ok(sample_doc()));
        api.expect_list_products()
            .withf(|filter| filter.is_empty())
            .times(1)
            .returning(|_| Ok(vec![free_product()]));
        api.expect_list_products()
            .withf(|filter| filter.max_price == Some(0.0))
            .times(1)
            .returning(|_| Ok(vec![free_product()]));
        api.expect_checkout()
            .withf(|items, _, token| {
                items == [LineItem::new("pudding-theory-pdf", 1)] && token == "sandbox_test"
            })
            .times(1)
            .returning(|_, _, _| Ok(sample_order()));
        api.expect_get_order()
            .times(1)
            .returning(|id| {
                Ok(Order {
                    order_id: id.to_string(),
                    status: OrderStatus::Completed,
                    created_at: None,
                    totals: None,
                    fulfillment: vec![],
                })
            });

        assert!(demo(&api, &options()).await.is_ok());
    }

    #[test_log::test(tokio::test)]
    async fn test_demo_fails_without_a_buyable_product() {
        let mut api = MockMerchantApi::new();
        api.expect_discover().times(1).returning(|| Ok(sample_doc()));
        api.expect_list_products().times(2).returning(|_| Ok(vec![]));

        let result = demo(&api, &options()).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("no free products"));
    }

    #[test]
    fn test_select_product_by_id() {
        let products = vec![free_product()];
        let selected = select_product(Some("pudding-theory-pdf"), &products, &[]).unwrap();
        assert_eq!(selected.id, "pudding-theory-pdf");

        assert!(select_product(Some("no-such-product"), &products, &[]).is_err());
    }
}
