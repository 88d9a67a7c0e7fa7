use anyhow::{Result, bail};
use std::str::FromStr;

use crate::merchant::{Buyer, LineItem, MerchantApi};

use super::print_order;

/// An item argument in the form `PRODUCT_ID` or `PRODUCT_ID:QUANTITY`.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSpec {
    pub product_id: String,
    pub quantity: u32,
}

impl FromStr for ItemSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (product_id, quantity) = match s.split_once(':') {
            Some((id, qty)) => {
                let quantity: u32 = qty
                    .parse()
                    .map_err(|_| anyhow::anyhow!("invalid quantity '{}' in item '{}'", qty, s))?;
                (id, quantity)
            }
            None => (s, 1),
        };

        if product_id.is_empty() {
            bail!("item '{}' has an empty product id", s);
        }
        if quantity < 1 {
            bail!("quantity must be at least 1 in item '{}'", s);
        }

        Ok(ItemSpec {
            product_id: product_id.to_string(),
            quantity,
        })
    }
}

/// Place an order for the given items.
#[tracing::instrument(skip(api, items, buyer, payment_token))]
pub async fn checkout(
    api: &dyn MerchantApi,
    items: &[ItemSpec],
    buyer: &Buyer,
    payment_token: &str,
) -> Result<()> {
    let line_items: Vec<LineItem> = items
        .iter()
        .map(|item| LineItem::new(&item.product_id, item.quantity))
        .collect();

    let order = api.checkout(&line_items, buyer, payment_token).await?;
    print_order(&order);

    Ok(())
}
