use anyhow::Result;

use crate::merchant::MerchantApi;

use super::print_order;

/// Show the current state of an order.
#[tracing::instrument(skip(api))]
pub async fn order(api: &dyn MerchantApi, order_id: &str) -> Result<()> {
    let order = api.get_order(order_id).await?;
    print_order(&order);
    Ok(())
}
