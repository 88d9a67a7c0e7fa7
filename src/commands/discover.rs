use anyhow::Result;

use crate::merchant::MerchantApi;

/// Show the merchant discovery document.
#[tracing::instrument(skip(api))]
pub async fn discover(api: &dyn MerchantApi) -> Result<()> {
    let doc = api.discover().await?;

    println!("Merchant: {}", doc.merchant.name);
    println!("Description: {}", doc.merchant.description);
    if let Some(website) = &doc.merchant.website {
        println!("Website: {}", website);
    }
    if let Some(contact) = &doc.merchant.contact {
        println!("Contact: {}", contact);
    }
    println!("Sandbox mode: {}", doc.sandbox);

    Ok(())
}
