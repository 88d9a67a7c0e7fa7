use anyhow::Result;
use clap::Parser;
use ucpc::commands;
use ucpc::merchant::{Buyer, ProductFilter};

/// ucpc - Universal Commerce Protocol client
///
/// Discover UCP merchants, browse their catalogs, and place orders from
/// the command line.
///
/// Sandbox merchants accept any payment token starting with "sandbox_".
///
/// Examples:
///   ucpc discover
///   ucpc demo -m http://localhost:5000
#[derive(Parser, Debug)]
#[command(author, version = env!("UCPC_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Merchant base URL (also via UCPC_MERCHANT)
    #[arg(
        long = "merchant-url",
        short = 'm',
        env = "UCPC_MERCHANT",
        value_name = "URL",
        default_value = "https://puddingheroes.com",
        global = true
    )]
    pub merchant_url: String,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Show the merchant discovery document
    Discover,

    /// List catalog products
    Products(ProductsArgs),

    /// Place an order
    Checkout(CheckoutArgs),

    /// Show the status of an order
    Order(OrderArgs),

    /// Run the full discovery-to-order flow
    Demo(DemoArgs),
}

#[derive(clap::Args, Debug)]
pub struct ProductsArgs {
    /// Only products priced at or below this value
    #[arg(long = "max-price", value_name = "PRICE")]
    pub max_price: Option<f64>,

    /// Only products of this type (e.g. digital, physical, booking)
    #[arg(long = "type", value_name = "TYPE")]
    pub product_type: Option<String>,

    /// Only products currently in stock
    #[arg(long = "in-stock")]
    pub in_stock: bool,
}

#[derive(clap::Args, Debug)]
pub struct CheckoutArgs {
    /// Items to buy, as PRODUCT_ID or PRODUCT_ID:QUANTITY
    #[arg(value_name = "ITEM", required = true)]
    pub items: Vec<commands::ItemSpec>,

    /// Buyer name
    #[arg(long, default_value = "UCP Agent")]
    pub name: String,

    /// Buyer email
    #[arg(long, default_value = "agent@example.com")]
    pub email: String,

    /// Payment token
    #[arg(long = "payment-token", default_value = "sandbox_test")]
    pub payment_token: String,
}

#[derive(clap::Args, Debug)]
pub struct OrderArgs {
    /// The order identifier returned by checkout
    #[arg(value_name = "ORDER_ID")]
    pub order_id: String,
}

#[derive(clap::Args, Debug)]
pub struct DemoArgs {
    /// Product to buy (defaults to the first free catalog item)
    #[arg(long, value_name = "PRODUCT_ID")]
    pub product: Option<String>,

    /// Buyer name
    #[arg(long, default_value = "UCP Agent")]
    pub name: String,

    /// Buyer email
    #[arg(long, default_value = "agent@example.com")]
    pub email: String,

    /// Payment token
    #[arg(long = "payment-token", default_value = "sandbox_test")]
    pub payment_token: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let client = commands::build_client(&cli.merchant_url)?;

    match cli.command {
        Commands::Discover => commands::discover(&client).await?,
        Commands::Products(args) => {
            let filter = ProductFilter {
                max_price: args.max_price,
                kind: args.product_type,
                in_stock: args.in_stock.then_some(true),
            };
            commands::products(&client, &filter).await?
        }
        Commands::Checkout(args) => {
            let buyer = Buyer::new(args.name, args.email);
            commands::checkout(&client, &args.items, &buyer, &args.payment_token).await?
        }
        Commands::Order(args) => commands::order(&client, &args.order_id).await?,
        Commands::Demo(args) => {
            let options = commands::DemoOptions {
                product: args.product,
                buyer: Buyer::new(args.name, args.email),
                payment_token: args.payment_token,
            };
            commands::demo(&client, &options).await?
        }
    }
    Ok(())
}
