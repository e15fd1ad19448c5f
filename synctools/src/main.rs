use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use sync_engine::{SyncDirection, SyncField};

mod erply_commands;
mod formatting;
mod serve;
mod sync_command;

use crate::{
    erply_commands::{create_product, set_stock},
    formatting::format_policy_table,
    serve::serve,
    sync_command::{exit_code, run_sync},
};

#[derive(Parser, Debug)]
#[command(version, about = "Keeps product fields in step between Erply and Voog")]
pub struct Arguments {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sync a single SKU between Erply and Voog
    Sync(SyncParams),
    /// Set the absolute Erply stock for a SKU using a stock registration or write-off
    ErplySetStock(SetStockParams),
    /// Create a minimal product in Erply
    ErplyCreateProduct(CreateProductParams),
    /// Print the field policy table
    Policy,
    /// Run the Voog order webhook listener
    Serve(ServeParams),
}

#[derive(Debug, Args)]
pub struct SyncParams {
    /// Product SKU to sync
    #[arg(short, long)]
    sku: String,
    /// erply-to-voog, voog-to-erply or both
    #[arg(short, long, default_value = "erply-to-voog")]
    direction: SyncDirection,
    /// Comma-separated fields to sync. Defaults to stock, status, name and sku.
    #[arg(short, long, value_delimiter = ',')]
    fields: Vec<SyncField>,
    /// Allow price to be synced. SYNC_PRICE_ENABLED does the same.
    #[arg(long)]
    enable_price: bool,
    /// Use this figure instead of the Erply stock
    #[arg(long)]
    stock_override: Option<f64>,
    /// Erply warehouse to read stock from (overrides ERPLY_WAREHOUSE_ID)
    #[arg(short, long)]
    warehouse_id: Option<i64>,
    /// Sum stock across all warehouses (overrides SUM_ALL_WAREHOUSES)
    #[arg(long)]
    sum_all_warehouses: Option<bool>,
    /// Print the planned changes without writing anything
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Args)]
pub struct SetStockParams {
    #[arg(short, long)]
    sku: String,
    /// Target absolute stock quantity
    #[arg(long)]
    stock: f64,
    /// Warehouse to write to. Defaults to ERPLY_WAREHOUSE_ID, then the first active warehouse.
    #[arg(short, long)]
    warehouse_id: Option<i64>,
}

#[derive(Debug, Args)]
pub struct CreateProductParams {
    #[arg(short, long)]
    sku: String,
    #[arg(short, long)]
    name: String,
}

#[derive(Debug, Args)]
pub struct ServeParams {
    /// Bind host (overrides SYNC_HOST)
    #[arg(long)]
    host: Option<String>,
    /// Bind port (overrides SYNC_PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Arguments::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    let result = match cli.command {
        Command::Sync(params) => run_sync(params).await,
        Command::ErplySetStock(params) => set_stock(params).await,
        Command::ErplyCreateProduct(params) => create_product(params).await,
        Command::Policy => {
            println!("{}", format_policy_table(sync_engine::PolicyTable::standard()));
            Ok(())
        },
        Command::Serve(params) => serve(params).await,
    };
    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code(&e));
    }
}
