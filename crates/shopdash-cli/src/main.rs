use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shopdash-cli")]
#[command(about = "Shopify ingestion and dashboard metrics")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Ingest products, customers, and orders for the configured shop
    Ingest,
    /// Print dashboard metrics as JSON
    Metrics {
        /// Shop domain; defaults to `SHOPIFY_SHOP`
        #[arg(long)]
        shop: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("shopdash-cli: use --help to list commands");
        return Ok(());
    };

    let config = shopdash_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = shopdash_db::PoolConfig::from_app_config(&config);
    let pool = shopdash_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Migrate => {
            shopdash_db::run_migrations(&pool).await?;
            println!("migrations applied");
        }
        Commands::Ingest => run_ingest(&pool, &config).await?,
        Commands::Metrics { shop } => {
            let shop = shop.unwrap_or_else(|| config.shopify_shop.clone());
            run_metrics(&pool, &shop).await?;
        }
    }

    Ok(())
}

async fn run_ingest(
    pool: &sqlx::PgPool,
    config: &shopdash_core::AppConfig,
) -> anyhow::Result<()> {
    let client = shopdash_shopify::ShopifyClient::new(&config.shopify)?;
    let pipeline = shopdash_pipeline::IngestPipeline::new(client, pool.clone());

    match pipeline.run(&config.default_credentials()).await {
        Ok(summary) => {
            if summary.skipped > 0 {
                tracing::warn!(
                    skipped = summary.skipped,
                    "records owned by another store were skipped"
                );
            }
            println!("{}", summary.message());
            Ok(())
        }
        Err(err) => {
            tracing::error!(kind = err.kind(), error = %err, "ingestion failed");
            Err(err.into())
        }
    }
}

async fn run_metrics(pool: &sqlx::PgPool, shop: &str) -> anyhow::Result<()> {
    let metrics = shopdash_pipeline::aggregate_dashboard_metrics(pool, shop).await?;
    println!("{}", serde_json::to_string_pretty(&metrics)?);
    Ok(())
}
