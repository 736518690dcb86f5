use orders_catalog::CatalogClient;
use orders_core::application::order_service::OrderService;
use orders_core::config::Config;
use orders_core::inbound::commands::{CommandServer, CommandServerConfig};
use orders_repo::{build_repo, Repo};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for DATABASE_URL / SERVER_PORT / CATALOG_URL when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string()))
        .init();

    let config = Config::from_env()?;
    let repo: Repo = build_repo(config.database_url.as_deref()).await?;
    let catalog = CatalogClient::new(&config.catalog_url)?;
    let service = OrderService::new(repo, catalog);

    let server_cfg = CommandServerConfig {
        port: config.server_port.clone(),
    };

    let server = CommandServer::new(service, server_cfg).await?;
    server.run().await
}
