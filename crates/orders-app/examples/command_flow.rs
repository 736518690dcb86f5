///  To run :
///  cargo r --example command_flow
use async_trait::async_trait;
use orders_core::application::order_service::OrderService;
use orders_core::inbound::commands::{CommandServer, CommandServerConfig};
use orders_repo::build_repo;
use orders_types::domain::order::{EnrichedOrder, Order};
use orders_types::domain::product::Product;
use orders_types::ports::product_validator::{CatalogError, ProductValidator};
use serde_json::json;
use tempfile::tempdir;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

// Canned catalog standing in for the product collaborator.
#[derive(Clone)]
struct DemoCatalog(Vec<Product>);

#[async_trait]
impl ProductValidator for DemoCatalog {
    async fn validate(&self, product_ids: &[i64]) -> Result<Vec<Product>, CatalogError> {
        let mut reply: Vec<Product> = Vec::new();
        for id in product_ids {
            match self.0.iter().find(|p| p.id == *id) {
                Some(p) => {
                    if !reply.iter().any(|r| r.id == p.id) {
                        reply.push(p.clone());
                    }
                }
                None => {
                    return Err(CatalogError::Rejected(format!(
                        "some products were not found: [{id}]"
                    )))
                }
            }
        }
        Ok(reply)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Start the command server on an ephemeral port.
    let port = find_free_port();
    let addr = format!("http://127.0.0.1:{port}");

    // Use a temp file-backed SQLite DB so multiple connections see the same data.
    let tmp = tempdir()?;
    let db_path = tmp.path().join("orders.db");
    let db_url = format!("sqlite://{}", db_path.display());

    let repo = build_repo(Some(&db_url)).await?;
    let catalog = DemoCatalog(vec![
        Product {
            id: 1,
            name: "Widget".into(),
            price_cents: 500,
        },
        Product {
            id: 2,
            name: "Gadget".into(),
            price_cents: 700,
        },
    ]);
    let service = OrderService::new(repo, catalog);
    let server = CommandServer::new(
        service,
        CommandServerConfig {
            port: port.to_string(),
        },
    )
    .await?;

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    // Drive the command API like a transport peer would.
    let client = reqwest::Client::new();
    let created: EnrichedOrder = client
        .post(format!("{addr}/create-order"))
        .json(&json!({ "items": [
            { "product_id": 1, "quantity": 2 },
            { "product_id": 2, "quantity": 1 },
        ] }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    println!(
        "Created order id={} total_amount_cents={}",
        created.id, created.total_amount_cents
    );

    let fetched: EnrichedOrder = client
        .post(format!("{addr}/find-one-order"))
        .json(&json!({ "id": created.id.to_string() }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    println!(
        "Fetched item names: {:?}",
        fetched.items.iter().map(|i| &i.name).collect::<Vec<_>>()
    );

    let updated: Order = client
        .post(format!("{addr}/change-order-status"))
        .json(&json!({ "id": created.id.to_string(), "status": "DELIVERED" }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    println!("Updated status={:?} for id {}", updated.status, updated.id);

    handle.abort();
    Ok(())
}
