#![cfg(feature = "sqlite")]

use orders_repo::sqlite::SqliteRepo;
use orders_types::domain::order::{NewOrderItem, Order, OrderStatus};
use orders_types::domain::product::Product;
use orders_types::ports::order_repository::OrderRepository;
use std::path::PathBuf;
use uuid::Uuid;

fn temp_db_url() -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut path = PathBuf::from(dir.path());
    path.push(format!("orders-{}.db", Uuid::new_v4()));
    let url = format!("sqlite://{}", path.display());
    (dir, url)
}

fn sample_order() -> Order {
    Order::new(
        &[
            NewOrderItem {
                product_id: 1,
                quantity: 2,
            },
            NewOrderItem {
                product_id: 2,
                quantity: 1,
            },
        ],
        &[
            Product {
                id: 1,
                name: "Widget".into(),
                price_cents: 500,
            },
            Product {
                id: 2,
                name: "Gadget".into(),
                price_cents: 250,
            },
        ],
    )
    .unwrap()
}

#[tokio::test]
async fn sqlite_repo_create_get_update_flow() {
    let (_dir, url) = temp_db_url();
    let repo = SqliteRepo::new(&url).await.unwrap();

    let order = sample_order();
    let created = repo.create_with_items(order.clone()).await.unwrap();
    assert_eq!(created.id, order.id);

    let fetched = repo.get(order.id).await.unwrap().unwrap();
    assert_eq!(fetched.total_amount_cents, 1250);
    assert_eq!(fetched.total_items, 2);
    assert_eq!(fetched.items, order.items);
    assert!(!fetched.paid);

    let listed = repo.list(0, 10, None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].items.is_empty());

    let updated = repo
        .update_status(order.id, OrderStatus::Cancelled)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Cancelled);
    assert!(updated.updated_at >= order.updated_at);
}

#[tokio::test]
async fn sqlite_repo_paginates_in_creation_order() {
    let (_dir, url) = temp_db_url();
    let repo = SqliteRepo::new(&url).await.unwrap();

    let mut ids = Vec::new();
    for _ in 0..5 {
        let order = sample_order();
        ids.push(order.id);
        repo.create_with_items(order).await.unwrap();
        // Keep created_at strictly increasing so the page order is deterministic.
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let first = repo.list(0, 2, None).await.unwrap();
    let second = repo.list(2, 2, None).await.unwrap();
    let third = repo.list(4, 2, None).await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    assert_eq!(third.len(), 1);

    let paged: Vec<Uuid> = first
        .iter()
        .chain(second.iter())
        .chain(third.iter())
        .map(|o| o.id)
        .collect();
    assert_eq!(paged, ids);
}

#[tokio::test]
async fn sqlite_repo_filters_by_status() {
    let (_dir, url) = temp_db_url();
    let repo = SqliteRepo::new(&url).await.unwrap();

    for _ in 0..3 {
        repo.create_with_items(sample_order()).await.unwrap();
    }
    let delivered = sample_order();
    repo.create_with_items(delivered.clone()).await.unwrap();
    repo.update_status(delivered.id, OrderStatus::Delivered)
        .await
        .unwrap();

    assert_eq!(repo.count(None).await.unwrap(), 4);
    assert_eq!(repo.count(Some(OrderStatus::Pending)).await.unwrap(), 3);
    assert_eq!(repo.count(Some(OrderStatus::Delivered)).await.unwrap(), 1);

    let pending = repo.list(0, 10, Some(OrderStatus::Pending)).await.unwrap();
    assert_eq!(pending.len(), 3);
    assert!(pending.iter().all(|o| o.status == OrderStatus::Pending));
}

#[tokio::test]
async fn sqlite_repo_handles_missing_rows() {
    let (_dir, url) = temp_db_url();
    let repo = SqliteRepo::new(&url).await.unwrap();
    let missing_id = Uuid::new_v4();

    let missing = repo.get(missing_id).await.unwrap();
    assert!(missing.is_none());

    let updated = repo
        .update_status(missing_id, OrderStatus::Delivered)
        .await
        .unwrap();
    assert!(updated.is_none());
}
