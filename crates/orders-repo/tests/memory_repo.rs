#![cfg(feature = "memory")]

use orders_repo::memory::InMemoryRepo;
use orders_types::domain::order::{NewOrderItem, Order, OrderStatus};
use orders_types::domain::product::Product;
use orders_types::ports::order_repository::OrderRepository;

fn sample_order(price_cents: i64, quantity: u32) -> Order {
    Order::new(
        &[NewOrderItem {
            product_id: 1,
            quantity,
        }],
        &[Product {
            id: 1,
            name: "Widget".into(),
            price_cents,
        }],
    )
    .unwrap()
}

#[tokio::test]
async fn memory_repo_create_get_update_flow() {
    let repo = InMemoryRepo::new();
    let order = sample_order(500, 2);

    let created = repo.create_with_items(order.clone()).await.unwrap();
    assert_eq!(created.id, order.id);

    let fetched = repo.get(order.id).await.unwrap().unwrap();
    assert_eq!(fetched.total_amount_cents, 1000);
    assert_eq!(fetched.items.len(), 1);

    let listed = repo.list(0, 10, None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].items.is_empty());

    let updated = repo
        .update_status(order.id, OrderStatus::Delivered)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Delivered);
}

#[tokio::test]
async fn memory_repo_paginates_and_filters() {
    let repo = InMemoryRepo::new();
    for _ in 0..3 {
        repo.create_with_items(sample_order(100, 1)).await.unwrap();
    }
    let mut cancelled = sample_order(100, 1);
    cancelled.update_status(OrderStatus::Cancelled);
    repo.create_with_items(cancelled).await.unwrap();

    assert_eq!(repo.count(None).await.unwrap(), 4);
    assert_eq!(repo.count(Some(OrderStatus::Pending)).await.unwrap(), 3);
    assert_eq!(repo.count(Some(OrderStatus::Delivered)).await.unwrap(), 0);

    let page = repo.list(0, 2, Some(OrderStatus::Pending)).await.unwrap();
    assert_eq!(page.len(), 2);
    let rest = repo.list(2, 2, Some(OrderStatus::Pending)).await.unwrap();
    assert_eq!(rest.len(), 1);
    let past_end = repo.list(10, 2, None).await.unwrap();
    assert!(past_end.is_empty());
}

#[tokio::test]
async fn memory_repo_handles_missing_rows() {
    let repo = InMemoryRepo::new();
    let missing = repo.get(uuid::Uuid::new_v4()).await.unwrap();
    assert!(missing.is_none());

    let updated = repo
        .update_status(uuid::Uuid::new_v4(), OrderStatus::Delivered)
        .await
        .unwrap();
    assert!(updated.is_none());
}
