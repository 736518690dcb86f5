use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::order::{Order, OrderStatus};

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error("db error: {0}")]
    DbError(String),
}

#[async_trait]
pub trait OrderRepository: Send + Sync + 'static {
    /// Writes the order row and all of its item rows in one atomic operation.
    async fn create_with_items(&self, order: Order) -> Result<Order, RepoError>;
    /// Single lookup including items.
    async fn get(&self, id: Uuid) -> Result<Option<Order>, RepoError>;
    /// Stable creation order, offset/limit paged, optional status filter.
    /// Items are not loaded.
    async fn list(
        &self,
        skip: i64,
        take: i64,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, RepoError>;
    async fn count(&self, status: Option<OrderStatus>) -> Result<i64, RepoError>;
    /// Returns `None` when no row matches the id.
    async fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepoError>;
}
