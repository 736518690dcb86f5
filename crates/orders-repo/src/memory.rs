use async_trait::async_trait;
use dashmap::DashMap;
use orders_types::domain::order::{Order, OrderStatus};
use orders_types::ports::order_repository::{OrderRepository, RepoError};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct InMemoryRepo {
    pub map: Arc<DashMap<Uuid, Order>>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            map: Arc::new(DashMap::new()),
        }
    }
}

impl Default for InMemoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for InMemoryRepo {
    async fn create_with_items(&self, order: Order) -> Result<Order, RepoError> {
        self.map.insert(order.id, order.clone());
        Ok(order)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Order>, RepoError> {
        Ok(self.map.get(&id).map(|r| r.clone()))
    }

    async fn list(
        &self,
        skip: i64,
        take: i64,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, RepoError> {
        let mut rows: Vec<Order> = self
            .map
            .iter()
            .filter(|kv| status.map_or(true, |s| kv.value().status == s))
            .map(|kv| kv.value().clone())
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(rows
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(take.max(0) as usize)
            .map(|mut o| {
                o.items = Vec::new();
                o
            })
            .collect())
    }

    async fn count(&self, status: Option<OrderStatus>) -> Result<i64, RepoError> {
        Ok(self
            .map
            .iter()
            .filter(|kv| status.map_or(true, |s| kv.value().status == s))
            .count() as i64)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepoError> {
        if let Some(mut v) = self.map.get_mut(&id) {
            v.update_status(status);
            return Ok(Some(v.clone()));
        }
        Ok(None)
    }
}
