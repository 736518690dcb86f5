use crate::errors::AppError;
use orders_types::domain::order::{
    EnrichedOrder, NewOrderItem, Order, OrderPage, OrderStatus, PageMeta,
};
use orders_types::ports::order_repository::OrderRepository;
use orders_types::ports::product_validator::ProductValidator;
use uuid::Uuid;

pub struct OrderService<R: OrderRepository, V: ProductValidator> {
    repo: R,
    catalog: V,
}

impl<R: OrderRepository, V: ProductValidator> OrderService<R, V> {
    pub fn new(repo: R, catalog: V) -> Self {
        Self { repo, catalog }
    }

    pub async fn create_order(&self, items: Vec<NewOrderItem>) -> Result<EnrichedOrder, AppError> {
        if items.is_empty() {
            return Err(AppError::Validation("items must not be empty".into()));
        }
        if items.iter().any(|it| it.quantity == 0) {
            return Err(AppError::Validation("item quantity must be > 0".into()));
        }

        // Raw id list, duplicates preserved; the collaborator replies once per
        // distinct valid id or rejects the whole batch.
        let ids: Vec<i64> = items.iter().map(|it| it.product_id).collect();
        let products = self.catalog.validate(&ids).await?;

        let order = Order::new(&items, &products).map_err(AppError::Internal)?;
        let persisted = self
            .repo
            .create_with_items(order)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
        EnrichedOrder::assemble(persisted, &products).map_err(AppError::Internal)
    }

    pub async fn find_all(
        &self,
        page: u32,
        limit: u32,
        status: Option<OrderStatus>,
    ) -> Result<OrderPage, AppError> {
        if page == 0 || limit == 0 {
            return Err(AppError::Validation("page and limit must be >= 1".into()));
        }
        let total_count = self
            .repo
            .count(status)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
        let last_page = ((total_count + i64::from(limit) - 1) / i64::from(limit)) as u32;
        let skip = (i64::from(page) - 1) * i64::from(limit);
        let data = self
            .repo
            .list(skip, i64::from(limit), status)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
        Ok(OrderPage {
            data,
            meta: PageMeta {
                page,
                total_count,
                last_page,
            },
        })
    }

    pub async fn find_one(&self, id: Uuid) -> Result<EnrichedOrder, AppError> {
        let order = match self
            .repo
            .get(id)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        {
            Some(o) => o,
            None => return Err(AppError::NotFound(format!("no order found with id {id}"))),
        };

        let ids: Vec<i64> = order.items.iter().map(|it| it.product_id).collect();
        let products = self.catalog.validate(&ids).await?;
        EnrichedOrder::assemble(order, &products).map_err(AppError::Internal)
    }

    /// Existence is checked against the store only; status changes never
    /// consult the catalog. Setting the current status again is a no-op read.
    pub async fn change_order_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Order, AppError> {
        let order = match self
            .repo
            .get(id)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        {
            Some(o) => o,
            None => return Err(AppError::NotFound(format!("no order found with id {id}"))),
        };

        if order.status == status {
            return Ok(order);
        }

        match self
            .repo
            .update_status(id, status)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        {
            Some(o) => Ok(o),
            None => Err(AppError::NotFound(format!("no order found with id {id}"))),
        }
    }
}
