use async_trait::async_trait;
use chrono::{DateTime, Utc};
use orders_types::domain::order::{Order, OrderItem, OrderStatus};
use orders_types::ports::order_repository::{OrderRepository, RepoError};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Executor, FromRow, SqlitePool};
use std::str::FromStr;
use uuid::Uuid;

pub struct SqliteRepo {
    pool: SqlitePool,
}

#[derive(FromRow)]
struct DbOrder {
    id: String,
    total_items: i64,
    total_amount_cents: i64,
    status: String,
    paid: bool,
    created_at: String,
    updated_at: String,
}

#[derive(FromRow)]
struct DbOrderItem {
    product_id: i64,
    quantity: i64,
    price_cents: i64,
}

impl DbOrder {
    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, RepoError> {
        let status =
            OrderStatus::from_str(&self.status).map_err(|e| RepoError::DbError(e.to_string()))?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| RepoError::DbError(e.to_string()))?
            .with_timezone(&Utc);
        let updated_at = DateTime::parse_from_rfc3339(&self.updated_at)
            .map_err(|e| RepoError::DbError(e.to_string()))?
            .with_timezone(&Utc);
        let id = Uuid::parse_str(&self.id).map_err(|e| RepoError::DbError(e.to_string()))?;
        Ok(Order {
            id,
            total_items: self.total_items as u32,
            total_amount_cents: self.total_amount_cents,
            status,
            paid: self.paid,
            created_at,
            updated_at,
            items,
        })
    }
}

impl DbOrderItem {
    fn into_item(self) -> OrderItem {
        OrderItem {
            product_id: self.product_id,
            quantity: self.quantity as u32,
            price_cents: self.price_cents,
        }
    }
}

impl SqliteRepo {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        // foreign_keys must be on for order_items' ON DELETE CASCADE.
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(options).await?;

        // Run migration from migration file.
        let ddl = include_str!("../migrations/0001_create_orders.sql");
        pool.execute(ddl).await?;

        Ok(Self { pool })
    }

    async fn items_for(&self, order_id: &str) -> Result<Vec<OrderItem>, RepoError> {
        let rows: Vec<DbOrderItem> = sqlx::query_as(
            "SELECT product_id, quantity, price_cents FROM order_items
             WHERE order_id = ? ORDER BY rowid",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::DbError(e.to_string()))?;
        Ok(rows.into_iter().map(DbOrderItem::into_item).collect())
    }
}

#[async_trait]
impl OrderRepository for SqliteRepo {
    async fn create_with_items(&self, order: Order) -> Result<Order, RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::DbError(e.to_string()))?;

        sqlx::query(
            "INSERT INTO orders (id, total_items, total_amount_cents, status, paid, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(order.id.to_string())
        .bind(i64::from(order.total_items))
        .bind(order.total_amount_cents)
        .bind(order.status.as_str())
        .bind(order.paid)
        .bind(order.created_at.to_rfc3339())
        .bind(order.updated_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::DbError(e.to_string()))?;

        for item in &order.items {
            sqlx::query(
                "INSERT INTO order_items (id, order_id, product_id, quantity, price_cents)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(order.id.to_string())
            .bind(item.product_id)
            .bind(i64::from(item.quantity))
            .bind(item.price_cents)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::DbError(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::DbError(e.to_string()))?;
        Ok(order)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Order>, RepoError> {
        let row: Option<DbOrder> = sqlx::query_as(
            "SELECT id, total_items, total_amount_cents, status, paid, created_at, updated_at
             FROM orders WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::DbError(e.to_string()))?;

        match row {
            Some(r) => {
                let items = self.items_for(&r.id).await?;
                Ok(Some(r.into_order(items)?))
            }
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        skip: i64,
        take: i64,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, RepoError> {
        let rows: Vec<DbOrder> = match status {
            Some(s) => {
                sqlx::query_as(
                    "SELECT id, total_items, total_amount_cents, status, paid, created_at, updated_at
                     FROM orders WHERE status = ? ORDER BY created_at, id LIMIT ? OFFSET ?",
                )
                .bind(s.as_str())
                .bind(take)
                .bind(skip)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as(
                    "SELECT id, total_items, total_amount_cents, status, paid, created_at, updated_at
                     FROM orders ORDER BY created_at, id LIMIT ? OFFSET ?",
                )
                .bind(take)
                .bind(skip)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| RepoError::DbError(e.to_string()))?;

        rows.into_iter()
            .map(|r| r.into_order(Vec::new()))
            .collect::<Result<Vec<_>, _>>()
    }

    async fn count(&self, status: Option<OrderStatus>) -> Result<i64, RepoError> {
        let (total,): (i64,) = match status {
            Some(s) => {
                sqlx::query_as("SELECT COUNT(*) FROM orders WHERE status = ?")
                    .bind(s.as_str())
                    .fetch_one(&self.pool)
                    .await
            }
            None => {
                sqlx::query_as("SELECT COUNT(*) FROM orders")
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(|e| RepoError::DbError(e.to_string()))?;
        Ok(total)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepoError> {
        let updated = sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(Utc::now().to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::DbError(e.to_string()))?;
        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(id).await
    }
}
