#[cfg(not(any(feature = "memory", feature = "sqlite")))]
compile_error!("Enable a repo feature: `memory` or `sqlite`.");

use orders_types::domain::order::{Order, OrderStatus};
use orders_types::ports::order_repository::{OrderRepository, RepoError};
use uuid::Uuid;

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub struct Repo {
    #[cfg(feature = "memory")]
    memory: memory::InMemoryRepo,
    #[cfg(feature = "sqlite")]
    sqlite: sqlite::SqliteRepo,
}

pub async fn build_repo(url: Option<&str>) -> anyhow::Result<Repo> {
    Repo::build_repo(url).await
}

impl Repo {
    #[cfg(all(feature = "memory", not(feature = "sqlite")))]
    pub async fn build_repo(_: Option<&str>) -> anyhow::Result<Self> {
        Ok(Self {
            memory: memory::InMemoryRepo::new(),
        })
    }

    #[cfg(all(feature = "sqlite", not(feature = "memory")))]
    pub async fn build_repo(database_url: Option<&str>) -> anyhow::Result<Self> {
        let url = database_url.unwrap_or("sqlite://orders.db");
        let sqlite = sqlite::SqliteRepo::new(url).await?;
        Ok(Self { sqlite })
    }

    // If both features are enabled, the durable adapter wins.
    #[cfg(all(feature = "sqlite", feature = "memory"))]
    pub async fn build_repo(database_url: Option<&str>) -> anyhow::Result<Self> {
        let memory = memory::InMemoryRepo::new();
        let url = database_url.unwrap_or("sqlite://orders.db");
        let sqlite = sqlite::SqliteRepo::new(url).await?;
        Ok(Self { memory, sqlite })
    }
}

#[cfg(all(feature = "memory", not(feature = "sqlite")))]
#[async_trait::async_trait]
impl OrderRepository for Repo {
    async fn create_with_items(&self, order: Order) -> Result<Order, RepoError> {
        self.memory.create_with_items(order).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Order>, RepoError> {
        self.memory.get(id).await
    }

    async fn list(
        &self,
        skip: i64,
        take: i64,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, RepoError> {
        self.memory.list(skip, take, status).await
    }

    async fn count(&self, status: Option<OrderStatus>) -> Result<i64, RepoError> {
        self.memory.count(status).await
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepoError> {
        self.memory.update_status(id, status).await
    }
}

#[cfg(all(feature = "sqlite", not(feature = "memory")))]
#[async_trait::async_trait]
impl OrderRepository for Repo {
    async fn create_with_items(&self, order: Order) -> Result<Order, RepoError> {
        self.sqlite.create_with_items(order).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Order>, RepoError> {
        self.sqlite.get(id).await
    }

    async fn list(
        &self,
        skip: i64,
        take: i64,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, RepoError> {
        self.sqlite.list(skip, take, status).await
    }

    async fn count(&self, status: Option<OrderStatus>) -> Result<i64, RepoError> {
        self.sqlite.count(status).await
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepoError> {
        self.sqlite.update_status(id, status).await
    }
}

#[cfg(all(feature = "sqlite", feature = "memory"))]
#[async_trait::async_trait]
impl OrderRepository for Repo {
    async fn create_with_items(&self, order: Order) -> Result<Order, RepoError> {
        self.sqlite.create_with_items(order).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Order>, RepoError> {
        self.sqlite.get(id).await
    }

    async fn list(
        &self,
        skip: i64,
        take: i64,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, RepoError> {
        self.sqlite.list(skip, take, status).await
    }

    async fn count(&self, status: Option<OrderStatus>) -> Result<i64, RepoError> {
        self.sqlite.count(status).await
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepoError> {
        self.sqlite.update_status(id, status).await
    }
}
