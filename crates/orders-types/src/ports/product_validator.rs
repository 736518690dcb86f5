use async_trait::async_trait;

use crate::domain::product::Product;

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// The collaborator rejected the batch; its message is forwarded verbatim.
    #[error("{0}")]
    Rejected(String),
    #[error("catalog transport error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait ProductValidator: Send + Sync + 'static {
    /// Single request/reply round trip with the full id list. All-or-nothing:
    /// one unknown id fails the whole batch. Not retried here.
    async fn validate(&self, product_ids: &[i64]) -> Result<Vec<Product>, CatalogError>;
}
