//! orders-catalog: outbound adapter for the product-catalog collaborator.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use orders_types::domain::product::Product;
use orders_types::ports::product_validator::{CatalogError, ProductValidator};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use serde::Deserialize;

#[derive(Clone)]
pub struct CatalogClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

#[derive(Clone)]
pub struct CatalogClient {
    base: Url,
    client: reqwest::Client,
}

// Error body shape used by the catalog collaborator.
#[derive(Deserialize)]
struct ErrorReply {
    error: String,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<CatalogClientBuilder> {
        let base = Url::parse(base_url).context("invalid base url")?;
        Ok(CatalogClientBuilder {
            base,
            headers: HeaderMap::new(),
            timeout: None,
            client: None,
        })
    }

    fn url(&self, path: &str) -> Result<Url, CatalogError> {
        self.base
            .join(path)
            .map_err(|e| CatalogError::Transport(e.to_string()))
    }

    /// Sends the full id list (duplicates included) in one round trip. The
    /// collaborator validates the batch as a whole: any unknown id rejects
    /// everything, and its message comes back unchanged.
    pub async fn validate_products(&self, ids: &[i64]) -> Result<Vec<Product>, CatalogError> {
        let res = self
            .client
            .post(self.url("validate-products")?)
            .json(&ids)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let status = res.status();
        if status.is_success() {
            return res
                .json()
                .await
                .map_err(|e| CatalogError::Transport(e.to_string()));
        }

        let body = res.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorReply>(&body)
            .map(|r| r.error)
            .unwrap_or(body);
        tracing::debug!(%status, %message, "catalog rejected validate-products");
        Err(CatalogError::Rejected(message))
    }
}

#[async_trait]
impl ProductValidator for CatalogClient {
    async fn validate(&self, product_ids: &[i64]) -> Result<Vec<Product>, CatalogError> {
        self.validate_products(product_ids).await
    }
}

impl CatalogClientBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> anyhow::Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("invalid header value")?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<CatalogClient> {
        if let Some(client) = self.client {
            return Ok(CatalogClient {
                base: self.base,
                client,
            });
        }

        let mut builder = reqwest::Client::builder();
        if !self.headers.is_empty() {
            builder = builder.default_headers(self.headers);
        }
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(CatalogClient {
            base: self.base,
            client,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn products() -> Vec<Product> {
        vec![
            Product {
                id: 1,
                name: "Widget".into(),
                price_cents: 1000,
            },
            Product {
                id: 2,
                name: "Gadget".into(),
                price_cents: 250,
            },
        ]
    }

    #[tokio::test]
    async fn validate_returns_products() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/validate-products")
                .json_body(serde_json::json!([1, 2]));
            then.status(200).json_body_obj(&products());
        });

        let client = CatalogClient::new(&server.base_url()).unwrap();
        let got = client.validate_products(&[1, 2]).await.unwrap();
        mock.assert();
        assert_eq!(got, products());
    }

    #[tokio::test]
    async fn rejection_forwards_collaborator_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/validate-products");
            then.status(400)
                .json_body(serde_json::json!({ "error": "some products were not found" }));
        });

        let client = CatalogClient::new(&server.base_url()).unwrap();
        let err = client.validate_products(&[1, 99]).await.unwrap_err();
        match err {
            CatalogError::Rejected(msg) => assert_eq!(msg, "some products were not found"),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_error_body_is_forwarded_raw() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/validate-products");
            then.status(500).body("catalog exploded");
        });

        let client = CatalogClient::new(&server.base_url()).unwrap();
        let err = client.validate_products(&[1]).await.unwrap_err();
        match err {
            CatalogError::Rejected(msg) => assert_eq!(msg, "catalog exploded"),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn connection_failure_is_a_transport_error() {
        // Nothing listens on this port.
        let client = CatalogClient::builder("http://127.0.0.1:9")
            .unwrap()
            .with_timeout(Duration::from_millis(250))
            .build()
            .unwrap();
        let err = client.validate_products(&[1]).await.unwrap_err();
        assert!(matches!(err, CatalogError::Transport(_)));
    }
}
