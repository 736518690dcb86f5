use axum::{
    extract::State,
    routing::{get, post},
    serve, Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::application::order_service::OrderService;
use crate::errors::AppError;
use orders_types::domain::order::{EnrichedOrder, NewOrderItem, Order, OrderPage, OrderStatus};
use orders_types::ports::order_repository::OrderRepository;
use orders_types::ports::product_validator::ProductValidator;

#[derive(Clone)]
pub struct CommandServerConfig {
    pub port: String,
}

/// Binds one route per command name; payloads are the JSON command bodies.
pub struct CommandServer<R, V>
where
    R: OrderRepository,
    V: ProductValidator,
{
    pub service: Arc<OrderService<R, V>>,
    pub config: CommandServerConfig,
}

#[derive(Deserialize)]
pub struct CreateOrderCommand {
    pub items: Vec<NewOrderItem>,
}

// Pagination defaults match the original command contract: page 1, limit 10.
#[derive(Deserialize)]
pub struct FindAllOrdersCommand {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub status: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

#[derive(Deserialize)]
pub struct FindOneOrderCommand {
    pub id: String,
}

#[derive(Deserialize)]
pub struct ChangeOrderStatusCommand {
    pub id: String,
    pub status: String,
}

fn parse_order_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|e| AppError::Validation(format!("id must be a uuid: {e}")))
}

fn parse_status(raw: &str) -> Result<OrderStatus, AppError> {
    OrderStatus::from_str(raw).map_err(|e| AppError::Validation(e.to_string()))
}

impl<R, V> CommandServer<R, V>
where
    R: OrderRepository + Send + Sync + 'static,
    V: ProductValidator + Send + Sync + 'static,
{
    pub async fn new(
        service: OrderService<R, V>,
        config: CommandServerConfig,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            service: Arc::new(service),
            config,
        })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &axum::extract::Request<_>| {
                let command = request.uri().to_string();
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "command",
                    %request_id,
                    method = %request.method(),
                    command
                )
            })
            .on_request(
                |request: &axum::extract::Request<_>, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        method = %request.method(),
                        command = %request.uri(),
                        "command received"
                    );
                },
            )
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        status = %response.status(),
                        latency_ms = %latency.as_millis(),
                        "command handled"
                    );
                },
            );

        let svc = self.service.clone();
        let app = Router::new()
            .route("/health", get(health))
            .route("/create-order", post(create_order::<R, V>))
            .route("/find-all-orders", post(find_all_orders::<R, V>))
            .route("/find-one-order", post(find_one_order::<R, V>))
            .route("/change-order-status", post(change_order_status::<R, V>))
            .layer(trace_layer)
            .with_state(svc);

        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting command server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

async fn health() -> (axum::http::StatusCode, Json<serde_json::Value>) {
    (
        axum::http::StatusCode::OK,
        Json(serde_json::json!({ "status": "ok" })),
    )
}

async fn create_order<R, V>(
    State(service): State<Arc<OrderService<R, V>>>,
    Json(payload): Json<CreateOrderCommand>,
) -> Result<(axum::http::StatusCode, Json<EnrichedOrder>), AppError>
where
    R: OrderRepository + Send + Sync + 'static,
    V: ProductValidator + Send + Sync + 'static,
{
    let order = service.create_order(payload.items).await?;
    Ok((axum::http::StatusCode::CREATED, Json(order)))
}

async fn find_all_orders<R, V>(
    State(service): State<Arc<OrderService<R, V>>>,
    Json(payload): Json<FindAllOrdersCommand>,
) -> Result<Json<OrderPage>, AppError>
where
    R: OrderRepository + Send + Sync + 'static,
    V: ProductValidator + Send + Sync + 'static,
{
    let status = payload.status.as_deref().map(parse_status).transpose()?;
    let page = service.find_all(payload.page, payload.limit, status).await?;
    Ok(Json(page))
}

async fn find_one_order<R, V>(
    State(service): State<Arc<OrderService<R, V>>>,
    Json(payload): Json<FindOneOrderCommand>,
) -> Result<Json<EnrichedOrder>, AppError>
where
    R: OrderRepository + Send + Sync + 'static,
    V: ProductValidator + Send + Sync + 'static,
{
    let id = parse_order_id(&payload.id)?;
    let order = service.find_one(id).await?;
    Ok(Json(order))
}

async fn change_order_status<R, V>(
    State(service): State<Arc<OrderService<R, V>>>,
    Json(payload): Json<ChangeOrderStatusCommand>,
) -> Result<Json<Order>, AppError>
where
    R: OrderRepository + Send + Sync + 'static,
    V: ProductValidator + Send + Sync + 'static,
{
    let id = parse_order_id(&payload.id)?;
    let status = parse_status(&payload.status)?;
    let order = service.change_order_status(id, status).await?;
    Ok(Json(order))
}
