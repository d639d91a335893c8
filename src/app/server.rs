use super::relay::{
    method_not_allowed, not_found, BillingRelay, SUBSCRIPTION_ROUTE, WEBHOOK_ROUTE,
};
use super::response::ApiResponse;
use crate::core::signature::SIGNATURE_HEADER;
use crate::utils::error::Result;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

type SharedRelay = Arc<BillingRelay>;

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();

        for (name, value) in &self.headers {
            match (
                HeaderName::try_from(name.as_str()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    response.headers_mut().insert(name, value);
                }
                _ => tracing::warn!("Skipping invalid response header {}", name),
            }
        }
        response
    }
}

pub fn router(relay: SharedRelay) -> Router {
    Router::new()
        .route(&format!("/{}", WEBHOOK_ROUTE), post(stripe_webhook))
        .route(&format!("/{}", SUBSCRIPTION_ROUTE), any(get_subscription))
        .fallback(|| async { not_found() })
        .method_not_allowed_fallback(|| async { method_not_allowed() })
        .with_state(relay)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// 以既有的 listener 執行，測試時可綁定隨機埠
pub async fn serve_on(listener: TcpListener, relay: SharedRelay) -> Result<()> {
    axum::serve(listener, router(relay)).await?;
    Ok(())
}

pub async fn serve(addr: SocketAddr, relay: SharedRelay) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("🚀 Billing relay listening on http://{}", listener.local_addr()?);
    tracing::info!("   POST /{}", WEBHOOK_ROUTE);
    tracing::info!("   POST /{}", SUBSCRIPTION_ROUTE);
    serve_on(listener, relay).await
}

async fn stripe_webhook(
    State(relay): State<SharedRelay>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResponse {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    relay.webhook(signature, &body).await
}

async fn get_subscription(
    State(relay): State<SharedRelay>,
    method: Method,
    body: Bytes,
) -> ApiResponse {
    relay.get_subscription(method.as_str(), &body).await
}
