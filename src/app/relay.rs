use super::response::ApiResponse;
use crate::adapters::{StripeClient, SupabaseClient};
use crate::core::signature::SignatureVerifier;
use crate::core::subscription_query::{
    SubscriptionQuery, SubscriptionQueryRequest, SubscriptionQueryResponse,
};
use crate::core::webhook::WebhookProcessor;
use crate::domain::ports::{ConfigProvider, PaymentProvider, SubscriptionStore};
use crate::utils::error::{BillingError, Result};
use std::time::Duration;

pub const WEBHOOK_ROUTE: &str = "stripe-webhook";
pub const SUBSCRIPTION_ROUTE: &str = "get-subscription";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// 兩個端點共用的處理邏輯
pub struct BillingRelay<P: PaymentProvider = StripeClient, S: SubscriptionStore = SupabaseClient> {
    webhook: WebhookProcessor<P, S>,
    query: SubscriptionQuery<P, S>,
}

impl BillingRelay {
    /// 兩個 adapter 共用同一個 reqwest 連線池
    pub fn from_config(config: &impl ConfigProvider) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let stripe = StripeClient::new(
            client.clone(),
            config.stripe_api_base(),
            config.stripe_secret_key(),
        );
        let supabase = SupabaseClient::new(
            client,
            config.supabase_url(),
            config.supabase_service_key(),
        );
        let verifier = SignatureVerifier::new(
            config.webhook_secret(),
            config.signature_tolerance_secs(),
        );

        Ok(Self::new(stripe, supabase, verifier))
    }
}

impl<P, S> BillingRelay<P, S>
where
    P: PaymentProvider + Clone,
    S: SubscriptionStore + Clone,
{
    pub fn new(provider: P, store: S, verifier: SignatureVerifier) -> Self {
        Self {
            webhook: WebhookProcessor::new(provider.clone(), store.clone(), verifier),
            query: SubscriptionQuery::new(provider, store),
        }
    }
}

impl<P: PaymentProvider, S: SubscriptionStore> BillingRelay<P, S> {
    pub async fn webhook(&self, signature: Option<&str>, body: &[u8]) -> ApiResponse {
        let Some(signature) = signature else {
            tracing::warn!("⚠️ Webhook request without signature header");
            return ApiResponse::text(400, "No signature provided");
        };

        match self.webhook.handle(body, signature).await {
            Ok(outcome) => {
                tracing::debug!("Webhook outcome: {:?}", outcome);
                ApiResponse::json(200, &serde_json::json!({ "received": true }))
            }
            Err(e) => {
                tracing::error!("❌ Webhook failed: {} (Severity: {:?})", e, e.severity());
                ApiResponse::text(400, format!("Webhook Error: {}", e))
            }
        }
    }

    pub async fn get_subscription(&self, method: &str, body: &[u8]) -> ApiResponse {
        if method.eq_ignore_ascii_case("OPTIONS") {
            return ApiResponse::text(200, "ok").with_cors();
        }

        let response = match self.lookup(body).await {
            Ok(found) => ApiResponse::json(200, &found),
            Err(e) => {
                tracing::error!("❌ Subscription lookup failed: {}", e);
                ApiResponse::json(400, &serde_json::json!({ "error": e.to_string() }))
            }
        };
        response.with_cors()
    }

    async fn lookup(&self, body: &[u8]) -> Result<SubscriptionQueryResponse> {
        let request: SubscriptionQueryRequest = serde_json::from_slice(body)?;
        if request.user_id.trim().is_empty() {
            return Err(BillingError::ValidationError {
                message: "userId is required".to_string(),
            });
        }
        self.query.active_subscription(&request.user_id).await
    }

    /// 依路徑結尾分派，API Gateway 的 stage 前綴不影響判斷
    pub async fn route(
        &self,
        method: &str,
        path: &str,
        signature: Option<&str>,
        body: &[u8],
    ) -> ApiResponse {
        match last_segment(path) {
            WEBHOOK_ROUTE if !method.eq_ignore_ascii_case("POST") => method_not_allowed(),
            WEBHOOK_ROUTE => self.webhook(signature, body).await,
            SUBSCRIPTION_ROUTE => self.get_subscription(method, body).await,
            _ => {
                tracing::warn!("No route for {} {}", method, path);
                not_found()
            }
        }
    }
}

/// 只比對最後一段，`/not-stripe-webhook` 不算
fn last_segment(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or_default()
}

pub fn not_found() -> ApiResponse {
    ApiResponse::text(404, "Not found")
}

pub fn method_not_allowed() -> ApiResponse {
    ApiResponse::text(405, "Method not allowed")
}
