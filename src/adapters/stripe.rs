use crate::domain::ports::PaymentProvider;
use crate::domain::stripe::{List, Product, StripeSubscription};
use crate::utils::error::{BillingError, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";
pub const API_VERSION: &str = "2023-10-16";

#[derive(Debug, Clone)]
pub struct StripeClient {
    client: Client,
    api_base: String,
    secret_key: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl StripeClient {
    pub fn new(client: Client, api_base: &str, secret_key: &str) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{}", self.api_base, path))
            .bearer_auth(&self.secret_key)
            .header("Stripe-Version", API_VERSION)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        tracing::debug!("Payment provider response status: {}", status);

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        Err(BillingError::ProviderError {
            status: status.as_u16(),
            message,
        })
    }
}

impl PaymentProvider for StripeClient {
    async fn retrieve_product(&self, product_id: &str) -> Result<Product> {
        tracing::debug!("Retrieving product {}", product_id);
        let response = self
            .get(&format!("/v1/products/{}", product_id))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn list_active_subscriptions(&self, customer_id: &str) -> Result<Vec<StripeSubscription>> {
        tracing::debug!("Listing active subscriptions for {}", customer_id);
        let response = self
            .get("/v1/subscriptions")
            .query(&[
                ("customer", customer_id),
                ("status", "active"),
                ("expand[]", "data.default_payment_method"),
            ])
            .send()
            .await?;
        let list: List<StripeSubscription> = Self::decode(response).await?;
        Ok(list.data)
    }
}
