use crate::domain::ports::{PaymentProvider, SubscriptionStore};
use crate::utils::error::{BillingError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionQueryRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// `subscription` 為 null 代表沒有有效訂閱
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionQueryResponse {
    pub subscription: Option<SubscriptionDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionDetails {
    pub id: String,
    pub status: String,
    pub current_period_end: i64,
    pub cancel_at_period_end: bool,
    pub product: ProductSummary,
    pub price: PriceSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub tier: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub id: String,
    pub unit_amount: Option<i64>,
    pub interval: Option<String>,
}

pub struct SubscriptionQuery<P: PaymentProvider, S: SubscriptionStore> {
    provider: P,
    store: S,
}

impl<P: PaymentProvider, S: SubscriptionStore> SubscriptionQuery<P, S> {
    pub fn new(provider: P, store: S) -> Self {
        Self { provider, store }
    }

    pub async fn active_subscription(&self, user_id: &str) -> Result<SubscriptionQueryResponse> {
        let Some(customer_id) = self.store.customer_id_for_user(user_id).await? else {
            tracing::debug!("User {} has no payment customer", user_id);
            return Ok(SubscriptionQueryResponse { subscription: None });
        };

        let subscriptions = self.provider.list_active_subscriptions(&customer_id).await?;
        let Some(subscription) = subscriptions.into_iter().next() else {
            tracing::debug!("Customer {} has no active subscription", customer_id);
            return Ok(SubscriptionQueryResponse { subscription: None });
        };

        let item = subscription
            .first_item()
            .ok_or_else(|| BillingError::ValidationError {
                message: format!("Subscription {} has no items", subscription.id),
            })?;
        let product = self
            .provider
            .retrieve_product(item.price.product.id())
            .await?;

        let details = SubscriptionDetails {
            id: subscription.id.clone(),
            status: subscription.status.clone(),
            current_period_end: subscription.current_period_end,
            cancel_at_period_end: subscription.cancel_at_period_end,
            product: ProductSummary {
                tier: product.tier_name().unwrap_or("unknown").to_string(),
                id: product.id,
                name: product.name,
            },
            price: PriceSummary {
                id: item.price.id.clone(),
                unit_amount: item.price.unit_amount,
                interval: item.price.recurring.as_ref().map(|r| r.interval.clone()),
            },
        };

        Ok(SubscriptionQueryResponse {
            subscription: Some(details),
        })
    }
}
