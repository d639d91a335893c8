use crate::core::event::{EventKind, WebhookEvent};
use crate::core::expiration::from_unix_seconds;
use crate::core::signature::SignatureVerifier;
use crate::domain::model::{SubscriptionReset, SubscriptionUpsert, Tier};
use crate::domain::ports::{PaymentProvider, SubscriptionStore};
use crate::domain::stripe::{CheckoutSession, StripeSubscription};
use crate::utils::error::{BillingError, Result};

/// 單次 webhook 處理的結果
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutcome {
    CustomerLinked { user_id: String, customer_id: String },
    SubscriptionSynced { user_id: String, tier: Tier },
    SubscriptionReset { user_id: String },
    /// 缺少必要資料，事件被丟棄（仍回應 200）
    Dropped { reason: String },
    Ignored { event_type: String },
}

pub struct WebhookProcessor<P: PaymentProvider, S: SubscriptionStore> {
    provider: P,
    store: S,
    verifier: SignatureVerifier,
}

impl<P: PaymentProvider, S: SubscriptionStore> WebhookProcessor<P, S> {
    pub fn new(provider: P, store: S, verifier: SignatureVerifier) -> Self {
        Self {
            provider,
            store,
            verifier,
        }
    }

    /// 驗證簽章、解析並分派事件
    pub async fn handle(&self, payload: &[u8], signature: &str) -> Result<WebhookOutcome> {
        self.verifier.verify(payload, signature)?;
        let event = WebhookEvent::from_slice(payload)?;
        tracing::info!("📨 Received event {} ({})", event.id, event.event_type);
        self.process_event(event).await
    }

    pub async fn process_event(&self, event: WebhookEvent) -> Result<WebhookOutcome> {
        match event.into_kind()? {
            EventKind::CheckoutCompleted(session) => self.on_checkout_completed(session).await,
            EventKind::SubscriptionChanged(subscription) => {
                self.on_subscription_changed(subscription).await
            }
            EventKind::SubscriptionDeleted(subscription) => {
                self.on_subscription_deleted(subscription).await
            }
            EventKind::Unhandled(event_type) => {
                tracing::info!("Unhandled event type: {}", event_type);
                Ok(WebhookOutcome::Ignored { event_type })
            }
        }
    }

    async fn on_checkout_completed(&self, session: CheckoutSession) -> Result<WebhookOutcome> {
        let Some(user_id) = session.user_id() else {
            tracing::error!("No userId found in session metadata ({})", session.id);
            return Ok(dropped("No userId found in session metadata"));
        };
        let Some(customer) = session.customer.as_ref() else {
            tracing::error!("Checkout session {} has no customer", session.id);
            return Ok(dropped("Checkout session has no customer"));
        };

        self.store.set_customer_id(user_id, customer.id()).await?;
        tracing::info!("🔗 Linked user {} to customer {}", user_id, customer.id());

        Ok(WebhookOutcome::CustomerLinked {
            user_id: user_id.to_string(),
            customer_id: customer.id().to_string(),
        })
    }

    async fn on_subscription_changed(
        &self,
        subscription: StripeSubscription,
    ) -> Result<WebhookOutcome> {
        let item = subscription
            .first_item()
            .ok_or_else(|| BillingError::ValidationError {
                message: format!("Subscription {} has no items", subscription.id),
            })?;

        let product = self
            .provider
            .retrieve_product(item.price.product.id())
            .await?;
        let tier = match product.tier_name() {
            Some(name) => Tier::from_name(name).unwrap_or_else(|| {
                tracing::warn!(
                    "Product {} has unknown tier '{}', using free tier",
                    product.id,
                    name
                );
                Tier::Free
            }),
            None => Tier::Free,
        };

        let customer_id = subscription.customer.id();
        let Some(user_id) = self.store.find_user_by_customer(customer_id).await? else {
            tracing::error!("Error finding user for customer {}", customer_id);
            return Ok(dropped("No user found for customer"));
        };

        let row = SubscriptionUpsert {
            stripe_subscription_id: Some(subscription.id.clone()),
            stripe_price_id: Some(item.price.id.clone()),
            status: Some(subscription.status.clone()),
            cancel_at_period_end: Some(subscription.cancel_at_period_end),
            ..SubscriptionUpsert::for_tier(
                user_id.clone(),
                tier,
                from_unix_seconds(subscription.current_period_end)?,
            )
        };
        self.store.upsert_subscription(&row).await?;

        tracing::info!(
            "✅ Synced subscription {} for user {}: tier={}, limit={}",
            subscription.id,
            user_id,
            tier,
            row.project_limit
        );
        Ok(WebhookOutcome::SubscriptionSynced { user_id, tier })
    }

    async fn on_subscription_deleted(
        &self,
        subscription: StripeSubscription,
    ) -> Result<WebhookOutcome> {
        let customer_id = subscription.customer.id();
        let Some(user_id) = self.store.find_user_by_customer(customer_id).await? else {
            tracing::error!("Error finding user for customer {}", customer_id);
            return Ok(dropped("No user found for customer"));
        };

        self.store
            .reset_subscription(&user_id, &SubscriptionReset::free())
            .await?;
        tracing::info!("↩️ Reset user {} to free tier", user_id);

        Ok(WebhookOutcome::SubscriptionReset { user_id })
    }
}

fn dropped(reason: &str) -> WebhookOutcome {
    WebhookOutcome::Dropped {
        reason: reason.to_string(),
    }
}
