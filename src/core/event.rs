use crate::domain::stripe::{CheckoutSession, StripeSubscription};
use crate::utils::error::Result;
use serde::Deserialize;

pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";
pub const SUBSCRIPTION_CREATED: &str = "customer.subscription.created";
pub const SUBSCRIPTION_UPDATED: &str = "customer.subscription.updated";
pub const SUBSCRIPTION_DELETED: &str = "customer.subscription.deleted";

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    CheckoutCompleted(CheckoutSession),
    SubscriptionChanged(StripeSubscription),
    SubscriptionDeleted(StripeSubscription),
    Unhandled(String),
}

impl WebhookEvent {
    pub fn from_slice(payload: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(payload)?)
    }

    /// 只解析已知事件的 data.object；未知事件不檢查內容
    pub fn into_kind(self) -> Result<EventKind> {
        let kind = match self.event_type.as_str() {
            CHECKOUT_SESSION_COMPLETED => {
                EventKind::CheckoutCompleted(serde_json::from_value(self.data.object)?)
            }
            SUBSCRIPTION_CREATED | SUBSCRIPTION_UPDATED => {
                EventKind::SubscriptionChanged(serde_json::from_value(self.data.object)?)
            }
            SUBSCRIPTION_DELETED => {
                EventKind::SubscriptionDeleted(serde_json::from_value(self.data.object)?)
            }
            _ => EventKind::Unhandled(self.event_type),
        };
        Ok(kind)
    }
}
