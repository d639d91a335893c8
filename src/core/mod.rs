pub mod event;
pub mod expiration;
pub mod plans;
pub mod projects;
pub mod signature;
pub mod subscription_query;
pub mod subscriptions;
pub mod tier;
pub mod webhook;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{Project, Subscription, Tier};
pub use crate::domain::ports::{ConfigProvider, PaymentProvider, ProjectStore, SubscriptionStore};
pub use crate::utils::error::Result;
