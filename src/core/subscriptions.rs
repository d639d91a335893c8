use crate::core::expiration::{days_remaining, default_expiration};
use crate::domain::model::{Subscription, SubscriptionUpsert, Tier};
use crate::domain::ports::SubscriptionStore;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};

pub struct SubscriptionService<S: SubscriptionStore> {
    store: S,
}

impl<S: SubscriptionStore> SubscriptionService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn get_user_subscription(&self, user_id: &str) -> Result<Option<Subscription>> {
        self.store.get_subscription(user_id).await
    }

    /// 手動變更等級，期限重設為 30 天後
    pub async fn update_subscription(&self, user_id: &str, tier: Tier) -> Result<Subscription> {
        self.update_subscription_at(user_id, tier, Utc::now()).await
    }

    pub async fn update_subscription_at(
        &self,
        user_id: &str,
        tier: Tier,
        now: DateTime<Utc>,
    ) -> Result<Subscription> {
        let row = SubscriptionUpsert::for_tier(user_id, tier, default_expiration(now));
        let stored = self.store.upsert_subscription(&row).await?;
        tracing::info!(
            "Updated subscription for user {}: tier={}, limit={}",
            user_id,
            tier,
            stored.project_limit
        );
        Ok(stored)
    }

    /// 沒有訂閱或沒有期限時回傳 None
    pub async fn days_remaining(&self, user_id: &str, now: DateTime<Utc>) -> Result<Option<u32>> {
        let subscription = self.store.get_subscription(user_id).await?;
        Ok(subscription
            .and_then(|s| s.expires_at)
            .map(|expires_at| days_remaining(expires_at, now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::MemoryStore;
    use chrono::Duration;

    #[tokio::test]
    async fn test_update_subscription_sets_limit_and_expiry() {
        let store = MemoryStore::default();
        let service = SubscriptionService::new(store.clone());
        let now = Utc::now();

        let row = service
            .update_subscription_at("user_1", Tier::Pro, now)
            .await
            .unwrap();

        assert_eq!(row.tier, Tier::Pro);
        assert_eq!(row.project_limit, 15);
        assert_eq!(row.expires_at, Some(now + Duration::days(30)));
        assert_eq!(service.days_remaining("user_1", now).await.unwrap(), Some(30));
    }

    #[tokio::test]
    async fn test_manual_update_keeps_provider_fields() {
        let store = MemoryStore::default();
        let mut existing = SubscriptionUpsert::for_tier("user_1", Tier::Pro, Utc::now());
        existing.stripe_subscription_id = Some("sub_1".to_string());
        store.upsert_subscription(&existing).await.unwrap();

        let service = SubscriptionService::new(store.clone());
        let row = service
            .update_subscription("user_1", Tier::Enterprise)
            .await
            .unwrap();

        assert_eq!(row.project_limit, 999);
        assert_eq!(row.stripe_subscription_id.as_deref(), Some("sub_1"));
    }

    #[tokio::test]
    async fn test_missing_subscription() {
        let service = SubscriptionService::new(MemoryStore::default());
        assert!(service
            .get_user_subscription("user_1")
            .await
            .unwrap()
            .is_none());
        assert_eq!(
            service.days_remaining("user_1", Utc::now()).await.unwrap(),
            None
        );
    }
}
