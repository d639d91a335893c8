use crate::domain::model::{
    NewProject, Project, ProjectUpdate, Subscription, SubscriptionReset, SubscriptionUpsert,
};
use crate::domain::stripe::{Product, StripeSubscription};
use crate::utils::error::Result;
use std::future::Future;

pub trait ConfigProvider: Send + Sync {
    fn stripe_secret_key(&self) -> &str;
    fn webhook_secret(&self) -> &str;
    fn stripe_api_base(&self) -> &str;
    fn signature_tolerance_secs(&self) -> i64;
    fn supabase_url(&self) -> &str;
    fn supabase_service_key(&self) -> &str;
}

/// 金流服務端 API
pub trait PaymentProvider: Send + Sync {
    fn retrieve_product(&self, product_id: &str) -> impl Future<Output = Result<Product>> + Send;

    fn list_active_subscriptions(
        &self,
        customer_id: &str,
    ) -> impl Future<Output = Result<Vec<StripeSubscription>>> + Send;
}

/// `users` 與 `subscriptions` 兩張表
pub trait SubscriptionStore: Send + Sync {
    fn set_customer_id(
        &self,
        user_id: &str,
        customer_id: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    /// 使用者不存在時回傳 NotFound
    fn customer_id_for_user(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<String>>> + Send;

    fn find_user_by_customer(
        &self,
        customer_id: &str,
    ) -> impl Future<Output = Result<Option<String>>> + Send;

    fn get_subscription(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<Subscription>>> + Send;

    fn upsert_subscription(
        &self,
        row: &SubscriptionUpsert,
    ) -> impl Future<Output = Result<Subscription>> + Send;

    fn reset_subscription(
        &self,
        user_id: &str,
        reset: &SubscriptionReset,
    ) -> impl Future<Output = Result<()>> + Send;
}

pub trait ProjectStore: Send + Sync {
    /// 依 created_at 由新到舊
    fn list_projects(&self, user_id: &str) -> impl Future<Output = Result<Vec<Project>>> + Send;

    fn count_projects(&self, user_id: &str) -> impl Future<Output = Result<u32>> + Send;

    fn get_project(&self, id: &str) -> impl Future<Output = Result<Option<Project>>> + Send;

    fn insert_project(&self, project: &NewProject)
        -> impl Future<Output = Result<Project>> + Send;

    fn update_project(
        &self,
        id: &str,
        update: &ProjectUpdate,
    ) -> impl Future<Output = Result<Option<Project>>> + Send;

    fn delete_project(&self, id: &str) -> impl Future<Output = Result<()>> + Send;
}
