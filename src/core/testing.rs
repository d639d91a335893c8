// 外部介面的記憶體替身，單元測試共用

use crate::domain::model::{
    NewProject, Project, ProjectUpdate, Subscription, SubscriptionReset, SubscriptionUpsert,
    UserRecord,
};
use crate::domain::ports::{PaymentProvider, ProjectStore, SubscriptionStore};
use crate::domain::stripe::{Product, StripeSubscription};
use crate::utils::error::{BillingError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone, Default)]
pub struct MockProvider {
    products: Arc<Mutex<HashMap<String, Product>>>,
    subscriptions: Arc<Mutex<HashMap<String, Vec<StripeSubscription>>>>,
}

impl MockProvider {
    pub async fn add_product(&self, id: &str, name: &str, tier: Option<&str>) {
        let mut metadata = HashMap::new();
        if let Some(tier) = tier {
            metadata.insert("tier".to_string(), tier.to_string());
        }
        self.products.lock().await.insert(
            id.to_string(),
            Product {
                id: id.to_string(),
                name: name.to_string(),
                metadata,
            },
        );
    }

    pub async fn add_subscription(&self, customer_id: &str, subscription: StripeSubscription) {
        self.subscriptions
            .lock()
            .await
            .entry(customer_id.to_string())
            .or_default()
            .push(subscription);
    }
}

impl PaymentProvider for MockProvider {
    async fn retrieve_product(&self, product_id: &str) -> Result<Product> {
        self.products
            .lock()
            .await
            .get(product_id)
            .cloned()
            .ok_or_else(|| BillingError::ProviderError {
                status: 404,
                message: format!("No such product: '{}'", product_id),
            })
    }

    async fn list_active_subscriptions(&self, customer_id: &str) -> Result<Vec<StripeSubscription>> {
        Ok(self
            .subscriptions
            .lock()
            .await
            .get(customer_id)
            .map(|subs| {
                subs.iter()
                    .filter(|s| s.status == "active")
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<Mutex<HashMap<String, UserRecord>>>,
    subscriptions: Arc<Mutex<HashMap<String, Subscription>>>,
    projects: Arc<Mutex<Vec<Project>>>,
    next_id: Arc<Mutex<u32>>,
}

impl MemoryStore {
    pub async fn add_user(&self, id: &str, customer_id: Option<&str>) {
        self.users.lock().await.insert(
            id.to_string(),
            UserRecord {
                id: id.to_string(),
                stripe_customer_id: customer_id.map(str::to_string),
            },
        );
    }

    pub async fn user(&self, id: &str) -> Option<UserRecord> {
        self.users.lock().await.get(id).cloned()
    }

    pub async fn subscription(&self, user_id: &str) -> Option<Subscription> {
        self.subscriptions.lock().await.get(user_id).cloned()
    }

    pub async fn insert_subscription(&self, row: Subscription) {
        self.subscriptions
            .lock()
            .await
            .insert(row.user_id.clone(), row);
    }

    pub async fn add_project(&self, user_id: &str, name: &str, created_at: DateTime<Utc>) -> Project {
        let id = self.allocate_id().await;
        let project = Project {
            id,
            name: name.to_string(),
            description: String::new(),
            image_url: String::new(),
            created_at,
            user_id: user_id.to_string(),
        };
        self.projects.lock().await.push(project.clone());
        project
    }

    async fn allocate_id(&self) -> String {
        let mut next = self.next_id.lock().await;
        *next += 1;
        format!("proj_{}", *next)
    }
}

impl SubscriptionStore for MemoryStore {
    async fn set_customer_id(&self, user_id: &str, customer_id: &str) -> Result<()> {
        if let Some(user) = self.users.lock().await.get_mut(user_id) {
            user.stripe_customer_id = Some(customer_id.to_string());
        }
        Ok(())
    }

    async fn customer_id_for_user(&self, user_id: &str) -> Result<Option<String>> {
        self.users
            .lock()
            .await
            .get(user_id)
            .map(|user| user.stripe_customer_id.clone().filter(|id| !id.is_empty()))
            .ok_or_else(|| BillingError::NotFound {
                resource: format!("user {}", user_id),
            })
    }

    async fn find_user_by_customer(&self, customer_id: &str) -> Result<Option<String>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|user| user.stripe_customer_id.as_deref() == Some(customer_id))
            .map(|user| user.id.clone()))
    }

    async fn get_subscription(&self, user_id: &str) -> Result<Option<Subscription>> {
        Ok(self.subscription(user_id).await)
    }

    async fn upsert_subscription(&self, row: &SubscriptionUpsert) -> Result<Subscription> {
        let mut subscriptions = self.subscriptions.lock().await;
        let entry = subscriptions
            .entry(row.user_id.clone())
            .or_insert_with(|| Subscription {
                id: Some(format!("subrow_{}", row.user_id)),
                user_id: row.user_id.clone(),
                tier: row.tier,
                project_limit: row.project_limit,
                expires_at: None,
                created_at: DateTime::from_timestamp(1_700_000_000, 0),
                stripe_subscription_id: None,
                stripe_price_id: None,
                status: None,
                cancel_at_period_end: false,
            });

        entry.tier = row.tier;
        entry.project_limit = row.project_limit;
        entry.expires_at = Some(row.expires_at);
        if row.stripe_subscription_id.is_some() {
            entry.stripe_subscription_id = row.stripe_subscription_id.clone();
        }
        if row.stripe_price_id.is_some() {
            entry.stripe_price_id = row.stripe_price_id.clone();
        }
        if row.status.is_some() {
            entry.status = row.status.clone();
        }
        if let Some(cancel) = row.cancel_at_period_end {
            entry.cancel_at_period_end = cancel;
        }
        Ok(entry.clone())
    }

    async fn reset_subscription(&self, user_id: &str, reset: &SubscriptionReset) -> Result<()> {
        if let Some(entry) = self.subscriptions.lock().await.get_mut(user_id) {
            entry.tier = reset.tier;
            entry.project_limit = reset.project_limit;
            entry.stripe_subscription_id = reset.stripe_subscription_id.clone();
            entry.stripe_price_id = reset.stripe_price_id.clone();
            entry.status = Some(reset.status.clone());
            entry.cancel_at_period_end = reset.cancel_at_period_end;
        }
        Ok(())
    }
}

impl ProjectStore for MemoryStore {
    async fn list_projects(&self, user_id: &str) -> Result<Vec<Project>> {
        let mut projects: Vec<Project> = self
            .projects
            .lock()
            .await
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn count_projects(&self, user_id: &str) -> Result<u32> {
        Ok(self.list_projects(user_id).await?.len() as u32)
    }

    async fn get_project(&self, id: &str) -> Result<Option<Project>> {
        Ok(self
            .projects
            .lock()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn insert_project(&self, project: &NewProject) -> Result<Project> {
        let id = self.allocate_id().await;
        let created = Project {
            id,
            name: project.name.clone(),
            description: project.description.clone(),
            image_url: project.image_url.clone(),
            created_at: Utc::now(),
            user_id: project.user_id.clone(),
        };
        self.projects.lock().await.push(created.clone());
        Ok(created)
    }

    async fn update_project(&self, id: &str, update: &ProjectUpdate) -> Result<Option<Project>> {
        let mut projects = self.projects.lock().await;
        let Some(project) = projects.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &update.name {
            project.name = name.clone();
        }
        if let Some(description) = &update.description {
            project.description = description.clone();
        }
        if let Some(image_url) = &update.image_url {
            project.image_url = image_url.clone();
        }
        Ok(Some(project.clone()))
    }

    async fn delete_project(&self, id: &str) -> Result<()> {
        self.projects.lock().await.retain(|p| p.id != id);
        Ok(())
    }
}

pub fn subscription_object(
    id: &str,
    customer: &str,
    price_id: &str,
    product_id: &str,
    period_end: i64,
) -> StripeSubscription {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "customer": customer,
        "status": "active",
        "current_period_end": period_end,
        "cancel_at_period_end": false,
        "items": {"data": [{"price": {
            "id": price_id,
            "product": product_id,
            "unit_amount": 1999,
            "recurring": {"interval": "month"}
        }}]}
    }))
    .expect("valid subscription fixture")
}
