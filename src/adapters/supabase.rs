// PostgREST 格式：`/rest/v1/<table>`

use crate::domain::model::{
    NewProject, Project, ProjectUpdate, Subscription, SubscriptionReset, SubscriptionUpsert,
    UserRecord,
};
use crate::domain::ports::{ProjectStore, SubscriptionStore};
use crate::utils::error::{BillingError, Result};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

const USERS: &str = "users";
const SUBSCRIPTIONS: &str = "subscriptions";
const PROJECTS: &str = "projects";

const RETURN_MINIMAL: &str = "return=minimal";
const RETURN_REPRESENTATION: &str = "return=representation";
const UPSERT: &str = "resolution=merge-duplicates,return=representation";

#[derive(Debug, Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_key: String,
}

#[derive(Deserialize)]
struct PostgrestError {
    #[serde(default)]
    message: String,
}

fn eq(value: &str) -> String {
    format!("eq.{}", value)
}

impl SupabaseClient {
    pub fn new(client: Client, base_url: &str, service_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        }
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/rest/v1/{}", self.base_url, table))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<PostgrestError>(&body)
            .map(|e| e.message)
            .unwrap_or(body);
        tracing::warn!("Data store request failed ({}): {}", status, message);
        Err(BillingError::StoreError {
            status: status.as_u16(),
            message,
        })
    }

    async fn rows<T: DeserializeOwned>(response: Response) -> Result<Vec<T>> {
        let response = Self::check(response).await?;
        Ok(response.json::<Vec<T>>().await?)
    }

    async fn first_row<T: DeserializeOwned>(response: Response) -> Result<Option<T>> {
        Ok(Self::rows(response).await?.into_iter().next())
    }

    async fn fetch_users(&self, column: &str, value: &str, limit: usize) -> Result<Vec<UserRecord>> {
        let response = self
            .request(Method::GET, USERS)
            .query(&[
                ("select", "id,stripe_customer_id".to_string()),
                (column, eq(value)),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;
        Self::rows(response).await
    }
}

impl SubscriptionStore for SupabaseClient {
    async fn set_customer_id(&self, user_id: &str, customer_id: &str) -> Result<()> {
        let response = self
            .request(Method::PATCH, USERS)
            .query(&[("id", eq(user_id))])
            .header("Prefer", RETURN_MINIMAL)
            .json(&serde_json::json!({ "stripe_customer_id": customer_id }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn customer_id_for_user(&self, user_id: &str) -> Result<Option<String>> {
        let user = self
            .fetch_users("id", user_id, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BillingError::NotFound {
                resource: format!("user {}", user_id),
            })?;
        Ok(user.stripe_customer_id.filter(|id| !id.is_empty()))
    }

    async fn find_user_by_customer(&self, customer_id: &str) -> Result<Option<String>> {
        // 多取一筆，用來發現重複綁定的 customer
        let mut users = self.fetch_users("stripe_customer_id", customer_id, 2).await?;
        if users.len() > 1 {
            tracing::warn!(
                "⚠️ Customer {} is linked to more than one user, skipping",
                customer_id
            );
            return Ok(None);
        }
        Ok(users.pop().map(|user| user.id))
    }

    async fn get_subscription(&self, user_id: &str) -> Result<Option<Subscription>> {
        let response = self
            .request(Method::GET, SUBSCRIPTIONS)
            .query(&[
                ("select", "*".to_string()),
                ("user_id", eq(user_id)),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;
        Self::first_row(response).await
    }

    async fn upsert_subscription(&self, row: &SubscriptionUpsert) -> Result<Subscription> {
        let response = self
            .request(Method::POST, SUBSCRIPTIONS)
            .query(&[("on_conflict", "user_id")])
            .header("Prefer", UPSERT)
            .json(row)
            .send()
            .await?;
        Self::first_row(response)
            .await?
            .ok_or_else(|| BillingError::StoreError {
                status: 200,
                message: "Upsert returned no rows".to_string(),
            })
    }

    async fn reset_subscription(&self, user_id: &str, reset: &SubscriptionReset) -> Result<()> {
        let response = self
            .request(Method::PATCH, SUBSCRIPTIONS)
            .query(&[("user_id", eq(user_id))])
            .header("Prefer", RETURN_MINIMAL)
            .json(reset)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

impl ProjectStore for SupabaseClient {
    async fn list_projects(&self, user_id: &str) -> Result<Vec<Project>> {
        let response = self
            .request(Method::GET, PROJECTS)
            .query(&[
                ("select", "*".to_string()),
                ("user_id", eq(user_id)),
                ("order", "created_at.desc".to_string()),
            ])
            .send()
            .await?;
        Self::rows(response).await
    }

    async fn count_projects(&self, user_id: &str) -> Result<u32> {
        let response = self
            .request(Method::GET, PROJECTS)
            .query(&[("select", "id".to_string()), ("user_id", eq(user_id))])
            .send()
            .await?;
        let ids: Vec<serde_json::Value> = Self::rows(response).await?;
        Ok(u32::try_from(ids.len()).unwrap_or(u32::MAX))
    }

    async fn get_project(&self, id: &str) -> Result<Option<Project>> {
        let response = self
            .request(Method::GET, PROJECTS)
            .query(&[
                ("select", "*".to_string()),
                ("id", eq(id)),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;
        Self::first_row(response).await
    }

    async fn insert_project(&self, project: &NewProject) -> Result<Project> {
        let response = self
            .request(Method::POST, PROJECTS)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(project)
            .send()
            .await?;
        Self::first_row(response)
            .await?
            .ok_or_else(|| BillingError::StoreError {
                status: 200,
                message: "Insert returned no rows".to_string(),
            })
    }

    async fn update_project(&self, id: &str, update: &ProjectUpdate) -> Result<Option<Project>> {
        let response = self
            .request(Method::PATCH, PROJECTS)
            .query(&[("id", eq(id))])
            .header("Prefer", RETURN_REPRESENTATION)
            .json(update)
            .send()
            .await?;
        Self::first_row(response).await
    }

    async fn delete_project(&self, id: &str) -> Result<()> {
        let response = self
            .request(Method::DELETE, PROJECTS)
            .query(&[("id", eq(id))])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
