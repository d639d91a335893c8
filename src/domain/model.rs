use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// 訂閱等級，決定可建立的專案數量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Pro,
    Enterprise,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Free, Tier::Pro, Tier::Enterprise];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Pro => "pro",
            Tier::Enterprise => "enterprise",
        }
    }

    /// 大小寫不敏感；無法辨識時回傳 None
    pub fn from_name(name: &str) -> Option<Tier> {
        match name.trim().to_ascii_lowercase().as_str() {
            "free" => Some(Tier::Free),
            "pro" => Some(Tier::Pro),
            "enterprise" => Some(Tier::Enterprise),
            _ => None,
        }
    }

    pub fn from_name_or_free(name: &str) -> Tier {
        Tier::from_name(name).unwrap_or(Tier::Free)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Tier {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Tier::from_name_or_free(&name))
    }
}

/// `subscriptions` 表的一列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default)]
    pub id: Option<String>,
    pub user_id: String,
    pub tier: Tier,
    pub project_limit: u32,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stripe_subscription_id: Option<String>,
    #[serde(default)]
    pub stripe_price_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
}

/// 以 user_id 為衝突鍵寫入的訂閱資料。
/// 金流欄位為 None 時不送出，保留資料庫原值。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionUpsert {
    pub user_id: String,
    pub tier: Tier,
    pub project_limit: u32,
    pub expires_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stripe_subscription_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stripe_price_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_at_period_end: Option<bool>,
}

impl SubscriptionUpsert {
    pub fn for_tier(user_id: impl Into<String>, tier: Tier, expires_at: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            tier,
            project_limit: tier.project_limit(),
            expires_at,
            stripe_subscription_id: None,
            stripe_price_id: None,
            status: None,
            cancel_at_period_end: None,
        }
    }
}

/// 訂閱取消後的重設內容；null 欄位必須實際送出
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionReset {
    pub tier: Tier,
    pub project_limit: u32,
    pub stripe_subscription_id: Option<String>,
    pub stripe_price_id: Option<String>,
    pub status: String,
    pub cancel_at_period_end: bool,
}

impl SubscriptionReset {
    pub fn free() -> Self {
        Self {
            tier: Tier::Free,
            project_limit: Tier::Free.project_limit(),
            stripe_subscription_id: None,
            stripe_price_id: None,
            status: "inactive".to_string(),
            cancel_at_period_end: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    #[serde(default)]
    pub stripe_customer_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// 新增專案時的欄位，id 與 created_at 由資料庫產生
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ProjectUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.image_url.is_none()
    }
}
