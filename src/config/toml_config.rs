use crate::adapters::stripe::DEFAULT_API_BASE;
use crate::core::signature::DEFAULT_TOLERANCE_SECS;
use crate::core::ConfigProvider;
use crate::utils::error::{BillingError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub stripe: StripeSection,
    pub supabase: SupabaseSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeSection {
    pub secret_key: String,
    pub webhook_secret: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_tolerance")]
    pub signature_tolerance_secs: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseSection {
    pub url: String,
    pub service_role_key: String,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_tolerance() -> i64 {
    DEFAULT_TOLERANCE_SECS
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;

        toml::from_str(&processed).map_err(|e| BillingError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換 ${VAR_NAME}；未設定的變數保留原樣，交給驗證階段報錯
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BillingError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    fn unresolved(field: &str, value: &str) -> Result<()> {
        if value.contains("${") {
            return Err(BillingError::MissingConfigError {
                field: field.to_string(),
            });
        }
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn stripe_secret_key(&self) -> &str {
        &self.stripe.secret_key
    }

    fn webhook_secret(&self) -> &str {
        &self.stripe.webhook_secret
    }

    fn stripe_api_base(&self) -> &str {
        &self.stripe.api_base
    }

    fn signature_tolerance_secs(&self) -> i64 {
        self.stripe.signature_tolerance_secs
    }

    fn supabase_url(&self) -> &str {
        &self.supabase.url
    }

    fn supabase_service_key(&self) -> &str {
        &self.supabase.service_role_key
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        Self::unresolved("stripe.secret_key", &self.stripe.secret_key)?;
        Self::unresolved("stripe.webhook_secret", &self.stripe.webhook_secret)?;
        Self::unresolved("supabase.service_role_key", &self.supabase.service_role_key)?;
        super::validate_relay_settings(self)
    }
}
