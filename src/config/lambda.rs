use crate::adapters::stripe::DEFAULT_API_BASE;
use crate::core::signature::DEFAULT_TOLERANCE_SECS;
use crate::core::ConfigProvider;
use crate::utils::error::{BillingError, Result};
use crate::utils::validation::Validate;
use std::env;

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub stripe_secret_key: String,
    pub webhook_secret: String,
    pub stripe_api_base: String,
    pub signature_tolerance_secs: i64,
    pub supabase_url: String,
    pub supabase_service_key: String,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 以任意來源查詢變數，方便測試時不動到行程環境
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| BillingError::MissingConfigError {
                    field: key.to_string(),
                })
        };

        let signature_tolerance_secs = match lookup("STRIPE_SIGNATURE_TOLERANCE_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| BillingError::InvalidConfigValueError {
                    field: "STRIPE_SIGNATURE_TOLERANCE_SECS".to_string(),
                    value: raw.clone(),
                    reason: "Value must be a whole number of seconds".to_string(),
                })?,
            None => DEFAULT_TOLERANCE_SECS,
        };

        Ok(Self {
            stripe_secret_key: required("STRIPE_SECRET_KEY")?,
            webhook_secret: required("STRIPE_WEBHOOK_SECRET")?,
            stripe_api_base: lookup("STRIPE_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            signature_tolerance_secs,
            supabase_url: required("SUPABASE_URL")?,
            supabase_service_key: required("SUPABASE_SERVICE_ROLE_KEY")?,
        })
    }
}

impl ConfigProvider for LambdaConfig {
    fn stripe_secret_key(&self) -> &str {
        &self.stripe_secret_key
    }

    fn webhook_secret(&self) -> &str {
        &self.webhook_secret
    }

    fn stripe_api_base(&self) -> &str {
        &self.stripe_api_base
    }

    fn signature_tolerance_secs(&self) -> i64 {
        self.signature_tolerance_secs
    }

    fn supabase_url(&self) -> &str {
        &self.supabase_url
    }

    fn supabase_service_key(&self) -> &str {
        &self.supabase_service_key
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        super::validate_relay_settings(self)?;
        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}
