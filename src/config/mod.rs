#[cfg(feature = "cli")]
pub mod cli;
pub mod lambda;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_range, validate_secret, validate_url};

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};
pub use lambda::LambdaConfig;
pub use toml_config::TomlConfig;

/// 執行兩個端點所需的全部設定
pub fn validate_relay_settings(config: &impl ConfigProvider) -> Result<()> {
    validate_secret("STRIPE_SECRET_KEY", config.stripe_secret_key())?;
    validate_secret("STRIPE_WEBHOOK_SECRET", config.webhook_secret())?;
    validate_secret("SUPABASE_SERVICE_ROLE_KEY", config.supabase_service_key())?;
    validate_url("SUPABASE_URL", config.supabase_url())?;
    validate_url("STRIPE_API_BASE", config.stripe_api_base())?;
    // 0 表示不檢查時間戳
    validate_range(
        "STRIPE_SIGNATURE_TOLERANCE_SECS",
        config.signature_tolerance_secs(),
        0,
        3600,
    )?;

    tracing::debug!("✅ Relay configuration validation passed");
    Ok(())
}
