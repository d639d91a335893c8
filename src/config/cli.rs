use crate::adapters::stripe::DEFAULT_API_BASE;
use crate::core::signature::DEFAULT_TOLERANCE_SECS;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_secret, Validate};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "synth-billing")]
#[command(about = "Subscription billing relay for the synthesis planner")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, env = "STRIPE_SECRET_KEY", default_value = "", hide_env_values = true)]
    pub stripe_secret_key: String,

    #[arg(long, global = true, env = "STRIPE_WEBHOOK_SECRET", default_value = "", hide_env_values = true)]
    pub webhook_secret: String,

    #[arg(long, global = true, env = "STRIPE_API_BASE", default_value = DEFAULT_API_BASE)]
    pub stripe_api_base: String,

    #[arg(long, global = true, env = "STRIPE_SIGNATURE_TOLERANCE_SECS", default_value_t = DEFAULT_TOLERANCE_SECS)]
    pub signature_tolerance_secs: i64,

    #[arg(long, global = true, env = "SUPABASE_URL", default_value = "")]
    pub supabase_url: String,

    #[arg(long, global = true, env = "SUPABASE_SERVICE_ROLE_KEY", default_value = "", hide_env_values = true)]
    pub supabase_service_key: String,

    #[arg(long, global = true, help = "Load relay settings from a TOML file")]
    pub config: Option<String>,

    #[arg(long, short, global = true, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
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

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match &self.command {
            Command::Serve { .. } => super::validate_relay_settings(self),
            Command::Sign { .. } => validate_secret("STRIPE_WEBHOOK_SECRET", &self.webhook_secret),
            Command::DaysRemaining { .. } | Command::Plans => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the webhook and subscription endpoints on a local HTTP server
    Serve {
        #[arg(long, default_value = "127.0.0.1:8787")]
        bind: SocketAddr,
    },
    /// Print a signature header for a payload file, for replaying events locally
    Sign {
        payload: PathBuf,
        #[arg(long, help = "Unix timestamp to sign with (defaults to now)")]
        timestamp: Option<i64>,
    },
    /// Print the whole days left until an RFC 3339 expiration timestamp
    DaysRemaining { expires_at: String },
    /// List the plan catalogue
    Plans,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliConfig {
        CliConfig::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_serve_requires_all_secrets() {
        let config = parse(&[
            "synth-billing",
            "serve",
            "--stripe-secret-key",
            "sk_test_1",
            "--webhook-secret",
            "whsec_1",
            "--supabase-url",
            "https://project.supabase.co",
        ]);
        assert!(config.validate().is_err());

        let config = parse(&[
            "synth-billing",
            "serve",
            "--stripe-secret-key",
            "sk_test_1",
            "--webhook-secret",
            "whsec_1",
            "--supabase-url",
            "https://project.supabase.co",
            "--supabase-service-key",
            "service",
        ]);
        assert!(config.validate().is_ok());
        assert_eq!(config.stripe_api_base(), DEFAULT_API_BASE);
        assert_eq!(config.signature_tolerance_secs(), DEFAULT_TOLERANCE_SECS);
    }

    #[test]
    fn test_days_remaining_needs_no_secrets() {
        let config = parse(&["synth-billing", "days-remaining", "2030-01-01T00:00:00Z"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tolerance_out_of_range() {
        let config = parse(&[
            "synth-billing",
            "serve",
            "--stripe-secret-key",
            "sk",
            "--webhook-secret",
            "wh",
            "--supabase-url",
            "https://project.supabase.co",
            "--supabase-service-key",
            "service",
            "--signature-tolerance-secs",
            "86400",
        ]);
        assert!(config.validate().is_err());
    }
}
