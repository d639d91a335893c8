use chrono::Utc;
use clap::Parser;
use std::sync::Arc;
use synth_billing::app::server;
use synth_billing::config::{CliConfig, Command};
use synth_billing::core::expiration::days_remaining_from_str;
use synth_billing::core::plans::PLANS;
use synth_billing::core::signature::SignatureVerifier;
use synth_billing::core::ConfigProvider;
use synth_billing::utils::error::ErrorSeverity;
use synth_billing::utils::{logger, validation::Validate};
use synth_billing::{BillingRelay, Result, TomlConfig};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::debug!("Command: {:?}", config.command);

    if let Err(e) = run(config).await {
        tracing::error!("❌ {} (Severity: {:?})", e, e.severity());
        eprintln!("❌ {}", e.user_friendly_message());

        // 依錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(config: CliConfig) -> Result<()> {
    // 指定 --config 時以檔案為準，不再檢查命令列的密鑰
    let file = match &config.config {
        Some(path) => {
            let file = TomlConfig::from_file(path)?;
            file.validate()?;
            tracing::info!("📄 Loaded settings from {}", path);
            Some(file)
        }
        None => {
            config.validate()?;
            None
        }
    };

    match &config.command {
        Command::Serve { bind } => {
            let relay = match &file {
                Some(file) => BillingRelay::from_config(file)?,
                None => BillingRelay::from_config(&config)?,
            };
            server::serve(*bind, Arc::new(relay)).await
        }
        Command::Sign { payload, timestamp } => {
            let secret = match &file {
                Some(file) => file.webhook_secret(),
                None => config.webhook_secret(),
            };
            let body = std::fs::read(payload)?;
            let timestamp = timestamp.unwrap_or_else(|| Utc::now().timestamp());
            let header = SignatureVerifier::new(secret, 0).sign(&body, timestamp)?;
            println!("{}", header);
            Ok(())
        }
        Command::DaysRemaining { expires_at } => {
            let days = days_remaining_from_str(expires_at, Utc::now())?;
            println!("{}", days);
            Ok(())
        }
        Command::Plans => {
            for plan in PLANS.iter() {
                println!(
                    "{:<12} {:<18} {:>8}/mo  {:>4} projects",
                    plan.display_name,
                    plan.price_id,
                    plan.formatted_price(),
                    plan.project_limit
                );
            }
            Ok(())
        }
    }
}
