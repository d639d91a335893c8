pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{LambdaConfig, TomlConfig};

pub use adapters::{StripeClient, SupabaseClient};
pub use app::{ApiResponse, BillingRelay};
pub use core::projects::ProjectService;
pub use core::subscriptions::SubscriptionService;
pub use domain::model::{Project, Subscription, Tier};
pub use utils::error::{BillingError, Result};
