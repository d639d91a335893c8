pub mod proxy;
pub mod relay;
pub mod response;
#[cfg(feature = "cli")]
pub mod server;

pub use proxy::{ProxyRequest, ProxyResponse};
pub use relay::BillingRelay;
pub use response::ApiResponse;
