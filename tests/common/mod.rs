#![allow(dead_code)]

use chrono::Utc;
use httpmock::MockServer;
use synth_billing::core::signature::SignatureVerifier;
use synth_billing::{BillingRelay, LambdaConfig};

pub const WEBHOOK_SECRET: &str = "whsec_integration";
pub const SERVICE_KEY: &str = "service-role-key";
pub const STRIPE_KEY: &str = "sk_test_integration";

pub fn config(stripe: &MockServer, supabase: &MockServer) -> LambdaConfig {
    LambdaConfig {
        stripe_secret_key: STRIPE_KEY.to_string(),
        webhook_secret: WEBHOOK_SECRET.to_string(),
        stripe_api_base: stripe.base_url(),
        signature_tolerance_secs: 300,
        supabase_url: supabase.base_url(),
        supabase_service_key: SERVICE_KEY.to_string(),
    }
}

pub fn relay(stripe: &MockServer, supabase: &MockServer) -> BillingRelay {
    BillingRelay::from_config(&config(stripe, supabase)).unwrap()
}

pub fn sign(payload: &str) -> String {
    SignatureVerifier::new(WEBHOOK_SECRET, 300)
        .sign(payload.as_bytes(), Utc::now().timestamp())
        .unwrap()
}

pub fn subscription_event(event_type: &str, customer: &str, product: &str) -> String {
    serde_json::json!({
        "id": "evt_1",
        "type": event_type,
        "data": {"object": {
            "id": "sub_1",
            "object": "subscription",
            "customer": customer,
            "status": "active",
            "current_period_end": 1_800_000_000i64,
            "cancel_at_period_end": false,
            "items": {"object": "list", "data": [{
                "id": "si_1",
                "price": {
                    "id": "price_enterprise",
                    "product": product,
                    "unit_amount": 4999,
                    "recurring": {"interval": "month"}
                }
            }]}
        }}
    })
    .to_string()
}
