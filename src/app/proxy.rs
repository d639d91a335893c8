// API Gateway 代理事件的請求與回應格式

use super::relay::BillingRelay;
use super::response::ApiResponse;
use crate::core::signature::SIGNATURE_HEADER;
use crate::domain::ports::{PaymentProvider, SubscriptionStore};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    #[serde(default)]
    pub http_method: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl ProxyRequest {
    /// Gateway 不保證標頭大小寫
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.as_ref().and_then(|headers| {
            headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        })
    }

    /// 簽章是對原始位元組計算，base64 主體必須先還原
    pub fn body_bytes(&self) -> std::result::Result<Vec<u8>, base64::DecodeError> {
        match &self.body {
            None => Ok(Vec::new()),
            Some(body) if self.is_base64_encoded => BASE64.decode(body),
            Some(body) => Ok(body.as_bytes().to_vec()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl From<ApiResponse> for ProxyResponse {
    fn from(response: ApiResponse) -> Self {
        Self {
            status_code: response.status,
            headers: response.headers.into_iter().collect(),
            body: response.body,
            is_base64_encoded: false,
        }
    }
}

impl<P: PaymentProvider, S: SubscriptionStore> BillingRelay<P, S> {
    pub async fn handle_proxy(&self, request: &ProxyRequest) -> ProxyResponse {
        let body = match request.body_bytes() {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("⚠️ Could not decode request body: {}", e);
                return ApiResponse::text(400, "Invalid request body").into();
            }
        };

        self.route(
            &request.http_method,
            &request.path,
            request.header(SIGNATURE_HEADER),
            &body,
        )
        .await
        .into()
    }
}
