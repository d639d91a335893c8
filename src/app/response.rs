use serde::Serialize;

pub const CORS_HEADERS: [(&str, &str); 2] = [
    ("Access-Control-Allow-Origin", "*"),
    (
        "Access-Control-Allow-Headers",
        "authorization, x-client-info, apikey, content-type",
    ),
];

/// 與傳輸層無關的 HTTP 回應，axum 與 Lambda 各自轉換
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl ApiResponse {
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), "text/plain".to_string())],
            body: body.into(),
        }
    }

    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self {
                status,
                headers: vec![("Content-Type".to_string(), "application/json".to_string())],
                body,
            },
            Err(e) => {
                tracing::error!("❌ Failed to serialize response body: {}", e);
                Self::text(500, "Internal error")
            }
        }
    }

    pub fn with_cors(mut self) -> Self {
        for (name, value) in CORS_HEADERS {
            self.headers.push((name.to_string(), value.to_string()));
        }
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_response_sets_content_type() {
        let response = ApiResponse::json(200, &serde_json::json!({"received": true}));
        assert_eq!(response.body, r#"{"received":true}"#);
        assert_eq!(response.header("content-type"), Some("application/json"));
    }

    #[test]
    fn test_cors_headers_appended() {
        let response = ApiResponse::text(200, "ok").with_cors();
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(
            response.header("access-control-allow-headers"),
            Some("authorization, x-client-info, apikey, content-type")
        );
    }
}
