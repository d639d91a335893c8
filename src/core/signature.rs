// 標頭格式 `t=<秒>,v1=<hex>[,v1=...]`，簽的內容是 `"{t}.{原始 body}"`

use crate::utils::error::{BillingError, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "stripe-signature";
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

const EXPECTED_SCHEME: &str = "v1";

#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    secret: String,
    tolerance_secs: i64,
}

#[derive(Debug, PartialEq)]
struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<Vec<u8>>,
}

impl SignatureVerifier {
    pub fn new(secret: impl Into<String>, tolerance_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            tolerance_secs,
        }
    }

    pub fn verify(&self, payload: &[u8], header: &str) -> Result<()> {
        self.verify_at(payload, header, chrono::Utc::now().timestamp())
    }

    pub fn verify_at(&self, payload: &[u8], header: &str, now: i64) -> Result<()> {
        let parsed = parse_header(header)?;

        let mac = self.mac_for(parsed.timestamp, payload)?;
        let matched = parsed
            .signatures
            .iter()
            .any(|candidate| mac.clone().verify_slice(candidate).is_ok());

        if !matched {
            return Err(signature_error(
                "No signatures found matching the expected signature for payload",
            ));
        }

        // 極端的 t 值不能溢位
        if self.tolerance_secs > 0 && now.abs_diff(parsed.timestamp) > self.tolerance_secs as u64 {
            return Err(signature_error("Timestamp outside the tolerance zone"));
        }

        Ok(())
    }

    /// 產生合法的簽章標頭，供本機測試送出事件
    pub fn sign(&self, payload: &[u8], timestamp: i64) -> Result<String> {
        let mac = self.mac_for(timestamp, payload)?;
        Ok(format!(
            "t={},{}={}",
            timestamp,
            EXPECTED_SCHEME,
            hex::encode(mac.finalize().into_bytes())
        ))
    }

    fn mac_for(&self, timestamp: i64, payload: &[u8]) -> Result<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes()).map_err(|e| {
            BillingError::ConfigError {
                message: format!("Invalid webhook secret: {}", e),
            }
        })?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        Ok(mac)
    }
}

fn parse_header(header: &str) -> Result<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();
    let mut saw_any_signature = false;

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse::<i64>().ok(),
            EXPECTED_SCHEME => {
                saw_any_signature = true;
                // 非十六進位的簽章直接略過，不影響其他候選
                if let Ok(bytes) = hex::decode(value) {
                    signatures.push(bytes);
                }
            }
            k if k.starts_with('v') => saw_any_signature = true,
            _ => {}
        }
    }

    let timestamp = match timestamp {
        Some(ts) if saw_any_signature => ts,
        _ => {
            return Err(signature_error(
                "Unable to extract timestamp and signatures from header",
            ))
        }
    };

    if signatures.is_empty() {
        return Err(signature_error("No signatures found with expected scheme"));
    }

    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

fn signature_error(message: &str) -> BillingError {
    BillingError::SignatureError {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test123secret456";
    const PAYLOAD: &[u8] = br#"{"type":"checkout.session.completed"}"#;
    const NOW: i64 = 1_700_000_000;

    fn verifier() -> SignatureVerifier {
        SignatureVerifier::new(SECRET, DEFAULT_TOLERANCE_SECS)
    }

    #[test]
    fn test_valid_signature_is_accepted() {
        let header = verifier().sign(PAYLOAD, NOW).unwrap();
        assert!(verifier().verify_at(PAYLOAD, &header, NOW + 10).is_ok());
    }

    #[test]
    fn test_any_matching_signature_is_accepted() {
        let good = verifier().sign(PAYLOAD, NOW).unwrap();
        let good_sig = good.split("v1=").nth(1).unwrap();
        let header = format!("t={},v1={},v1={}", NOW, "ab".repeat(32), good_sig);
        assert!(verifier().verify_at(PAYLOAD, &header, NOW).is_ok());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let header = SignatureVerifier::new("wrong_secret", 300)
            .sign(PAYLOAD, NOW)
            .unwrap();
        let err = verifier().verify_at(PAYLOAD, &header, NOW).unwrap_err();
        assert!(err.to_string().contains("No signatures found matching"));
    }

    #[test]
    fn test_modified_payload_is_rejected() {
        let header = verifier().sign(PAYLOAD, NOW).unwrap();
        let tampered = br#"{"type":"checkout.session.completed","hacked":true}"#;
        assert!(verifier().verify_at(tampered, &header, NOW).is_err());
    }

    #[test]
    fn test_stale_timestamp_is_rejected() {
        let header = verifier().sign(PAYLOAD, NOW - 600).unwrap();
        let err = verifier().verify_at(PAYLOAD, &header, NOW).unwrap_err();
        assert!(err.to_string().contains("tolerance"));
    }

    #[test]
    fn test_extreme_timestamps_are_rejected() {
        for timestamp in [i64::MIN, i64::MAX] {
            let header = verifier().sign(PAYLOAD, timestamp).unwrap();
            let err = verifier().verify_at(PAYLOAD, &header, NOW).unwrap_err();
            assert!(err.to_string().contains("tolerance"));
        }
        let header = verifier().sign(PAYLOAD, NOW).unwrap();
        assert!(verifier().verify_at(PAYLOAD, &header, i64::MIN).is_err());
    }

    #[test]
    fn test_zero_tolerance_skips_timestamp_check() {
        let verifier = SignatureVerifier::new(SECRET, 0);
        let header = verifier.sign(PAYLOAD, NOW - 86_400).unwrap();
        assert!(verifier.verify_at(PAYLOAD, &header, NOW).is_ok());
    }

    #[test]
    fn test_malformed_headers() {
        let v = verifier();
        assert!(v.verify_at(PAYLOAD, "", NOW).is_err());
        assert!(v.verify_at(PAYLOAD, "garbage", NOW).is_err());
        assert!(v.verify_at(PAYLOAD, "v1=deadbeef", NOW).is_err());
        assert!(v.verify_at(PAYLOAD, "t=1700000000", NOW).is_err());

        let err = v
            .verify_at(PAYLOAD, "t=1700000000,v0=deadbeef", NOW)
            .unwrap_err();
        assert!(err.to_string().contains("expected scheme"));
    }
}
