use crate::utils::error::{BillingError, Result};
use chrono::{DateTime, Duration, Utc};

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// 手動升級時的訂閱期間
pub const DEFAULT_PERIOD_DAYS: i64 = 30;

/// 剩餘天數，無條件進位，過期後為 0
pub fn days_remaining(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let diff = (expires_at - now).num_milliseconds();
    if diff <= 0 {
        return 0;
    }
    let days = (diff + DAY_MILLIS - 1) / DAY_MILLIS;
    u32::try_from(days).unwrap_or(u32::MAX)
}

pub fn days_remaining_from_str(expires_at: &str, now: DateTime<Utc>) -> Result<u32> {
    let expires_at = parse_timestamp(expires_at)?;
    Ok(days_remaining(expires_at, now))
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| BillingError::ValidationError {
            message: format!("Invalid timestamp '{}': {}", value, e),
        })
}

pub fn default_expiration(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(DEFAULT_PERIOD_DAYS)
}

/// 金流端的 period end 為 Unix 秒數
pub fn from_unix_seconds(seconds: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0).ok_or_else(|| BillingError::ValidationError {
        message: format!("Timestamp out of range: {}", seconds),
    })
}
