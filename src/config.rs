// config.rs
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::{AppError, Result};

pub const DEFAULT_PAYSTACK_BASE_URL: &str = "https://api.paystack.co";
pub const DEFAULT_KORAPAY_BASE_URL: &str = "https://api.korapay.com/merchant/api/v1";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub paystack_secret_key: String,
    pub paystack_base_url: String,
    pub korapay_secret_key: Option<String>,
    pub korapay_base_url: String,
    pub verify_poll_interval_secs: u64,
    /// Zero means poll until the provider settles the transaction.
    pub verify_max_attempts: u32,
    pub http_timeout_secs: u64,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let paystack_secret_key = non_empty("PAYSTACK_SECRET_KEY")
            .ok_or_else(|| AppError::configuration("PAYSTACK_SECRET_KEY must be set"))?;

        Ok(AppConfig {
            paystack_secret_key,
            paystack_base_url: non_empty("PAYSTACK_BASE_URL")
                .unwrap_or_else(|| DEFAULT_PAYSTACK_BASE_URL.to_string()),
            korapay_secret_key: non_empty("KORAPAY_SECRET_KEY"),
            korapay_base_url: non_empty("KORAPAY_BASE_URL")
                .unwrap_or_else(|| DEFAULT_KORAPAY_BASE_URL.to_string()),
            verify_poll_interval_secs: parse_or(&lookup, "VERIFY_POLL_INTERVAL_SECS", 30)?,
            verify_max_attempts: parse_or(&lookup, "VERIFY_MAX_ATTEMPTS", 20)?,
            http_timeout_secs: parse_or(&lookup, "HTTP_TIMEOUT_SECS", 30)?,
            host: non_empty("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 5000)?,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.verify_poll_interval_secs)
    }

    pub fn max_attempts(&self) -> Option<u32> {
        match self.verify_max_attempts {
            0 => None,
            n => Some(n),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn korapay_enabled(&self) -> bool {
        self.korapay_secret_key.is_some()
    }

    pub fn get_config_info(&self) -> serde_json::Value {
        serde_json::json!({
            "paystack_base_url": self.paystack_base_url,
            "korapay_base_url": self.korapay_base_url,
            "korapay_enabled": self.korapay_enabled(),
            "verify_poll_interval_secs": self.verify_poll_interval_secs,
            "verify_max_attempts": self.verify_max_attempts,
            "http_timeout_secs": self.http_timeout_secs,
            "host": self.host,
            "port": self.port,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::configuration(format!("{} must be a number, got {:?}", key, raw))),
        None => Ok(default),
    }
}
