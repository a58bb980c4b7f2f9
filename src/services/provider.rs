// services/provider.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Url};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::payment::{InitializePayment, PaymentResult, Provider};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    /// `None` polls until the provider leaves `pending`.
    pub max_attempts: Option<u32>,
}

impl PollSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        PollSettings {
            interval: config.poll_interval(),
            max_attempts: config.max_attempts(),
        }
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        PollSettings {
            interval: Duration::from_secs(30),
            max_attempts: Some(20),
        }
    }
}

/// One adapter per payment processor.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    fn provider(&self) -> Provider;

    fn poll_settings(&self) -> PollSettings;

    /// Opens a transaction under a freshly generated reference.
    async fn initialize(&self, request: &InitializePayment) -> Result<PaymentResult>;

    /// A single status lookup.
    async fn fetch(&self, reference: &str) -> Result<PaymentResult>;

    /// Looks the transaction up until the provider reports something other
    /// than `pending`. When the attempt budget runs out the last pending
    /// result is returned as-is.
    async fn verify(&self, reference: &str) -> Result<PaymentResult> {
        let settings = self.poll_settings();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let result = match self.fetch(reference).await {
                Ok(result) => result,
                Err(e) => {
                    error!("Error verifying payment for reference {}: {}", reference, e);
                    return Err(e);
                }
            };

            info!(
                "Verifying {} payment with reference: {}. Status: {} (attempt {})",
                self.provider(),
                reference,
                result.status,
                attempt
            );

            if !result.status.is_pending() {
                info!("Payment verification completed.");
                return Ok(result);
            }

            if settings.max_attempts.is_some_and(|max| attempt >= max) {
                warn!(
                    "Giving up on {} after {} attempts; payment still pending",
                    reference, attempt
                );
                return Ok(result);
            }

            tokio::time::sleep(settings.interval).await;
        }
    }
}

pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::HttpClientError(e.to_string()))
}

pub(crate) fn parse_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url.trim_end_matches('/')).map_err(|e| {
        AppError::configuration(format!("Invalid provider base URL {:?}: {}", base_url, e))
    })?;
    if url.cannot_be_a_base() {
        return Err(AppError::configuration(format!(
            "Provider base URL {:?} cannot take a path",
            base_url
        )));
    }
    Ok(url)
}

/// Appends `segments` to `base`, percent-encoding each one so that `/`, `?`
/// or `%` inside a segment cannot reach another endpoint.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| {
            AppError::configuration(format!("Provider base URL {} cannot take a path", base))
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Sends the request and unwraps the `{status, message, data}` envelope both
/// providers answer with.
pub(crate) async fn send_envelope(provider: Provider, request: RequestBuilder) -> Result<Value> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = envelope_message(&body).unwrap_or_else(|| body.chars().take(200).collect());
        error!("{} request failed: {} - {}", provider, status, message);
        return Err(AppError::provider(provider.as_str(), status.as_u16(), message));
    }

    let envelope: Value = serde_json::from_str(&body).map_err(|e| {
        AppError::external_api(format!("{} returned an invalid response: {}", provider, e))
    })?;

    if envelope.get("status").and_then(Value::as_bool) == Some(false) {
        let message = envelope
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("request was not successful")
            .to_string();
        error!("{} rejected request: {}", provider, message);
        return Err(AppError::provider(provider.as_str(), status.as_u16(), message));
    }

    Ok(envelope)
}

fn envelope_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("message")?.as_str().map(ToString::to_string)
}

/// Accepts both JSON numbers and numeric strings (`"1000.00"`).
pub(crate) fn number_field(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn string_field(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(ToString::to_string)
}
