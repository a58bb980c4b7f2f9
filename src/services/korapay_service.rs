// services/korapay_service.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::payment::{
    Customer, InitializePayment, PaymentResult, PaymentStatus, Provider,
};
use crate::services::provider::{
    build_client, endpoint, number_field, parse_base_url, send_envelope, string_field,
    PaymentProvider, PollSettings,
};
use crate::services::reference::generate_payment_reference;

#[derive(Debug, Serialize)]
pub struct KoraPayCustomer<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub struct KoraPayChargeRequest<'a> {
    /// Major currency units.
    pub amount: f64,
    pub currency: &'a str,
    pub reference: &'a str,
    pub customer: KoraPayCustomer<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct KoraPayService {
    secret_key: String,
    base_url: Url,
    client: Client,
    poll: PollSettings,
}

impl KoraPayService {
    pub fn new(
        secret_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
        poll: PollSettings,
    ) -> Result<Self> {
        Ok(KoraPayService {
            secret_key: secret_key.into(),
            base_url: parse_base_url(&base_url.into())?,
            client: build_client(timeout)?,
            poll,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let secret_key = config
            .korapay_secret_key
            .clone()
            .ok_or_else(|| AppError::configuration("KORAPAY_SECRET_KEY must be set"))?;

        Self::new(
            secret_key,
            config.korapay_base_url.clone(),
            config.http_timeout(),
            PollSettings::from_config(config),
        )
    }

    fn parse_charge(envelope: Value) -> PaymentResult {
        let data = envelope.get("data").cloned().unwrap_or(Value::Null);

        PaymentResult {
            provider: Provider::KoraPay,
            status: PaymentStatus::from_field(data.get("status")),
            reference: string_field(data.get("reference")).unwrap_or_default(),
            amount: number_field(data.get("amount")),
            currency: string_field(data.get("currency")),
            fee: number_field(data.get("fee")),
            customer: Customer::from_value(data.get("customer")),
            checkout_url: None,
            message: string_field(envelope.get("message")),
            raw: envelope,
        }
    }
}

#[async_trait]
impl PaymentProvider for KoraPayService {
    fn provider(&self) -> Provider {
        Provider::KoraPay
    }

    fn poll_settings(&self) -> PollSettings {
        self.poll
    }

    async fn initialize(&self, request: &InitializePayment) -> Result<PaymentResult> {
        let reference = generate_payment_reference(Provider::KoraPay);
        info!(
            "KoraPay: initializing {} {} for {} ({})",
            request.amount, request.currency, request.email, reference
        );

        let url = endpoint(&self.base_url, &["charges", "initialize"])?;
        let metadata = (!request.metadata.is_empty())
            .then(|| serde_json::to_value(&request.metadata))
            .transpose()?;

        let payload = KoraPayChargeRequest {
            amount: request.amount,
            currency: &request.currency,
            reference: &reference,
            customer: KoraPayCustomer {
                name: request.customer_name.as_deref().unwrap_or(&request.email),
                email: &request.email,
            },
            metadata,
        };

        let envelope = send_envelope(
            Provider::KoraPay,
            self.client
                .post(url)
                .header(header::AUTHORIZATION, format!("Bearer {}", self.secret_key))
                .header(header::CONTENT_TYPE, "application/json")
                .json(&payload),
        )
        .await?;
        debug!("KoraPay initialize response: {}", envelope);

        let data = envelope.get("data").cloned().unwrap_or(Value::Null);
        Ok(PaymentResult {
            provider: Provider::KoraPay,
            status: PaymentStatus::Pending,
            reference: string_field(data.get("reference")).unwrap_or(reference),
            amount: Some(request.amount),
            currency: Some(request.currency.clone()),
            fee: None,
            customer: Some(Customer {
                email: Some(request.email.clone()),
                name: request.customer_name.clone(),
            }),
            checkout_url: string_field(data.get("checkout_url")),
            message: string_field(envelope.get("message")),
            raw: envelope,
        })
    }

    async fn fetch(&self, reference: &str) -> Result<PaymentResult> {
        let url = endpoint(&self.base_url, &["charges", reference])?;

        let envelope = send_envelope(
            Provider::KoraPay,
            self.client
                .get(url)
                .header(header::AUTHORIZATION, format!("Bearer {}", self.secret_key)),
        )
        .await?;
        debug!("KoraPay charge query: {}", envelope);

        Ok(Self::parse_charge(envelope))
    }
}
