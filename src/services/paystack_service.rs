// services/paystack_service.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::payment::{
    Customer, InitializePayment, PaymentResult, PaymentStatus, Provider,
};
use crate::services::provider::{
    build_client, endpoint, number_field, parse_base_url, send_envelope, string_field,
    PaymentProvider, PollSettings,
};
use crate::services::reference::generate_payment_reference;

#[derive(Debug, Serialize)]
pub struct PaystackInitializeRequest<'a> {
    /// Minor currency units (kobo for NGN).
    pub amount: i64,
    pub currency: &'a str,
    pub email: &'a str,
    pub reference: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct PaystackService {
    secret_key: String,
    base_url: Url,
    client: Client,
    poll: PollSettings,
}

impl PaystackService {
    pub fn new(
        secret_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
        poll: PollSettings,
    ) -> Result<Self> {
        Ok(PaystackService {
            secret_key: secret_key.into(),
            base_url: parse_base_url(&base_url.into())?,
            client: build_client(timeout)?,
            poll,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.paystack_secret_key.clone(),
            config.paystack_base_url.clone(),
            config.http_timeout(),
            PollSettings::from_config(config),
        )
    }

    fn to_minor_units(amount: f64) -> i64 {
        (amount * 100.0).round() as i64
    }

    fn parse_transaction(envelope: Value) -> PaymentResult {
        let data = envelope.get("data").cloned().unwrap_or(Value::Null);
        let minor = |key: &str| number_field(data.get(key)).map(|v| v / 100.0);

        PaymentResult {
            provider: Provider::Paystack,
            status: PaymentStatus::from_field(data.get("status")),
            reference: string_field(data.get("reference")).unwrap_or_default(),
            amount: minor("amount"),
            currency: string_field(data.get("currency")),
            fee: minor("fees"),
            customer: Customer::from_value(data.get("customer")),
            checkout_url: None,
            message: string_field(envelope.get("message")),
            raw: envelope,
        }
    }
}

#[async_trait]
impl PaymentProvider for PaystackService {
    fn provider(&self) -> Provider {
        Provider::Paystack
    }

    fn poll_settings(&self) -> PollSettings {
        self.poll
    }

    async fn initialize(&self, request: &InitializePayment) -> Result<PaymentResult> {
        let reference = generate_payment_reference(Provider::Paystack);
        info!(
            "Paystack: initializing {} {} for {} ({})",
            request.amount, request.currency, request.email, reference
        );

        let url = endpoint(&self.base_url, &["transaction", "initialize"])?;
        let metadata = (!request.metadata.is_empty())
            .then(|| serde_json::to_value(&request.metadata))
            .transpose()?;

        let payload = PaystackInitializeRequest {
            amount: Self::to_minor_units(request.amount),
            currency: &request.currency,
            email: &request.email,
            reference: &reference,
            metadata,
        };

        let envelope = send_envelope(
            Provider::Paystack,
            self.client
                .post(url)
                .header(header::AUTHORIZATION, format!("Bearer {}", self.secret_key))
                .header(header::CONTENT_TYPE, "application/json")
                .json(&payload),
        )
        .await?;
        debug!("Paystack initialize response: {}", envelope);

        let data = envelope.get("data").cloned().unwrap_or(Value::Null);
        Ok(PaymentResult {
            provider: Provider::Paystack,
            status: PaymentStatus::Pending,
            reference: string_field(data.get("reference")).unwrap_or(reference),
            amount: Some(request.amount),
            currency: Some(request.currency.clone()),
            fee: None,
            customer: Some(Customer {
                email: Some(request.email.clone()),
                name: request.customer_name.clone(),
            }),
            checkout_url: string_field(data.get("authorization_url")),
            message: string_field(envelope.get("message")),
            raw: envelope,
        })
    }

    async fn fetch(&self, reference: &str) -> Result<PaymentResult> {
        let url = endpoint(&self.base_url, &["transaction", "verify", reference])?;

        let envelope = send_envelope(
            Provider::Paystack,
            self.client
                .get(url)
                .header(header::AUTHORIZATION, format!("Bearer {}", self.secret_key))
                .header(header::CONTENT_TYPE, "application/json"),
        )
        .await?;
        debug!("Verification Info: {}", envelope);

        Ok(Self::parse_transaction(envelope))
    }
}
