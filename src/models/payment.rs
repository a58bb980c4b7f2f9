use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Paystack,
    #[serde(rename = "korapay")]
    KoraPay,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Paystack, Provider::KoraPay];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Paystack => "paystack",
            Provider::KoraPay => "korapay",
        }
    }

    /// Reads the `{PROVIDER}-` prefix that generated references carry.
    pub fn from_reference(reference: &str) -> Option<Provider> {
        let prefix = reference.split('-').next()?;
        prefix.parse().ok()
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paystack" => Ok(Provider::Paystack),
            "korapay" => Ok(Provider::KoraPay),
            other => Err(AppError::UnknownProvider(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Success,
    Pending,
    Failed,
    Abandoned,
    Reversed,
    /// Provider omitted the status field.
    Unknown,
    Other(String),
}

impl PaymentStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, PaymentStatus::Pending)
    }

    /// A final answer from the provider, as opposed to pending or missing.
    pub fn is_settled(&self) -> bool {
        !matches!(self, PaymentStatus::Pending | PaymentStatus::Unknown)
    }

    pub fn from_field(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some(s) => PaymentStatus::from(s.to_string()),
            None => PaymentStatus::Unknown,
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "success" => PaymentStatus::Success,
            "pending" => PaymentStatus::Pending,
            "failed" => PaymentStatus::Failed,
            "abandoned" => PaymentStatus::Abandoned,
            "reversed" => PaymentStatus::Reversed,
            "unknown" | "" => PaymentStatus::Unknown,
            _ => PaymentStatus::Other(s),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Success => f.write_str("success"),
            PaymentStatus::Pending => f.write_str("pending"),
            PaymentStatus::Failed => f.write_str("failed"),
            PaymentStatus::Abandoned => f.write_str("abandoned"),
            PaymentStatus::Reversed => f.write_str("reversed"),
            PaymentStatus::Unknown => f.write_str("unknown"),
            PaymentStatus::Other(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub email: Option<String>,
    pub name: Option<String>,
}

impl Customer {
    pub fn from_value(value: Option<&Value>) -> Option<Self> {
        let value = value?.as_object()?;
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(ToString::to_string);

        let name = text("name").or_else(|| {
            let parts: Vec<String> = [text("first_name"), text("last_name")]
                .into_iter()
                .flatten()
                .filter(|s| !s.is_empty())
                .collect();
            (!parts.is_empty()).then(|| parts.join(" "))
        });

        Some(Customer {
            email: text("email"),
            name,
        })
    }
}

/// What callers hand to a provider to open a transaction.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InitializePayment {
    #[validate(range(min = 0.01))]
    pub amount: f64,
    #[validate(length(equal = 3))]
    pub currency: String,
    #[validate(email)]
    pub email: String,
    pub customer_name: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl InitializePayment {
    pub fn new(amount: f64, currency: impl Into<String>, email: impl Into<String>) -> Self {
        InitializePayment {
            amount,
            currency: currency.into(),
            email: email.into(),
            customer_name: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_customer_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Provider response normalized across Paystack and KoraPay. Amounts are in
/// major currency units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResult {
    pub provider: Provider,
    pub status: PaymentStatus,
    pub reference: String,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub fee: Option<f64>,
    pub customer: Option<Customer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,
    pub message: Option<String>,
    pub raw: Value,
}

// Payment Request (HTTP body for /initialize_payment)
#[derive(Debug, Deserialize)]
pub struct InitializePaymentRequest {
    pub provider: String,
    #[serde(flatten)]
    pub payment: InitializePayment,
}

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub provider: Option<String>,
}
