use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CHARGE_SUCCESS: &str = "charge.success";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl WebhookEvent {
    pub fn is_charge_success(&self) -> bool {
        self.event.as_deref() == Some(CHARGE_SUCCESS)
    }

    pub fn charge(&self) -> ChargeData {
        serde_json::from_value(self.data.clone()).unwrap_or_default()
    }
}

/// Fields of a `charge.success` payload that get logged and re-verified.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChargeData {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
