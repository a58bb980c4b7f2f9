use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::services::payment_service::PaymentService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub payments: Arc<PaymentService>,
}

impl AppState {
    pub fn new(config: AppConfig, payments: PaymentService) -> Self {
        AppState {
            config: Arc::new(config),
            payments: Arc::new(payments),
        }
    }

    pub fn from_config(config: AppConfig) -> Result<Self> {
        let payments = PaymentService::from_config(&config)?;
        Ok(Self::new(config, payments))
    }

    /// Secret Paystack signs webhooks with.
    pub fn webhook_secret(&self) -> &str {
        &self.config.paystack_secret_key
    }
}
