// services/payment_service.rs
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::payment::{InitializePayment, PaymentResult, Provider};
use crate::services::korapay_service::KoraPayService;
use crate::services::paystack_service::PaystackService;
use crate::services::provider::PaymentProvider;
use crate::services::reference::validate_reference;

/// Picks an adapter by name and forwards calls to it.
#[derive(Clone, Default)]
pub struct PaymentService {
    providers: HashMap<Provider, Arc<dyn PaymentProvider>>,
}

impl PaymentService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, adapter: Arc<dyn PaymentProvider>) -> Self {
        self.providers.insert(adapter.provider(), adapter);
        self
    }

    /// Registers Paystack, plus KoraPay when its key is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut service =
            Self::new().with_provider(Arc::new(PaystackService::from_config(config)?));
        info!("✅ Paystack adapter ready ({})", config.paystack_base_url);

        if config.korapay_enabled() {
            service = service.with_provider(Arc::new(KoraPayService::from_config(config)?));
            info!("✅ KoraPay adapter ready ({})", config.korapay_base_url);
        } else {
            warn!("KORAPAY_SECRET_KEY not set; KoraPay will be disabled");
        }

        Ok(service)
    }

    pub fn providers(&self) -> Vec<Provider> {
        Provider::ALL
            .into_iter()
            .filter(|p| self.providers.contains_key(p))
            .collect()
    }

    pub fn provider(&self, name: &str) -> Result<Arc<dyn PaymentProvider>> {
        let provider: Provider = name.parse()?;
        self.adapter(provider)
    }

    pub fn adapter(&self, provider: Provider) -> Result<Arc<dyn PaymentProvider>> {
        self.providers
            .get(&provider)
            .cloned()
            .ok_or_else(|| AppError::UnknownProvider(provider.to_string()))
    }

    /// Provider named by the reference prefix, Paystack otherwise.
    pub fn provider_for_reference(&self, reference: &str) -> Result<Arc<dyn PaymentProvider>> {
        let provider = Provider::from_reference(reference).unwrap_or(Provider::Paystack);
        self.adapter(provider)
    }

    pub async fn initialize_payment(
        &self,
        name: &str,
        request: &InitializePayment,
    ) -> Result<PaymentResult> {
        request.validate()?;
        self.provider(name)?.initialize(request).await
    }

    pub async fn verify_payment(&self, name: &str, reference: &str) -> Result<PaymentResult> {
        validate_reference(reference)?;
        self.provider(name)?.verify(reference).await
    }
}
