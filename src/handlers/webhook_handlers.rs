// handlers/webhook_handlers.rs
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Json, State},
    http::HeaderMap,
};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::errors::{AppError, Result};
use crate::models::payment::Provider;
use crate::models::webhook::WebhookEvent;
use crate::services::payment_service::PaymentService;
use crate::services::reference::validate_reference;
use crate::services::signature::{verify_signature, PAYSTACK_SIGNATURE_HEADER};
use crate::state::AppState;

pub async fn paystack_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>> {
    let signature = match headers.get(PAYSTACK_SIGNATURE_HEADER) {
        Some(value) => Some(value.to_str().map_err(|_| {
            warn!("Rejected webhook: signature header is not valid text");
            AppError::InvalidSignature
        })?),
        None => None,
    };

    verify_signature(state.webhook_secret(), &body, signature)
        .inspect_err(|e| warn!("Rejected webhook: {}", e))?;

    let event: WebhookEvent = serde_json::from_slice(&body).map_err(|e| {
        warn!("Webhook body is not valid JSON: {}", e);
        AppError::from(e)
    })?;
    info!("Received webhook data: {}", String::from_utf8_lossy(&body));

    if !event.is_charge_success() {
        warn!("Received unknown event type: {:?}", event.event);
        return Ok(Json(json!({ "status": "ignored" })));
    }

    let charge = event.charge();
    let payment_id = charge.id.as_ref().map(ToString::to_string).unwrap_or_default();
    let amount = charge.amount.as_ref().map(ToString::to_string).unwrap_or_default();
    info!(
        "Received successful payment {} of {} {}. Status: {}",
        payment_id,
        amount,
        charge.currency.as_deref().unwrap_or_default(),
        charge.status.as_deref().unwrap_or_default(),
    );

    match charge.reference {
        Some(reference) => {
            tokio::spawn(confirm_charge(state.payments.clone(), reference));
        }
        None => warn!("charge.success event carried no reference; skipping confirmation"),
    }

    Ok(Json(json!({ "status": "success" })))
}

/// Re-checks a webhook-reported charge against the Paystack API.
async fn confirm_charge(payments: Arc<PaymentService>, reference: String) {
    let result = async {
        validate_reference(&reference)?;
        payments.adapter(Provider::Paystack)?.verify(&reference).await
    }
    .await;

    match result {
        Ok(result) => info!(
            "Confirmed {} with Paystack: status {}",
            reference, result.status
        ),
        Err(e) => error!("Could not confirm {} with Paystack: {}", reference, e),
    }
}
