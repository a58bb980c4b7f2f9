// handlers/payment_handlers.rs
use axum::{
    extract::{rejection::JsonRejection, Json, Path, Query, State},
    response::IntoResponse,
};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::errors::Result;
use crate::models::payment::{InitializePaymentRequest, PaymentResult, VerifyQuery};
use crate::services::reference::validate_reference;
use crate::state::AppState;

pub async fn root_handler() -> &'static str {
    "Payment Server Running!"
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "providers": state.payments.providers(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

pub async fn initialize_payment(
    State(state): State<AppState>,
    payload: std::result::Result<Json<InitializePaymentRequest>, JsonRejection>,
) -> Result<Json<PaymentResult>> {
    let Json(request) = payload.inspect_err(|e| error!("Rejected initialize request: {}", e))?;
    info!(
        "Received initialize request for {}: {} {}",
        request.provider, request.payment.amount, request.payment.currency
    );

    let result = state
        .payments
        .initialize_payment(&request.provider, &request.payment)
        .await
        .inspect_err(|e| error!("Failed to initialize {} payment: {}", request.provider, e))?;

    info!("Initialized payment {}", result.reference);
    Ok(Json(result))
}

pub async fn verify_payment(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Query(query): Query<VerifyQuery>,
) -> Result<impl IntoResponse> {
    validate_reference(&reference)
        .inspect_err(|e| error!("Rejected verification request: {}", e))?;

    let adapter = match query.provider.as_deref() {
        Some(name) => state.payments.provider(name)?,
        None => state.payments.provider_for_reference(&reference)?,
    };

    let result = adapter
        .verify(&reference)
        .await
        .inspect_err(|e| error!("Error verifying payment for reference {}: {}", reference, e))?;

    info!("{}", result.status);
    let message = result
        .message
        .clone()
        .unwrap_or_else(|| "Verification successful".to_string());

    if result.status.is_settled() {
        info!("Payment verification completed.");
        Ok(Json(json!({
            "status_of_payment": result.status,
            "message": message,
        })))
    } else {
        info!("Payment still pending.");
        Ok(Json(json!({
            "status": "pending",
            "message": message,
        })))
    }
}
