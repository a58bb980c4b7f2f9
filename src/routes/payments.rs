use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{payment_handlers, webhook_handlers};
use crate::state::AppState;

pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(payment_handlers::root_handler))
        .route("/health", get(payment_handlers::health_check))
        .route("/initialize_payment", post(payment_handlers::initialize_payment))
        .route("/verify_payment/:reference", get(payment_handlers::verify_payment))
        .route("/webhook", post(webhook_handlers::paystack_webhook))
}
