pub mod payment_handlers;
pub mod webhook_handlers;
