pub mod payment;
pub mod webhook;
