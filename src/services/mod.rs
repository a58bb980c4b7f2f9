pub mod korapay_service;
pub mod payment_service;
pub mod paystack_service;
pub mod provider;
pub mod reference;
pub mod signature;
