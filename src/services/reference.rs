// services/reference.rs
use chrono::Utc;
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::payment::Provider;

const MAX_REFERENCE_LEN: usize = 100;

/// `{PROVIDER}-{yyyymmddHHMMSS}-{uid}`, generated before the provider is
/// contacted.
pub fn generate_payment_reference(provider: Provider) -> String {
    let timestamp = Utc::now().format("%Y%m%d%H%M%S");
    let unique_id = Uuid::new_v4().simple();
    format!("{}-{}-{}", provider.as_str().to_uppercase(), timestamp, unique_id)
}

/// References end up as a path segment of the provider URL, so only the
/// characters providers issue references with are accepted.
pub fn validate_reference(reference: &str) -> Result<()> {
    if reference.is_empty() {
        return Err(AppError::invalid_data("reference must not be empty"));
    }
    if reference.len() > MAX_REFERENCE_LEN {
        return Err(AppError::invalid_data(format!(
            "reference must be at most {} characters",
            MAX_REFERENCE_LEN
        )));
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '=');
    if !reference.chars().all(allowed) || reference.chars().all(|c| c == '.') {
        return Err(AppError::invalid_data(format!("invalid reference: {:?}", reference)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_reference_shape(reference: &str, prefix: &str) {
        let parts: Vec<&str> = reference.splitn(3, '-').collect();
        assert_eq!(parts.len(), 3, "reference {reference} has three parts");
        assert_eq!(parts[0], prefix);
        assert_eq!(parts[1].len(), 14);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert!(!parts[2].is_empty());
        assert!(parts[2].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn reference_matches_provider_timestamp_uid() {
        assert_reference_shape(&generate_payment_reference(Provider::Paystack), "PAYSTACK");
        assert_reference_shape(&generate_payment_reference(Provider::KoraPay), "KORAPAY");
    }

    #[test]
    fn references_are_unique() {
        let refs: HashSet<String> = (0..500)
            .map(|_| generate_payment_reference(Provider::Paystack))
            .collect();
        assert_eq!(refs.len(), 500);
    }

    #[test]
    fn reference_round_trips_to_provider() {
        let reference = generate_payment_reference(Provider::KoraPay);
        assert_eq!(Provider::from_reference(&reference), Some(Provider::KoraPay));
    }

    #[test]
    fn generated_and_provider_references_are_valid() {
        assert!(validate_reference(&generate_payment_reference(Provider::Paystack)).is_ok());
        assert!(validate_reference("T685312322670591").is_ok());
        assert!(validate_reference("order_12.v2=a").is_ok());
    }

    #[test]
    fn path_altering_references_are_rejected() {
        for reference in ["", "..", ".", "../../balance", "a/b", "x?y=1", "a%2Fb", "a b", "ref#frag"] {
            assert!(
                matches!(validate_reference(reference), Err(AppError::ValidationError(_))),
                "{reference:?} should be rejected"
            );
        }
        assert!(validate_reference(&"a".repeat(101)).is_err());
    }
}
