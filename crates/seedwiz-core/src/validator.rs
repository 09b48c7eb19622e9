//! Boundary to the service that turns a secret URI into an address.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::types::{KeypairType, ValidatedSeed};

/// Why a secret could not be validated.
///
/// The form never shows these details; they only end up in the log.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid secret: {0}")]
    InvalidSecret(String),

    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("Validation service unavailable: {0}")]
    Unavailable(String),
}

/// Service that validates a secret URI for a keypair type.
#[async_trait]
pub trait SeedValidator: Send + Sync {
    async fn validate_seed(
        &self,
        suri: &str,
        keypair_type: KeypairType,
    ) -> Result<ValidatedSeed, ValidationError>;
}

/// A validation round-trip issued by the form.
#[derive(Clone, PartialEq, Eq)]
pub struct ValidationRequest {
    /// Monotonic token; only the latest one is applied.
    pub id: u64,
    pub suri: String,
    pub keypair_type: KeypairType,
}

impl fmt::Debug for ValidationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRequest")
            .field("id", &self.id)
            .field("suri", &"<redacted>")
            .field("keypair_type", &self.keypair_type)
            .finish()
    }
}

/// Outcome of a request, tagged with the request token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResponse {
    pub id: u64,
    pub result: Result<ValidatedSeed, ValidationError>,
}

impl ValidationRequest {
    /// Submit the request to a validator.
    pub async fn run(self, validator: &dyn SeedValidator) -> ValidationResponse {
        tracing::debug!(id = self.id, keypair_type = %self.keypair_type, "Validating secret");
        let result = validator.validate_seed(&self.suri, self.keypair_type).await;
        if let Err(e) = &result {
            tracing::debug!(id = self.id, "Validation rejected: {}", e);
        }
        ValidationResponse {
            id: self.id,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedValidator;

    #[async_trait]
    impl SeedValidator for FixedValidator {
        async fn validate_seed(
            &self,
            suri: &str,
            keypair_type: KeypairType,
        ) -> Result<ValidatedSeed, ValidationError> {
            if suri.starts_with("good") && keypair_type == KeypairType::Sr25519 {
                Ok(ValidatedSeed {
                    address: "5Good".to_string(),
                    suri: suri.to_string(),
                })
            } else {
                Err(ValidationError::InvalidSecret("nope".to_string()))
            }
        }
    }

    #[tokio::test]
    async fn test_run_keeps_request_token() {
        let request = ValidationRequest {
            id: 7,
            suri: "good seed".to_string(),
            keypair_type: KeypairType::Sr25519,
        };
        let response = request.run(&FixedValidator).await;
        assert_eq!(response.id, 7);
        assert_eq!(response.result.unwrap().address, "5Good");
    }

    #[tokio::test]
    async fn test_run_passes_keypair_type() {
        let request = ValidationRequest {
            id: 1,
            suri: "good seed".to_string(),
            keypair_type: KeypairType::Ed25519,
        };
        let response = request.run(&FixedValidator).await;
        assert!(matches!(
            response.result,
            Err(ValidationError::InvalidSecret(_))
        ));
    }

    #[test]
    fn test_request_debug_redacts_suri() {
        let request = ValidationRequest {
            id: 1,
            suri: "bottom drive obey lake".to_string(),
            keypair_type: KeypairType::Sr25519,
        };
        assert!(!format!("{:?}", request).contains("bottom"));
    }

    #[test]
    fn test_error_display() {
        let e = ValidationError::InvalidPath("soft junction".to_string());
        assert_eq!(e.to_string(), "Invalid derivation path: soft junction");
    }
}
