//! Local implementation of the seed validation service.

use async_trait::async_trait;
use seedwiz_core::{KeypairType, SeedValidator, ValidatedSeed, ValidationError};

use crate::derive::derive_address;

/// Validates secret URIs by deriving the keypair locally.
///
/// Derivation stretches the mnemonic with PBKDF2, so it runs on the blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstrateSeedValidator;

impl SubstrateSeedValidator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SeedValidator for SubstrateSeedValidator {
    async fn validate_seed(
        &self,
        suri: &str,
        keypair_type: KeypairType,
    ) -> Result<ValidatedSeed, ValidationError> {
        let suri = suri.to_string();
        let result = tokio::task::spawn_blocking(move || derive_address(&suri, keypair_type))
            .await
            .map_err(|e| ValidationError::Unavailable(e.to_string()))?;

        match result {
            Ok(validated) => {
                tracing::debug!("Derived {} address {}", keypair_type, validated.address);
                Ok(validated)
            }
            Err(e) => {
                tracing::info!("Secret rejected for {}: {}", keypair_type, e);
                Err(e.into())
            }
        }
    }
}
