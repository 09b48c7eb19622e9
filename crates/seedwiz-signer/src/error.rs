//! Error types for key derivation.

use seedwiz_core::{KeypairType, ValidationError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignerError {
    #[error("Missing mnemonic phrase")]
    MissingPhrase,

    #[error("Mnemonic must have 12, 15, 18, 21 or 24 words, got {0}")]
    WordCount(usize),

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Invalid hex seed: {0}")]
    InvalidSeed(String),

    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("{0} keys only support hard derivation, found soft junction '/{1}'")]
    SoftJunction(KeypairType, String),

    #[error("Key derivation failed: {0}")]
    Derivation(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("SS58 prefix {0} is out of range")]
    UnsupportedPrefix(u16),
}

impl From<SignerError> for ValidationError {
    fn from(err: SignerError) -> Self {
        match err {
            SignerError::InvalidPath(_) | SignerError::SoftJunction(..) => {
                ValidationError::InvalidPath(err.to_string())
            }
            _ => ValidationError::InvalidSecret(err.to_string()),
        }
    }
}
