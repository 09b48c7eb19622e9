//! Secret URI checks and account derivation.
//!
//! A secret URI is `<phrase><path>[///<password>]` where the phrase is a
//! BIP-39 mnemonic or a `0x` hex seed and the path is a list of `//hard` and
//! `/soft` junctions.

use std::str::FromStr;

use bip39::{Language, Mnemonic};
use seedwiz_core::{KeypairType, ValidatedSeed};
use subxt::utils::AccountId32;
use subxt_signer::{SecretUri, ecdsa, sr25519};

use crate::ed25519;
use crate::error::SignerError;
use crate::ss58::{GENERIC_SS58_PREFIX, encode_ss58};

/// Word counts accepted for a mnemonic.
pub const MNEMONIC_WORD_COUNTS: &[usize] = &[12, 15, 18, 21, 24];

/// The three parts of a secret URI, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretParts<'a> {
    pub phrase: &'a str,
    pub path: &'a str,
    pub password: Option<&'a str>,
}

/// Split a secret URI without checking any part.
pub fn split_suri(suri: &str) -> SecretParts<'_> {
    let (body, password) = match suri.split_once("///") {
        Some((body, password)) => (body, Some(password)),
        None => (suri, None),
    };
    let path_start = body.find('/').unwrap_or(body.len());
    SecretParts {
        phrase: &body[..path_start],
        path: &body[path_start..],
        password,
    }
}

/// A single derivation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Junction {
    Hard(String),
    Soft(String),
}

/// Parse a derivation path such as `//polkadot//0/1`.
pub fn parse_path(path: &str) -> Result<Vec<Junction>, SignerError> {
    let mut junctions = Vec::new();
    let mut rest = path;

    while !rest.is_empty() {
        let (hard, tail) = if let Some(tail) = rest.strip_prefix("//") {
            (true, tail)
        } else if let Some(tail) = rest.strip_prefix('/') {
            (false, tail)
        } else {
            return Err(SignerError::InvalidPath(format!(
                "expected '/' or '//' before '{}'",
                rest
            )));
        };

        let end = tail.find('/').unwrap_or(tail.len());
        let name = &tail[..end];
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(SignerError::InvalidPath(format!(
                "empty or malformed junction in '{}'",
                path
            )));
        }

        junctions.push(if hard {
            Junction::Hard(name.to_string())
        } else {
            Junction::Soft(name.to_string())
        });
        rest = &tail[end..];
    }

    Ok(junctions)
}

/// Check the phrase and return it with whitespace collapsed.
pub fn normalize_phrase(phrase: &str) -> Result<String, SignerError> {
    let trimmed = phrase.trim();
    if trimmed.is_empty() {
        return Err(SignerError::MissingPhrase);
    }

    if let Some(hex_seed) = trimmed.strip_prefix("0x") {
        let bytes = hex::decode(hex_seed).map_err(|e| SignerError::InvalidSeed(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(SignerError::InvalidSeed(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        return Ok(trimmed.to_string());
    }

    let words: Vec<&str> = trimmed.split_whitespace().collect();
    if !MNEMONIC_WORD_COUNTS.contains(&words.len()) {
        return Err(SignerError::WordCount(words.len()));
    }

    let joined = words.join(" ");
    Mnemonic::parse_in(Language::English, joined.as_str())
        .map_err(|e| SignerError::InvalidMnemonic(e.to_string()))?;
    Ok(joined)
}

/// Derive the account id for a secret URI.
///
/// Returns the normalized URI along with the account.
pub fn derive_account(
    suri: &str,
    keypair_type: KeypairType,
) -> Result<(String, AccountId32), SignerError> {
    let parts = split_suri(suri);
    let phrase = normalize_phrase(parts.phrase)?;

    let junctions = parse_path(parts.path)?;
    for junction in &junctions {
        if let Junction::Soft(name) = junction
            && !keypair_type.supports_soft_derivation()
        {
            return Err(SignerError::SoftJunction(keypair_type, name.clone()));
        }
    }

    let normalized = match parts.password {
        Some(password) => format!("{}{}///{}", phrase, parts.path, password),
        None => format!("{}{}", phrase, parts.path),
    };
    let secret_uri = || {
        SecretUri::from_str(&normalized).map_err(|e| SignerError::Derivation(e.to_string()))
    };

    let account = match keypair_type {
        KeypairType::Sr25519 => {
            let pair = sr25519::Keypair::from_uri(&secret_uri()?)
                .map_err(|e| SignerError::Derivation(e.to_string()))?;
            AccountId32(pair.public_key().0)
        }
        KeypairType::Ed25519 => {
            AccountId32(ed25519::public_key(&phrase, &junctions, parts.password)?)
        }
        KeypairType::Ecdsa => {
            // Account id of an ecdsa key is the hash of the compressed public key.
            let pair = ecdsa::Keypair::from_uri(&secret_uri()?)
                .map_err(|e| SignerError::Derivation(e.to_string()))?;
            AccountId32(sp_crypto_hashing::blake2_256(&pair.public_key().0))
        }
    };

    Ok((normalized, account))
}

/// Derive the generic-prefix address for a secret URI.
pub fn derive_address(suri: &str, keypair_type: KeypairType) -> Result<ValidatedSeed, SignerError> {
    let (suri, account) = derive_account(suri, keypair_type)?;
    Ok(ValidatedSeed {
        address: encode_ss58(&account, GENERIC_SS58_PREFIX)?,
        suri,
    })
}
