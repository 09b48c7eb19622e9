//! Ed25519 keys from a secret URI.
//!
//! Follows the Substrate conventions so addresses match other wallets: the
//! seed is the first half of `PBKDF2-HMAC-SHA512(entropy, "mnemonic" ++ password)`
//! and every hard junction replaces it with
//! `blake2_256(SCALE("Ed25519HDKD", seed, chain_code))`.

use bip39::{Language, Mnemonic};
use ed25519_zebra::{SigningKey, VerificationKey};
use hmac::Hmac;
use parity_scale_codec::Encode;
use pbkdf2::pbkdf2;
use sha2::Sha512;
use sp_crypto_hashing::blake2_256;

use crate::derive::Junction;
use crate::error::SignerError;

const HDKD_CONTEXT: &str = "Ed25519HDKD";
const PBKDF2_ROUNDS: u32 = 2048;

/// 32-byte chain code of a junction name.
///
/// Numeric names are encoded as a little-endian `u64`, anything else as a
/// SCALE string. Encodings longer than 32 bytes are hashed.
pub fn chain_code(name: &str) -> [u8; 32] {
    let encoded = match name.parse::<u64>() {
        Ok(index) => index.encode(),
        Err(_) => name.encode(),
    };

    let mut code = [0u8; 32];
    if encoded.len() > 32 {
        code.copy_from_slice(&blake2_256(&encoded));
    } else {
        code[..encoded.len()].copy_from_slice(&encoded);
    }
    code
}

/// Root seed for a normalized phrase (mnemonic or `0x` hex seed).
///
/// The password only applies to mnemonics.
fn root_seed(phrase: &str, password: Option<&str>) -> Result<[u8; 32], SignerError> {
    if let Some(hex_seed) = phrase.strip_prefix("0x") {
        let mut seed = [0u8; 32];
        hex::decode_to_slice(hex_seed, &mut seed)
            .map_err(|e| SignerError::InvalidSeed(e.to_string()))?;
        return Ok(seed);
    }

    let mnemonic = Mnemonic::parse_in(Language::English, phrase)
        .map_err(|e| SignerError::InvalidMnemonic(e.to_string()))?;
    let salt = format!("mnemonic{}", password.unwrap_or_default());
    let mut output = [0u8; 64];
    pbkdf2::<Hmac<Sha512>>(
        &mnemonic.to_entropy(),
        salt.as_bytes(),
        PBKDF2_ROUNDS,
        &mut output,
    )
    .map_err(|e| SignerError::Derivation(e.to_string()))?;

    let mut seed = [0u8; 32];
    seed.copy_from_slice(&output[..32]);
    Ok(seed)
}

/// Public key for `phrase` derived along `junctions`.
pub fn public_key(
    phrase: &str,
    junctions: &[Junction],
    password: Option<&str>,
) -> Result<[u8; 32], SignerError> {
    let mut seed = root_seed(phrase, password)?;

    for junction in junctions {
        match junction {
            Junction::Hard(name) => {
                seed = (HDKD_CONTEXT, seed, chain_code(name)).using_encoded(blake2_256);
            }
            Junction::Soft(name) => {
                return Err(SignerError::SoftJunction(
                    seedwiz_core::KeypairType::Ed25519,
                    name.clone(),
                ));
            }
        }
    }

    let signing_key = SigningKey::from(seed);
    let verification_key = VerificationKey::from(&signing_key);
    let mut public = [0u8; 32];
    public.copy_from_slice(verification_key.as_ref());
    Ok(public)
}
