//! SS58 address encoding utilities.

use std::str::FromStr;

use seedwiz_core::Network;
use subxt::utils::AccountId32;

use crate::error::SignerError;

const SS58_PREFIX: &[u8] = b"SS58PRE";

/// Prefix of addresses that are not bound to a chain.
pub const GENERIC_SS58_PREFIX: u16 = 42;

/// Highest prefix the SS58 format can carry.
pub const MAX_SS58_PREFIX: u16 = 16383;

/// Encode an AccountId32 with a specific SS58 prefix.
///
/// Prefixes above [`MAX_SS58_PREFIX`] have no encoding and are rejected.
pub fn encode_ss58(account: &AccountId32, prefix: u16) -> Result<String, SignerError> {
    let account_bytes: &[u8; 32] = account.as_ref();

    let mut payload = Vec::with_capacity(36);

    if prefix < 64 {
        payload.push(prefix as u8);
    } else if prefix <= MAX_SS58_PREFIX {
        // Two-byte encoding for larger prefixes
        let first = ((prefix & 0x00FC) >> 2) as u8 | 0x40;
        let second = ((prefix >> 8) as u8) | ((prefix & 0x03) << 6) as u8;
        payload.push(first);
        payload.push(second);
    } else {
        return Err(SignerError::UnsupportedPrefix(prefix));
    }

    payload.extend_from_slice(account_bytes);

    // Checksum is the first 2 bytes of blake2b-512 over "SS58PRE" || payload
    let mut checksum_input = Vec::with_capacity(SS58_PREFIX.len() + payload.len());
    checksum_input.extend_from_slice(SS58_PREFIX);
    checksum_input.extend_from_slice(&payload);

    let hash = sp_crypto_hashing::blake2_512(&checksum_input);
    payload.push(hash[0]);
    payload.push(hash[1]);

    Ok(bs58::encode(payload).into_string())
}

/// Re-encode an address (any prefix) for the given network.
pub fn format_for_network(address: &str, network: Network) -> Result<String, SignerError> {
    let account = AccountId32::from_str(address)
        .map_err(|e| SignerError::InvalidAddress(format!("{}: {:?}", address, e)))?;
    encode_ss58(&account, network.ss58_format())
}
