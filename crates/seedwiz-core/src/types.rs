//! Core domain types for importing an account from a seed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported networks - exhaustive match required (no default case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    Polkadot,
    Kusama,
    Westend,
    Paseo,
}

impl Network {
    pub fn token_symbol(&self) -> &'static str {
        match self {
            Network::Polkadot => "DOT",
            Network::Kusama => "KSM",
            Network::Westend => "WND",
            Network::Paseo => "PAS",
        }
    }

    pub fn ss58_format(&self) -> u16 {
        match self {
            Network::Polkadot => 0,
            Network::Kusama => 2,
            Network::Westend => 42,
            Network::Paseo => 0,
        }
    }

    /// Genesis hash of the relay chain, hex encoded with `0x` prefix.
    pub fn genesis_hash(&self) -> &'static str {
        match self {
            Network::Polkadot => {
                "0x91b171bb158e2d3848fa23a9f1c25182fb8e20313b2c1eb49219da7a70ce90c3"
            }
            Network::Kusama => "0xb0a8d493285c2df73290dfb7e61f870f17b41801197a149ca93654499ea3dafe",
            Network::Westend => {
                "0xe143f23803ac50e8f6f8e62695d1ce9e4e1d68aa36c1cd2cfd15340213f3423e"
            }
            Network::Paseo => "0x77afd6190f1554ad45fd0d31aee62aacc33c6db0ea801129acb813f913e0764f",
        }
    }

    /// Look up a network by its genesis hash. Case-insensitive.
    pub fn from_genesis_hash(hash: &str) -> Option<Network> {
        Network::all()
            .iter()
            .find(|n| n.genesis_hash().eq_ignore_ascii_case(hash))
            .copied()
    }

    /// Returns all known networks.
    pub fn all() -> &'static [Network] {
        &[
            Network::Polkadot,
            Network::Kusama,
            Network::Westend,
            Network::Paseo,
        ]
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Polkadot => write!(f, "Polkadot"),
            Network::Kusama => write!(f, "Kusama"),
            Network::Westend => write!(f, "Westend"),
            Network::Paseo => write!(f, "Paseo"),
        }
    }
}

/// Signature scheme used to derive the keypair from a secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeypairType {
    Ed25519,
    #[default]
    Sr25519,
    Ecdsa,
}

impl KeypairType {
    pub fn all() -> &'static [KeypairType] {
        &[KeypairType::Sr25519, KeypairType::Ed25519, KeypairType::Ecdsa]
    }

    /// Identifier used on the wire and in dropdown values.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeypairType::Ed25519 => "ed25519",
            KeypairType::Sr25519 => "sr25519",
            KeypairType::Ecdsa => "ecdsa",
        }
    }

    /// Get display label for UI.
    pub fn label(&self) -> &'static str {
        match self {
            KeypairType::Ed25519 => "Edwards (ed25519)",
            KeypairType::Sr25519 => "Schnorrkel (sr25519, recommended)",
            KeypairType::Ecdsa => "ECDSA (secp256k1)",
        }
    }

    /// Whether soft (`/`) junctions can be derived with this scheme.
    pub fn supports_soft_derivation(&self) -> bool {
        matches!(self, KeypairType::Sr25519)
    }
}

impl fmt::Display for KeypairType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a known keypair type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown keypair type '{0}'")]
pub struct UnknownKeypairType(pub String);

impl FromStr for KeypairType {
    type Err = UnknownKeypairType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeypairType::all()
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownKeypairType(s.to_string()))
    }
}

/// A selectable entry in the network dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkOption {
    pub text: String,
    /// Genesis hash, or empty for "any network".
    pub value: String,
}

/// Label of the implicit "any network" entry.
pub const ANY_NETWORK_LABEL: &str = "Allow use on any chain";

/// Network options offered for a new account, "any network" first.
pub fn network_options() -> Vec<NetworkOption> {
    let mut options = vec![NetworkOption {
        text: ANY_NETWORK_LABEL.to_string(),
        value: String::new(),
    }];
    options.extend(Network::all().iter().map(|n| NetworkOption {
        text: n.to_string(),
        value: n.genesis_hash().to_string(),
    }));
    options
}

/// Result of a successful validation round-trip.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedSeed {
    /// SS58 address with the generic substrate prefix.
    pub address: String,
    /// The secret URI that was validated.
    pub suri: String,
}

impl fmt::Debug for ValidatedSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedSeed")
            .field("address", &self.address)
            .field("suri", &"<redacted>")
            .finish()
    }
}

/// Candidate account forwarded to the wizard.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub address: String,
    pub suri: String,
    /// Genesis hash of the chosen network, empty for any network.
    pub genesis: String,
    #[serde(rename = "type")]
    pub keypair_type: KeypairType,
}

impl AccountInfo {
    /// Merge a validator response with the form's current selections.
    pub fn from_validated(seed: ValidatedSeed, genesis: &str, keypair_type: KeypairType) -> Self {
        Self {
            address: seed.address,
            suri: seed.suri,
            genesis: genesis.to_string(),
            keypair_type,
        }
    }

    /// The network the account is restricted to, if any.
    pub fn network(&self) -> Option<Network> {
        Network::from_genesis_hash(&self.genesis)
    }
}

impl fmt::Debug for AccountInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountInfo")
            .field("address", &self.address)
            .field("suri", &"<redacted>")
            .field("genesis", &self.genesis)
            .field("keypair_type", &self.keypair_type)
            .finish()
    }
}
