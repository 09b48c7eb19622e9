pub mod derive;
pub mod ed25519;
pub mod error;
pub mod ss58;
pub mod validator;

pub use derive::*;
pub use error::*;
pub use ss58::{GENERIC_SS58_PREFIX, MAX_SS58_PREFIX, encode_ss58, format_for_network};
pub use validator::SubstrateSeedValidator;
