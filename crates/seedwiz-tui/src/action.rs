//! Actions for state updates.

use seedwiz_core::{AccountInfo, ValidationRequest, ValidationResponse};

/// Actions that can update application state.
#[derive(Debug, Clone)]
pub enum Action {
    /// Submit a secret to the validator task.
    Validate(ValidationRequest),
    /// A validation round-trip completed.
    ValidationDone(ValidationResponse),
    /// Persist the confirmed account and leave.
    SaveAccount(AccountInfo),
    /// Quit the application.
    Quit,
}
