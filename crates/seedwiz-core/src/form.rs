//! Seed-and-path form controller.
//!
//! Holds the inputs of the first import step and decides when the secret has
//! to be validated again. The controller never awaits anything itself: every
//! mutating call returns [`FormEffect`]s, and a [`FormEffect::Validate`]
//! request must be run by the host and handed back through
//! [`SeedAndPath::apply_validation`].

use crate::types::{AccountInfo, KeypairType, NetworkOption};
use crate::validator::{ValidationRequest, ValidationResponse};

/// Error shown when the seed alone failed to validate.
pub const INVALID_SEED: &str = "Invalid mnemonic seed";
/// Error shown when a derivation path was supplied along with the seed.
pub const INVALID_SEED_OR_PATH: &str = "Invalid mnemonic seed or derivation path";
/// Hint shown under an empty seed input once an error was raised.
pub const WORD_COUNT_HINT: &str = "Mnemonic needs to contain 12, 15, 18, 21, 24 words";

/// Something the owner of the form has to act upon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEffect {
    /// The best known account candidate changed (`None` = no valid candidate).
    AccountChanged(Option<AccountInfo>),
    /// The user picked another keypair type.
    TypeChanged(KeypairType),
    /// The user confirmed the step.
    NextStep,
    /// The current secret must be validated.
    Validate(ValidationRequest),
}

/// State of the seed-and-path step.
pub struct SeedAndPath {
    seed: String,
    path: String,
    /// Genesis hash, empty for any network.
    genesis: String,
    /// Owned by the wizard; mirrored here.
    keypair_type: KeypairType,
    advanced: bool,
    address: String,
    error: String,
    network_options: Vec<NetworkOption>,
    last_request: u64,
    pending: Option<u64>,
    mounted: bool,
}

impl SeedAndPath {
    pub fn new(keypair_type: KeypairType, network_options: Vec<NetworkOption>) -> Self {
        Self {
            seed: String::new(),
            path: String::new(),
            genesis: String::new(),
            keypair_type,
            advanced: false,
            address: String::new(),
            error: String::new(),
            network_options,
            last_request: 0,
            pending: None,
            mounted: false,
        }
    }

    /// Activate the form and run the initial validation pass.
    pub fn mount(&mut self) -> Vec<FormEffect> {
        self.mounted = true;
        self.revalidate()
    }

    /// Deactivate the form. Responses arriving afterwards are dropped.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.pending = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn genesis(&self) -> &str {
        &self.genesis
    }

    pub fn keypair_type(&self) -> KeypairType {
        self.keypair_type
    }

    pub fn is_advanced(&self) -> bool {
        self.advanced
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn network_options(&self) -> &[NetworkOption] {
        &self.network_options
    }

    /// Index of the selected network option, if the genesis is one of them.
    pub fn selected_network_index(&self) -> Option<usize> {
        self.network_options
            .iter()
            .position(|o| o.value == self.genesis)
    }

    /// Whether a validation request is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn set_seed(&mut self, seed: impl Into<String>) -> Vec<FormEffect> {
        let seed = seed.into();
        if seed == self.seed {
            return Vec::new();
        }
        self.seed = seed;
        self.revalidate()
    }

    pub fn set_path(&mut self, path: impl Into<String>) -> Vec<FormEffect> {
        let path = path.into();
        if path == self.path {
            return Vec::new();
        }
        self.path = path;
        self.revalidate()
    }

    /// Select a network by genesis hash (empty for any network).
    pub fn set_genesis(&mut self, genesis: impl Into<String>) -> Vec<FormEffect> {
        let genesis = genesis.into();
        if genesis == self.genesis {
            return Vec::new();
        }
        self.genesis = genesis;
        self.revalidate()
    }

    /// Select a network by its position in the option list.
    pub fn select_network(&mut self, index: usize) -> Vec<FormEffect> {
        match self.network_options.get(index) {
            Some(option) => {
                let value = option.value.clone();
                self.set_genesis(value)
            }
            None => Vec::new(),
        }
    }

    /// Keypair type pushed down by the wizard.
    pub fn set_keypair_type(&mut self, keypair_type: KeypairType) -> Vec<FormEffect> {
        if keypair_type == self.keypair_type {
            return Vec::new();
        }
        self.keypair_type = keypair_type;
        self.revalidate()
    }

    /// Handle a value coming from the keypair type dropdown.
    ///
    /// Unknown values only clear the error.
    pub fn on_type_change(&mut self, value: &str) -> Vec<FormEffect> {
        match value.parse::<KeypairType>() {
            Ok(keypair_type) => vec![FormEffect::TypeChanged(keypair_type)],
            Err(e) => {
                tracing::warn!("Ignoring keypair type selection: {}", e);
                self.error.clear();
                Vec::new()
            }
        }
    }

    /// Show or hide the derivation path and keypair type fields.
    pub fn toggle_advanced(&mut self) -> bool {
        self.advanced = !self.advanced;
        self.advanced
    }

    pub fn can_proceed(&self) -> bool {
        !self.address.is_empty() && self.error.is_empty()
    }

    /// Word count hint under the seed input.
    pub fn show_word_count_hint(&self) -> bool {
        !self.error.is_empty() && self.seed.is_empty()
    }

    /// Warning banner carrying the error message.
    pub fn show_error_banner(&self) -> bool {
        !self.error.is_empty() && !self.seed.is_empty()
    }

    /// Whether the derivation path input should be flagged.
    pub fn path_has_error(&self) -> bool {
        !self.path.is_empty() && !self.error.is_empty()
    }

    /// Confirm the step. Does nothing while no valid address is known.
    pub fn proceed(&self) -> Vec<FormEffect> {
        if self.can_proceed() {
            vec![FormEffect::NextStep]
        } else {
            Vec::new()
        }
    }

    /// Apply the outcome of a validation request.
    pub fn apply_validation(&mut self, response: ValidationResponse) -> Vec<FormEffect> {
        if !self.mounted {
            tracing::debug!(id = response.id, "Dropping validation result after unmount");
            return Vec::new();
        }
        if self.pending != Some(response.id) {
            tracing::debug!(id = response.id, "Dropping stale validation result");
            return Vec::new();
        }
        self.pending = None;

        match response.result {
            Ok(validated) => {
                self.error.clear();
                self.address = validated.address.clone();
                let account =
                    AccountInfo::from_validated(validated, &self.genesis, self.keypair_type);
                tracing::info!("Derived address {}", account.address);
                vec![FormEffect::AccountChanged(Some(account))]
            }
            Err(_) => {
                self.address.clear();
                self.error = if self.path.is_empty() {
                    INVALID_SEED.to_string()
                } else {
                    INVALID_SEED_OR_PATH.to_string()
                };
                vec![FormEffect::AccountChanged(None)]
            }
        }
    }

    fn revalidate(&mut self) -> Vec<FormEffect> {
        if self.seed.is_empty() {
            // Nothing typed yet: no request, and any response in flight is stale.
            self.pending = None;
            self.address.clear();
            return vec![FormEffect::AccountChanged(None)];
        }

        self.last_request += 1;
        self.pending = Some(self.last_request);
        vec![FormEffect::Validate(ValidationRequest {
            id: self.last_request,
            suri: format!("{}{}", self.seed, self.path),
            keypair_type: self.keypair_type,
        })]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Network, ValidatedSeed, network_options};
    use crate::validator::{SeedValidator, ValidationError};
    use async_trait::async_trait;

    const PHRASE: &str = "bottom drive obey lake curtain smoke basket hold race lonely fit walk";

    fn form() -> SeedAndPath {
        let mut form = SeedAndPath::new(KeypairType::Sr25519, network_options());
        form.mount();
        form
    }

    fn request_of(effects: &[FormEffect]) -> ValidationRequest {
        match effects {
            [FormEffect::Validate(request)] => request.clone(),
            other => panic!("expected a single validation request, got {:?}", other),
        }
    }

    fn ok(request: &ValidationRequest, address: &str) -> ValidationResponse {
        ValidationResponse {
            id: request.id,
            result: Ok(ValidatedSeed {
                address: address.to_string(),
                suri: request.suri.clone(),
            }),
        }
    }

    fn rejected(request: &ValidationRequest) -> ValidationResponse {
        ValidationResponse {
            id: request.id,
            result: Err(ValidationError::InvalidSecret("bad".to_string())),
        }
    }

    #[test]
    fn test_mount_with_empty_seed_signals_no_candidate() {
        let mut form = SeedAndPath::new(KeypairType::Sr25519, network_options());
        let effects = form.mount();
        assert_eq!(effects, vec![FormEffect::AccountChanged(None)]);
        assert!(!form.can_proceed());
        assert!(!form.is_pending());
    }

    #[test]
    fn test_empty_seed_never_requests_validation() {
        let mut form = form();
        let request = request_of(&form.set_seed(PHRASE));
        form.apply_validation(ok(&request, "5Abc"));

        let effects = form.set_seed("");
        assert_eq!(effects, vec![FormEffect::AccountChanged(None)]);
        assert!(form.address().is_empty());
        assert!(!form.can_proceed());
    }

    #[test]
    fn test_successful_validation_forwards_candidate() {
        let mut form = form();
        let request = request_of(&form.set_seed(PHRASE));
        assert_eq!(request.suri, PHRASE);
        assert_eq!(request.keypair_type, KeypairType::Sr25519);

        let effects = form.apply_validation(ok(&request, "5Abc"));
        assert_eq!(form.address(), "5Abc");
        assert_eq!(form.error(), "");
        assert!(form.can_proceed());

        match effects.as_slice() {
            [FormEffect::AccountChanged(Some(account))] => {
                assert_eq!(account.address, "5Abc");
                assert_eq!(account.genesis, "");
                assert_eq!(account.keypair_type, KeypairType::Sr25519);
            }
            other => panic!("unexpected effects {:?}", other),
        }
    }

    #[test]
    fn test_candidate_carries_selected_network() {
        let mut form = form();
        form.set_seed(PHRASE);
        let request = request_of(&form.set_genesis(Network::Kusama.genesis_hash()));
        let effects = form.apply_validation(ok(&request, "5Abc"));

        match effects.as_slice() {
            [FormEffect::AccountChanged(Some(account))] => {
                assert_eq!(account.genesis, Network::Kusama.genesis_hash());
                assert_eq!(account.network(), Some(Network::Kusama));
            }
            other => panic!("unexpected effects {:?}", other),
        }
    }

    #[test]
    fn test_failure_with_path_mentions_derivation_path() {
        let mut form = form();
        form.set_seed(PHRASE);
        let request = request_of(&form.set_path("//invalid"));
        assert_eq!(request.suri, format!("{}//invalid", PHRASE));

        let effects = form.apply_validation(rejected(&request));
        assert_eq!(effects, vec![FormEffect::AccountChanged(None)]);
        assert_eq!(form.error(), INVALID_SEED_OR_PATH);
        assert_eq!(form.address(), "");
        assert!(!form.can_proceed());
        assert!(form.path_has_error());
        assert!(form.show_error_banner());
        assert!(!form.show_word_count_hint());
    }

    #[test]
    fn test_failure_without_path_mentions_seed_only() {
        let mut form = form();
        let request = request_of(&form.set_seed("not a mnemonic"));
        form.apply_validation(rejected(&request));
        assert_eq!(form.error(), INVALID_SEED);
        assert!(!form.path_has_error());
    }

    #[test]
    fn test_failure_clears_previous_address() {
        let mut form = form();
        let request = request_of(&form.set_seed(PHRASE));
        form.apply_validation(ok(&request, "5Abc"));

        let request = request_of(&form.set_seed(format!("{} extra", PHRASE)));
        form.apply_validation(rejected(&request));
        assert_eq!(form.address(), "");
        assert!(!form.can_proceed());
    }

    #[test]
    fn test_word_count_hint_after_clearing_failed_seed() {
        let mut form = form();
        let request = request_of(&form.set_seed("abandon"));
        form.apply_validation(rejected(&request));
        assert!(form.show_error_banner());

        form.set_seed("");
        assert!(form.show_word_count_hint());
        assert!(!form.show_error_banner());
    }

    #[test]
    fn test_success_clears_error() {
        let mut form = form();
        let request = request_of(&form.set_seed("abandon"));
        form.apply_validation(rejected(&request));

        let request = request_of(&form.set_seed(PHRASE));
        form.apply_validation(ok(&request, "5Abc"));
        assert_eq!(form.error(), "");
        assert!(form.can_proceed());
    }

    #[test]
    fn test_unknown_type_clears_error_without_effect() {
        let mut form = form();
        let request = request_of(&form.set_seed("abandon"));
        form.apply_validation(rejected(&request));
        assert!(!form.error().is_empty());

        let effects = form.on_type_change("ethereum");
        assert!(effects.is_empty());
        assert_eq!(form.error(), "");
    }

    #[test]
    fn test_known_type_is_forwarded_not_applied() {
        let mut form = form();
        let effects = form.on_type_change("ed25519");
        assert_eq!(effects, vec![FormEffect::TypeChanged(KeypairType::Ed25519)]);
        assert_eq!(form.keypair_type(), KeypairType::Sr25519);

        form.set_seed(PHRASE);
        let request = request_of(&form.set_keypair_type(KeypairType::Ed25519));
        assert_eq!(request.keypair_type, KeypairType::Ed25519);
    }

    #[test]
    fn test_unchanged_values_do_not_revalidate() {
        let mut form = form();
        form.set_seed(PHRASE);
        assert!(form.set_seed(PHRASE).is_empty());
        assert!(form.set_path("").is_empty());
        assert!(form.set_genesis("").is_empty());
        assert!(form.set_keypair_type(KeypairType::Sr25519).is_empty());
    }

    #[test]
    fn test_every_changed_input_revalidates_once() {
        let mut form = form();
        let first = request_of(&form.set_seed(PHRASE));
        let second = request_of(&form.set_path("//0"));
        let third = request_of(&form.select_network(2));
        let fourth = request_of(&form.set_keypair_type(KeypairType::Ecdsa));
        assert!(first.id < second.id && second.id < third.id && third.id < fourth.id);
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let mut form = form();
        let first = request_of(&form.set_seed(PHRASE));
        let second = request_of(&form.set_path("//1"));

        // The newer request resolves first.
        form.apply_validation(ok(&second, "5Second"));
        let effects = form.apply_validation(rejected(&first));
        assert!(effects.is_empty());
        assert_eq!(form.address(), "5Second");
        assert_eq!(form.error(), "");
    }

    #[test]
    fn test_response_after_emptying_seed_is_ignored() {
        let mut form = form();
        let request = request_of(&form.set_seed(PHRASE));
        form.set_seed("");
        assert!(form.apply_validation(ok(&request, "5Abc")).is_empty());
        assert_eq!(form.address(), "");
    }

    #[test]
    fn test_response_after_unmount_is_ignored() {
        let mut form = form();
        let request = request_of(&form.set_seed(PHRASE));
        form.unmount();
        assert!(form.apply_validation(ok(&request, "5Abc")).is_empty());
        assert_eq!(form.address(), "");
        assert!(!form.is_mounted());
    }

    #[test]
    fn test_toggle_advanced_has_no_side_effects() {
        let mut form = form();
        form.set_seed(PHRASE);
        form.set_path("//0");
        let before = (
            form.seed().to_string(),
            form.path().to_string(),
            form.genesis().to_string(),
            form.keypair_type(),
        );
        assert!(form.toggle_advanced());
        assert!(!form.toggle_advanced());
        let after = (
            form.seed().to_string(),
            form.path().to_string(),
            form.genesis().to_string(),
            form.keypair_type(),
        );
        assert_eq!(before, after);
    }

    #[test]
    fn test_proceed_only_when_valid() {
        let mut form = form();
        assert!(form.proceed().is_empty());
        let request = request_of(&form.set_seed(PHRASE));
        assert!(form.proceed().is_empty());
        form.apply_validation(ok(&request, "5Abc"));
        assert_eq!(form.proceed(), vec![FormEffect::NextStep]);
    }

    #[test]
    fn test_select_network_out_of_range() {
        let mut form = form();
        assert!(form.select_network(99).is_empty());
        assert_eq!(form.selected_network_index(), Some(0));
    }

    /// Validator answering from a fixed address book, used to drive the form end to end.
    struct ScriptedValidator;

    #[async_trait]
    impl SeedValidator for ScriptedValidator {
        async fn validate_seed(
            &self,
            suri: &str,
            _keypair_type: KeypairType,
        ) -> Result<ValidatedSeed, ValidationError> {
            if suri == PHRASE {
                Ok(ValidatedSeed {
                    address: "5Abc".to_string(),
                    suri: suri.to_string(),
                })
            } else {
                Err(ValidationError::InvalidPath(suri.len().to_string()))
            }
        }
    }

    #[tokio::test]
    async fn test_round_trip_through_validator() {
        let mut form = form();
        let request = request_of(&form.set_seed(PHRASE));
        let effects = form.apply_validation(request.run(&ScriptedValidator).await);
        assert!(matches!(effects.as_slice(), [FormEffect::AccountChanged(Some(_))]));
        assert!(form.can_proceed());

        let request = request_of(&form.set_path("//invalid"));
        form.apply_validation(request.run(&ScriptedValidator).await);
        assert_eq!(form.error(), INVALID_SEED_OR_PATH);
        assert!(!form.can_proceed());
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use crate::types::{ValidatedSeed, network_options};
    use crate::validator::ValidationError;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Seed(String),
        Path(String),
        Network(usize),
        Toggle,
        Resolve(bool),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            "[a-z ]{0,12}".prop_map(Op::Seed),
            "(//[a-z0-9]{1,4}){0,2}".prop_map(Op::Path),
            (0usize..6).prop_map(Op::Network),
            Just(Op::Toggle),
            any::<bool>().prop_map(Op::Resolve),
        ]
    }

    proptest! {
        #[test]
        fn test_empty_seed_never_validates(path in ".{0,20}", network in 0usize..6) {
            let mut form = SeedAndPath::new(KeypairType::Sr25519, network_options());
            form.mount();
            let mut effects = form.set_path(path);
            effects.extend(form.select_network(network));
            for effect in effects {
                prop_assert!(!matches!(effect, FormEffect::Validate(_)));
            }
        }

        #[test]
        fn test_toggle_never_validates(seed in ".{1,30}") {
            let mut form = SeedAndPath::new(KeypairType::Sr25519, network_options());
            form.mount();
            form.set_seed(seed);
            let pending = form.is_pending();
            form.toggle_advanced();
            prop_assert_eq!(form.is_pending(), pending);
        }

        #[test]
        fn test_proceed_iff_latest_response_succeeded(ops in prop::collection::vec(op(), 0..24)) {
            let mut form = SeedAndPath::new(KeypairType::Sr25519, network_options());
            form.mount();
            let mut last: Option<ValidationRequest> = None;
            // Outcome of the last response the form accepted, reset when the seed is cleared.
            let mut seed = String::new();
            let mut outcome: Option<bool> = None;
            for op in ops {
                let effects = match op {
                    Op::Seed(s) => {
                        seed = s.clone();
                        form.set_seed(s)
                    }
                    Op::Path(p) => form.set_path(p),
                    Op::Network(i) => form.select_network(i),
                    Op::Toggle => {
                        form.toggle_advanced();
                        Vec::new()
                    }
                    Op::Resolve(success) => match last.take() {
                        Some(request) => {
                            outcome = Some(success);
                            form.apply_validation(ValidationResponse {
                                id: request.id,
                                result: if success {
                                    Ok(ValidatedSeed { address: "5Abc".to_string(), suri: request.suri })
                                } else {
                                    Err(ValidationError::InvalidSecret(String::new()))
                                },
                            })
                        }
                        None => Vec::new(),
                    },
                };
                for effect in effects {
                    if let FormEffect::Validate(request) = effect {
                        last = Some(request);
                    }
                }
                if seed.is_empty() {
                    last = None;
                    outcome = None;
                }
                let expected = outcome == Some(true);
                prop_assert_eq!(form.can_proceed(), expected);
                prop_assert_eq!(form.proceed().is_empty(), !expected);
            }
        }
    }
}
