//! Application state and logic.

use crate::action::Action;
use crate::log_buffer::LogBuffer;
use crate::theme::{Palette, Theme};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use seedwiz_core::{AccountInfo, FormEffect, KeypairType, Network, SeedAndPath, network_options};

/// Wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    /// Mnemonic, network and advanced options.
    #[default]
    SeedAndPath,
    /// Review the derived account before saving it.
    Confirm,
}

/// Focusable field of the seed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Seed,
    Network,
    Advanced,
    Path,
    KeypairType,
    Next,
}

impl Field {
    /// Fields in tab order. The path and type fields only exist in advanced mode.
    pub fn visible(advanced: bool) -> &'static [Field] {
        if advanced {
            &[
                Field::Seed,
                Field::Network,
                Field::Advanced,
                Field::Path,
                Field::KeypairType,
                Field::Next,
            ]
        } else {
            &[Field::Seed, Field::Network, Field::Advanced, Field::Next]
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Field::Seed | Field::Path)
    }
}

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Network dropdown open, with the highlighted row.
    NetworkMenu(usize),
    /// Keypair type dropdown open, with the highlighted row.
    KeypairMenu(usize),
}

/// Main application state.
pub struct App {
    /// Current theme.
    pub theme: Theme,
    /// Color palette for current theme.
    pub palette: Palette,
    /// Current wizard step.
    pub step: Step,
    /// The seed-and-path form.
    pub form: SeedAndPath,
    /// Keypair type chosen for the import.
    pub keypair_type: KeypairType,
    /// Latest valid account candidate reported by the form.
    pub account: Option<AccountInfo>,
    /// Focused field on the seed step.
    pub focus: Field,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Show the seed in clear text.
    pub reveal_seed: bool,
    /// Whether to show help overlay.
    pub showing_help: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Network picked on startup, applied on every mount.
    initial_genesis: String,
    /// Tick counter for animations.
    tick_count: u64,
    /// Shared log buffer.
    pub log_buffer: LogBuffer,
    /// Log scroll offset (0 = bottom/most recent).
    pub log_scroll: usize,
}

impl App {
    /// Create a new application instance.
    pub fn new(
        keypair_type: KeypairType,
        network: Option<Network>,
        log_buffer: LogBuffer,
        theme: Theme,
    ) -> Self {
        Self {
            theme,
            palette: theme.palette(),
            step: Step::default(),
            form: SeedAndPath::new(keypair_type, network_options()),
            keypair_type,
            account: None,
            focus: Field::default(),
            input_mode: InputMode::default(),
            reveal_seed: false,
            showing_help: false,
            should_quit: false,
            initial_genesis: network
                .map(|n| n.genesis_hash().to_string())
                .unwrap_or_default(),
            tick_count: 0,
            log_buffer,
            log_scroll: 0,
        }
    }

    /// Mount the form. Must be called once before handling input.
    pub fn start(&mut self) -> Option<Action> {
        let mut effects = self.form.mount();
        effects.extend(self.form.set_genesis(self.initial_genesis.clone()));
        self.apply_effects(effects)
    }

    /// Network chosen in the form, `None` for any network.
    pub fn network(&self) -> Option<Network> {
        Network::from_genesis_hash(self.form.genesis())
    }

    /// Scroll logs up (older messages).
    pub fn scroll_logs_up(&mut self) {
        let log_count = self.log_buffer.len();
        if log_count > 3 {
            self.log_scroll = (self.log_scroll + 1).min(log_count.saturating_sub(3));
        }
    }

    /// Scroll logs down (newer messages).
    pub fn scroll_logs_down(&mut self) {
        self.log_scroll = self.log_scroll.saturating_sub(1);
    }

    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
    }

    /// Spinner frame shown while a validation is in flight.
    pub fn spinner_char(&self) -> char {
        const SPINNER_CHARS: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
        SPINNER_CHARS[(self.tick_count % SPINNER_CHARS.len() as u64) as usize]
    }

    /// Handle keyboard input.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        if self.showing_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::F(1)) {
                self.showing_help = false;
            }
            return None;
        }

        match key.code {
            KeyCode::PageUp => {
                self.scroll_logs_up();
                return None;
            }
            KeyCode::PageDown => {
                self.scroll_logs_down();
                return None;
            }
            KeyCode::F(1) => {
                self.showing_help = true;
                return None;
            }
            _ => {}
        }

        match self.step {
            Step::SeedAndPath => match self.input_mode {
                InputMode::Normal => self.handle_form_key(key),
                InputMode::NetworkMenu(index) => self.handle_network_menu_key(key, index),
                InputMode::KeypairMenu(index) => self.handle_keypair_menu_key(key, index),
            },
            Step::Confirm => self.handle_confirm_key(key),
        }
    }

    /// Handle a bracketed paste into the focused text field.
    pub fn handle_paste(&mut self, text: &str) -> Option<Action> {
        if self.step != Step::SeedAndPath || self.input_mode != InputMode::Normal {
            return None;
        }
        match self.focus {
            Field::Seed => {
                // Pasted phrases often carry line breaks; the validator collapses spaces.
                let pasted = text.replace(['\r', '\n'], " ");
                let seed = format!("{}{}", self.form.seed(), pasted.trim_end());
                let effects = self.form.set_seed(seed);
                self.apply_effects(effects)
            }
            Field::Path => {
                let path = format!("{}{}", self.form.path(), text.trim());
                let effects = self.form.set_path(path);
                self.apply_effects(effects)
            }
            _ => None,
        }
    }

    /// Handle keys on the seed step.
    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Tab => {
                self.move_focus(1);
                return None;
            }
            KeyCode::BackTab => {
                self.move_focus(-1);
                return None;
            }
            KeyCode::Char('n') if ctrl => return self.proceed(),
            KeyCode::Char('r') if ctrl => {
                self.reveal_seed = !self.reveal_seed;
                return None;
            }
            KeyCode::Char('?') if !self.focus.is_text() => {
                self.showing_help = true;
                return None;
            }
            _ => {}
        }

        match self.focus {
            Field::Seed | Field::Path => self.handle_text_key(key),
            Field::Network => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    let current = self.form.selected_network_index().unwrap_or(0);
                    self.input_mode = InputMode::NetworkMenu(current);
                }
                None
            }
            Field::Advanced => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.form.toggle_advanced();
                }
                None
            }
            Field::KeypairType => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    let current = KeypairType::all()
                        .iter()
                        .position(|t| *t == self.keypair_type)
                        .unwrap_or(0);
                    self.input_mode = InputMode::KeypairMenu(current);
                }
                None
            }
            Field::Next => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.proceed()
                } else {
                    None
                }
            }
        }
    }

    /// Edit the focused text field.
    fn handle_text_key(&mut self, key: KeyEvent) -> Option<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let mut value = match self.focus {
            Field::Seed => self.form.seed().to_string(),
            Field::Path => self.form.path().to_string(),
            _ => return None,
        };

        match key.code {
            KeyCode::Char('u') if ctrl => value.clear(),
            KeyCode::Char(c) if !ctrl => value.push(c),
            KeyCode::Backspace => {
                value.pop();
            }
            KeyCode::Enter => {
                self.move_focus(1);
                return None;
            }
            _ => return None,
        }

        let effects = if self.focus == Field::Seed {
            self.form.set_seed(value)
        } else {
            self.form.set_path(value)
        };
        self.apply_effects(effects)
    }

    fn handle_network_menu_key(&mut self, key: KeyEvent, index: usize) -> Option<Action> {
        let count = self.form.network_options().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.input_mode = InputMode::NetworkMenu((index + count - 1) % count);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.input_mode = InputMode::NetworkMenu((index + 1) % count);
                None
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                let effects = self.form.select_network(index);
                self.apply_effects(effects)
            }
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                None
            }
            _ => None,
        }
    }

    fn handle_keypair_menu_key(&mut self, key: KeyEvent, index: usize) -> Option<Action> {
        let types = KeypairType::all();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.input_mode = InputMode::KeypairMenu((index + types.len() - 1) % types.len());
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.input_mode = InputMode::KeypairMenu((index + 1) % types.len());
                None
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                let value = types.get(index).map(|t| t.as_str()).unwrap_or_default();
                let effects = self.form.on_type_change(value);
                self.apply_effects(effects)
            }
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                None
            }
            _ => None,
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Enter => self.account.clone().map(Action::SaveAccount),
            KeyCode::Esc => self.back(),
            KeyCode::Char('?') => {
                self.showing_help = true;
                None
            }
            _ => None,
        }
    }

    fn move_focus(&mut self, delta: isize) {
        let fields = Field::visible(self.form.is_advanced());
        let current = fields.iter().position(|f| *f == self.focus).unwrap_or(0) as isize;
        let len = fields.len() as isize;
        self.focus = fields[((current + delta).rem_euclid(len)) as usize];
    }

    fn proceed(&mut self) -> Option<Action> {
        // The known account belongs to the previous input until the response lands.
        if self.form.is_pending() {
            return None;
        }
        let effects = self.form.proceed();
        self.apply_effects(effects)
    }

    /// Leave the confirmation step with a fresh form.
    fn back(&mut self) -> Option<Action> {
        tracing::debug!("Back to the seed step");
        self.form = SeedAndPath::new(self.keypair_type, network_options());
        self.account = None;
        self.step = Step::SeedAndPath;
        self.focus = Field::Seed;
        self.input_mode = InputMode::Normal;
        self.start()
    }

    /// Consume form effects. Returns the validation request to run, if any.
    fn apply_effects(&mut self, effects: Vec<FormEffect>) -> Option<Action> {
        let mut action = None;
        for effect in effects {
            match effect {
                FormEffect::AccountChanged(account) => self.account = account,
                FormEffect::TypeChanged(keypair_type) => {
                    tracing::info!("Keypair type set to {}", keypair_type);
                    self.keypair_type = keypair_type;
                    let effects = self.form.set_keypair_type(keypair_type);
                    if let Some(next) = self.apply_effects(effects) {
                        action = Some(next);
                    }
                }
                FormEffect::NextStep => {
                    self.form.unmount();
                    self.input_mode = InputMode::Normal;
                    self.step = Step::Confirm;
                }
                // Superseded requests are ignored by the form, so the last one wins.
                FormEffect::Validate(request) => action = Some(Action::Validate(request)),
            }
        }
        action
    }

    /// Handle an action coming back from a background task.
    pub fn handle_action(&mut self, action: Action) -> Option<Action> {
        match action {
            Action::ValidationDone(response) => {
                let effects = self.form.apply_validation(response);
                self.apply_effects(effects)
            }
            Action::Quit => {
                self.should_quit = true;
                None
            }
            Action::Validate(_) | Action::SaveAccount(_) => None,
        }
    }
}
