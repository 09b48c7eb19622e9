//! Seed import wizard - derive and record a Substrate account from a mnemonic.

mod action;
mod app;
mod config;
mod event;
mod log_buffer;
mod theme;
mod tui;
mod ui;

use action::Action;
use app::App;
use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use event::{Event, EventHandler};
use log_buffer::{LogBuffer, LogBufferLayer};
use seedwiz_core::{
    AccountInfo, AppConfig, ImportedAccount, KeypairType, Network, SeedValidator,
    ValidationRequest,
};
use seedwiz_signer::{SubstrateSeedValidator, format_for_network};
use std::io::Read;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tui::Tui;

/// Seed import wizard - terminal interface for importing an account from a mnemonic.
#[derive(Parser, Debug)]
#[command(name = "seedwiz")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Network the account is restricted to ("any" for no restriction)
    #[arg(short, long)]
    network: Option<NetworkArg>,

    /// Keypair crypto type: sr25519, ed25519 or ecdsa
    #[arg(short = 't', long = "type")]
    keypair_type: Option<KeypairType>,

    /// Check mode: read a secret URI from stdin, print its address and exit.
    /// Suitable for scripts.
    #[arg(long)]
    check: bool,

    /// Do not write the imported account or the selections to the config file
    #[arg(long)]
    no_save: bool,
}

/// Network argument that can be parsed from string.
#[derive(Debug, Clone)]
struct NetworkArg(Option<Network>);

impl std::str::FromStr for NetworkArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "any" | "all" => Ok(NetworkArg(None)),
            "polkadot" | "dot" => Ok(NetworkArg(Some(Network::Polkadot))),
            "kusama" | "ksm" => Ok(NetworkArg(Some(Network::Kusama))),
            "westend" | "wnd" => Ok(NetworkArg(Some(Network::Westend))),
            "paseo" | "pas" => Ok(NetworkArg(Some(Network::Paseo))),
            _ => Err(format!(
                "Unknown network '{}'. Valid options: any, polkadot, kusama, westend, paseo",
                s
            )),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize error handling
    color_eyre::install()?;

    // Create shared log buffer
    let log_buffer = LogBuffer::new();

    // Initialize logging - use stderr for check mode, buffer for TUI
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("seedwiz=info".parse()?)
        .add_directive("seedwiz_core=info".parse()?)
        .add_directive("seedwiz_signer=info".parse()?);

    if args.check {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(LogBufferLayer::new(log_buffer.clone()))
            .init();
    }

    let mut app_config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Failed to load config: {}", e);
            if let Ok(path) = config::get_config_path()
                && path.exists()
            {
                match config::backup_corrupted_config(&path) {
                    Ok(backup) => tracing::warn!("Backed up config to {}", backup.display()),
                    Err(e) => tracing::warn!("Failed to back up config: {}", e),
                }
            }
            AppConfig::default()
        }
    };

    // CLI flags win over remembered selections.
    let network = match &args.network {
        Some(arg) => arg.0,
        None => app_config.network,
    };
    let keypair_type = args.keypair_type.unwrap_or(app_config.keypair_type);

    let validator: Arc<dyn SeedValidator> = Arc::new(SubstrateSeedValidator::new());

    if args.check {
        return run_check_mode(validator.as_ref(), keypair_type, network).await;
    }

    tracing::info!("Loaded {} imported account(s)", app_config.accounts.len());

    // Create action channel for responses from background tasks to UI
    const ACTION_CHANNEL_CAPACITY: usize = 100;
    let (action_tx, mut action_rx) = mpsc::channel::<Action>(ACTION_CHANNEL_CAPACITY);

    const REQUEST_CHANNEL_CAPACITY: usize = 16;
    let (request_tx, request_rx) = mpsc::channel::<ValidationRequest>(REQUEST_CHANNEL_CAPACITY);

    // Detect terminal theme (must be done before entering raw mode)
    let theme = theme::Theme::from_config(app_config.theme);

    let mut app = App::new(keypair_type, network, log_buffer, theme);

    // Initialize terminal
    let mut tui = Tui::new()?;
    tui.enter()?;

    let mut events = EventHandler::new(80);

    let validation_action_tx = action_tx.clone();
    tokio::spawn(async move {
        validation_task(validator, request_rx, validation_action_tx).await;
    });

    if let Some(action) = app.start() {
        let _ = action_tx.send(action).await;
    }

    let mut saved: Option<AccountInfo> = None;

    // Main loop
    let result: Result<()> = async {
        loop {
            tui.draw(|frame| ui::render(frame, &app))?;

            tokio::select! {
                event = events.next() => {
                    let action = match event? {
                        Event::Tick => {
                            app.tick();
                            None
                        }
                        Event::Key(key_event) => app.handle_key(key_event),
                        Event::Paste(text) => app.handle_paste(&text),
                        Event::Resize(_, _) => None,
                    };
                    if let Some(action) = action {
                        let _ = action_tx.send(action).await;
                    }
                }
                Some(action) = action_rx.recv() => {
                    match action {
                        Action::Validate(request) => {
                            let _ = request_tx.send(request).await;
                        }
                        Action::SaveAccount(account) => {
                            if !args.no_save {
                                record_account(&mut app_config, &account);
                                if let Err(e) = config::save_config(&app_config) {
                                    tracing::warn!("Failed to save config: {}", e);
                                }
                            }
                            saved = Some(account);
                            app.should_quit = true;
                        }
                        other => {
                            if let Some(follow_up) = app.handle_action(other) {
                                let _ = action_tx.send(follow_up).await;
                            }
                        }
                    }
                }
            }

            if app.should_quit {
                break;
            }
        }
        Ok(())
    }
    .await;

    // Restore terminal
    tui.exit()?;
    result?;

    if let Some(account) = saved {
        println!("Imported {} ({})", account.address, account.keypair_type);
        if let Some(network) = account.network() {
            println!("{}: {}", network, format_for_network(&account.address, network)?);
        }
    }

    Ok(())
}

/// Run validation requests off the UI loop and report the outcome.
///
/// Every request gets its own task so a slow derivation never holds back a
/// newer one; the form drops responses it no longer waits for.
async fn validation_task(
    validator: Arc<dyn SeedValidator>,
    mut request_rx: mpsc::Receiver<ValidationRequest>,
    action_tx: mpsc::Sender<Action>,
) {
    while let Some(request) = request_rx.recv().await {
        let validator = validator.clone();
        let action_tx = action_tx.clone();
        tokio::spawn(async move {
            let response = request.run(validator.as_ref()).await;
            let _ = action_tx.send(Action::ValidationDone(response)).await;
        });
    }
    tracing::debug!("Validation task stopped");
}

/// Record the confirmed account and the selections that produced it.
fn record_account(app_config: &mut AppConfig, account: &AccountInfo) {
    app_config.network = account.network();
    app_config.keypair_type = account.keypair_type;
    if app_config.add_account(ImportedAccount::from_account(account, None)) {
        tracing::info!("Saved account {}", account.address);
    } else {
        tracing::info!("Account {} was already imported", account.address);
    }
}

/// Validate one secret URI from stdin and print the derived address.
async fn run_check_mode(
    validator: &dyn SeedValidator,
    keypair_type: KeypairType,
    network: Option<Network>,
) -> Result<()> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;

    for line in check_secret(validator, input.trim(), keypair_type, network).await? {
        println!("{}", line);
    }
    Ok(())
}

/// Addresses for one secret URI: the generic one, then the network one if any.
async fn check_secret(
    validator: &dyn SeedValidator,
    suri: &str,
    keypair_type: KeypairType,
    network: Option<Network>,
) -> Result<Vec<String>> {
    let validated = validator
        .validate_seed(suri, keypair_type)
        .await
        .map_err(|e| eyre!("Invalid secret: {}", e))?;

    let mut lines = vec![validated.address.clone()];
    if let Some(network) = network {
        lines.push(format_for_network(&validated.address, network)?);
    }
    Ok(lines)
}
