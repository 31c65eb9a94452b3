//! `shipdeck` - CLI for the ship catalog
//!
//! This binary lists, searches, and edits ship records held by the remote
//! ship service, or by an in-memory store with `--standalone`.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use shipdeck::cli::{
    AddCommand, Cli, Command, ConfigCommand, DeleteCommand, EditCommand, ListCommand,
    OutputFormat, SearchCommand, ShowCommand,
};
use shipdeck::render::{render_cards, render_json, render_sign_in, render_table};
use shipdeck::session::{greeting_name, TokenClaims};
use shipdeck::view::{FormEdit, FormField};
use shipdeck::{
    init_logging, Config, HttpShipStore, MemoryShipStore, NotificationKind, Session, Ship,
    ShipDraft, ShipStore, Shell, TokenSession, ViewController,
};

/// Session token used in standalone mode when none is configured.
const LOCAL_SESSION_TOKEN: &str = "standalone";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    let session = Arc::new(TokenSession::new(
        config.auth.token.clone(),
        config.auth.user_name.clone(),
    ));

    match cli.command {
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        Command::Whoami => {
            handle_whoami(&session);
            Ok(ExitCode::SUCCESS)
        }
        command => {
            let standalone = cli.standalone || config.standalone.enabled;
            if standalone && !session.is_authenticated() {
                session.sign_in(LOCAL_SESSION_TOKEN);
            }
            let store = build_store(&config, standalone, session.clone())?;
            debug!(store = store.name(), "store ready");
            let controller =
                ViewController::new(store.clone(), session.clone(), config.notification_ttl());

            match command {
                Command::List(cmd) => handle_list(controller, &cmd).await,
                Command::Show(cmd) => handle_show(store.as_ref(), &session, &cmd).await,
                Command::Search(cmd) => handle_search(store.as_ref(), &session, &cmd).await,
                Command::Add(cmd) => handle_add(controller, &cmd).await,
                Command::Edit(cmd) => handle_edit(controller, &cmd).await,
                Command::Delete(cmd) => handle_delete(controller, &cmd).await,
                Command::Ping => handle_ping(store.as_ref()).await,
                Command::Shell => {
                    let mut shell = Shell::new(controller, session);
                    shell
                        .run(tokio::io::stdin(), tokio::io::stdout())
                        .await?;
                    Ok(ExitCode::SUCCESS)
                }
                Command::Whoami | Command::Config(_) => Ok(ExitCode::SUCCESS),
            }
        }
    }
}

fn build_store(
    config: &Config,
    standalone: bool,
    session: Arc<TokenSession>,
) -> anyhow::Result<Arc<dyn ShipStore>> {
    if standalone {
        let store = match &config.standalone.seed_file {
            Some(path) => MemoryShipStore::from_seed_file(path)
                .with_context(|| format!("loading seed file {}", path.display()))?,
            None => MemoryShipStore::new(),
        };
        Ok(Arc::new(store))
    } else {
        Ok(Arc::new(HttpShipStore::from_config(config, session)?))
    }
}

fn signed_out() -> ExitCode {
    eprint!("{}", render_sign_in());
    ExitCode::FAILURE
}

/// Load the catalog, reporting why when it cannot be shown.
async fn load(controller: &mut ViewController) -> anyhow::Result<Option<ExitCode>> {
    if let Err(err) = controller.load().await {
        if err.is_unauthenticated() {
            return Ok(Some(signed_out()));
        }
        return Err(err.into());
    }
    if let Some(message) = controller.state().load_error() {
        eprintln!("Error: {message}");
        return Ok(Some(ExitCode::FAILURE));
    }
    Ok(None)
}

/// Print the outcome of a mutation and map it to an exit code.
fn report(controller: &ViewController) -> ExitCode {
    match controller.state().notification() {
        Some(note) if note.kind == NotificationKind::Error => {
            eprintln!("{}", note.message);
            ExitCode::FAILURE
        }
        Some(note) => {
            println!("{}", note.message);
            ExitCode::SUCCESS
        }
        None => ExitCode::SUCCESS,
    }
}

fn print_ships(ships: &[&Ship], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", render_json(ships)?),
        OutputFormat::Table => print!("{}", render_table(ships)),
        OutputFormat::Plain if ships.is_empty() => println!("No ships found."),
        OutputFormat::Plain => print!("{}", render_cards(ships)),
    }
    Ok(())
}

async fn handle_list(
    mut controller: ViewController,
    cmd: &ListCommand,
) -> anyhow::Result<ExitCode> {
    if let Some(code) = load(&mut controller).await? {
        return Ok(code);
    }
    if let Some(term) = &cmd.search {
        controller.search(term.clone());
    }
    print_ships(&controller.state().visible_ships(), cmd.format)?;
    Ok(ExitCode::SUCCESS)
}

async fn handle_show(
    store: &dyn ShipStore,
    session: &TokenSession,
    cmd: &ShowCommand,
) -> anyhow::Result<ExitCode> {
    if !session.is_authenticated() {
        return Ok(signed_out());
    }
    match store.get(&cmd.id).await {
        Ok(ship) => {
            print_ships(&[&ship], cmd.format)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("Error: {err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn handle_search(
    store: &dyn ShipStore,
    session: &TokenSession,
    cmd: &SearchCommand,
) -> anyhow::Result<ExitCode> {
    if !session.is_authenticated() {
        return Ok(signed_out());
    }
    match store.search(&cmd.query()).await {
        Ok(ships) => {
            let ships: Vec<&Ship> = ships.iter().collect();
            print_ships(&ships, cmd.format)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("Error: {err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Replace the open form's contents with `draft`.
fn fill_form(controller: &mut ViewController, draft: &ShipDraft) -> shipdeck::Result<()> {
    controller.edit_form(FormEdit::Set(FormField::Name, draft.name.clone()))?;
    controller.edit_form(FormEdit::Set(FormField::Type, draft.ship_type.clone()))?;
    controller.edit_form(FormEdit::Set(
        FormField::LaunchYear,
        draft.launch_year.to_string(),
    ))?;
    controller.edit_form(FormEdit::Set(FormField::Country, draft.country.clone()))?;
    controller.edit_form(FormEdit::Set(FormField::Length, draft.length.clone()))?;

    let slots = controller
        .state()
        .form()
        .map_or(0, |form| form.events().len());
    for _ in 0..slots {
        controller.edit_form(FormEdit::RemoveEvent(0))?;
    }
    for (index, event) in draft.notable_events.iter().enumerate() {
        controller.edit_form(FormEdit::AddEvent)?;
        controller.edit_form(FormEdit::SetEvent(index, event.clone()))?;
    }
    Ok(())
}

async fn handle_add(
    mut controller: ViewController,
    cmd: &AddCommand,
) -> anyhow::Result<ExitCode> {
    if let Some(code) = load(&mut controller).await? {
        return Ok(code);
    }
    controller.begin_create();
    fill_form(&mut controller, &cmd.draft())?;
    controller.submit().await?;

    let code = report(&controller);
    if code == ExitCode::SUCCESS {
        if let Some(ship) = controller.state().ships().as_slice().last() {
            println!("{}", ship.id);
        }
    }
    Ok(code)
}

async fn handle_edit(
    mut controller: ViewController,
    cmd: &EditCommand,
) -> anyhow::Result<ExitCode> {
    if let Some(code) = load(&mut controller).await? {
        return Ok(code);
    }
    let Some(ship) = controller.state().ships().get(&cmd.id) else {
        eprintln!("Error: no ship with id '{}'", cmd.id);
        return Ok(ExitCode::FAILURE);
    };
    let draft = cmd.apply_to(ship.to_draft());

    controller.begin_edit(cmd.id.clone());
    fill_form(&mut controller, &draft)?;
    controller.submit().await?;
    Ok(report(&controller))
}

async fn handle_delete(
    mut controller: ViewController,
    cmd: &DeleteCommand,
) -> anyhow::Result<ExitCode> {
    if let Some(code) = load(&mut controller).await? {
        return Ok(code);
    }
    controller.delete(cmd.id.clone()).await?;
    Ok(report(&controller))
}

async fn handle_ping(store: &dyn ShipStore) -> anyhow::Result<ExitCode> {
    match store.ping().await {
        Ok(message) => {
            println!("{}: {message}", store.name());
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}: {err}", store.name());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn handle_whoami(session: &TokenSession) {
    println!("Session:  {}", session.state());
    if let Some(name) = session.user_name() {
        println!("User:     {}", greeting_name(&name));
    }
    let expiry = session
        .session_token()
        .and_then(|token| TokenClaims::decode(&token).ok())
        .and_then(|claims| claims.expires_at());
    if let Some(expires_at) = expiry {
        println!("Expires:  {}", expires_at.to_rfc3339());
    }
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[API]");
                println!("  Base URL:           {}", config.api.base_url);
                println!("  Timeout (secs):     {}", config.api.timeout_secs);
                println!();
                println!("[Auth]");
                println!(
                    "  Token:              {}",
                    if config.auth.token.is_some() { "set" } else { "not set" }
                );
                println!(
                    "  User name:          {}",
                    config.auth.user_name.as_deref().unwrap_or("(from token)")
                );
                println!();
                println!("[UI]");
                println!("  Notification (ms):  {}", config.ui.notification_ttl_ms);
                println!();
                println!("[Standalone]");
                println!("  Enabled:            {}", config.standalone.enabled);
                println!(
                    "  Seed file:          {}",
                    config
                        .standalone
                        .seed_file
                        .as_ref()
                        .map_or_else(|| "(none)".to_string(), |p| p.display().to_string())
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    println!("Configuration error: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
