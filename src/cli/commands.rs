//! CLI command implementations
//!
//! `serve` runs the HTTP service. `validate` and `init` are one-shot tools
//! that speak JSON over stdin/stdout.

use std::path::Path;

use serde_json::json;

use crate::http_server::{HttpServer, PORT_ENV};
use crate::observability::{init_logging, Event};
use crate::service::CardService;
use crate::store::{FileStore, LOG_FILE_NAME};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(config.as_deref(), port),
        Command::Validate { config } => validate(config.as_deref()),
        Command::Init { config } => init(&config),
    }
}

/// Create the data directory and an empty card log.
///
/// Refuses to touch a directory that already holds a card log.
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let data_dir = config
        .data_path()
        .ok_or_else(|| CliError::InvalidConfig("init requires data_dir".into()))?;

    if data_dir.join(LOG_FILE_NAME).exists() {
        return Err(CliError::AlreadyInitialized(data_dir));
    }

    let store = FileStore::open(&data_dir)?;
    let log_path = store.path()?;

    write_response(json!({
        "initialized": true,
        "log": log_path.to_string_lossy(),
    }))?;

    Ok(())
}

/// Validate one card from stdin.
///
/// Validation failures are a normal result: they are written to stdout as
/// an error envelope and the command still succeeds.
pub fn validate(config_path: Option<&Path>) -> CliResult<()> {
    let config = Config::load_or_default(config_path)?;
    let validator = config.validator();

    let candidate = read_request()?;
    match validator.validate(&candidate) {
        Ok(card) => write_response(card.to_value()),
        Err(e) => write_error(e.code().code(), e.message()),
    }
}

/// Serve the card API over HTTP.
///
/// Startup order: config, logging, store (the file store replays its log
/// here; corruption aborts startup), then the listener. Ctrl-C drains
/// in-flight requests and exits.
pub fn serve(config_path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    let mut config = Config::load_or_default(config_path)?;
    config.apply_port_env(std::env::var(PORT_ENV).ok().as_deref())?;
    if let Some(port) = port {
        config.http.port = port;
    }

    init_logging(&config.log_filter);
    tracing::info!(
        event = Event::BootStart.as_str(),
        version = env!("CARGO_PKG_VERSION")
    );
    tracing::info!(
        event = Event::ConfigLoaded.as_str(),
        addr = %config.http.socket_addr(),
        storage = ?config.storage,
        presence_check = %config.presence_check
    );

    let store = config.build_store()?;
    tracing::info!(event = Event::StoreOpened.as_str(), storage = ?config.storage);

    let service = CardService::new(store, config.validator());
    let server = HttpServer::with_config(config.http.clone(), service);

    let rt = tokio::runtime::Runtime::new().map_err(CliError::Server)?;

    rt.block_on(server.start(shutdown_signal()))
        .map_err(CliError::Server)?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // No signal handler: run until killed.
        tracing::warn!("Failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!(event = Event::ShutdownStart.as_str());
}
