//! CLI entrypoint for AI Fiesta
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use fiesta_application::{
    Aggregator, ChatSessionService, CompareProvidersUseCase, InMemorySessionStore, SessionStore,
};
use fiesta_domain::{Conversation, ResponseRecord, model_catalog};
use fiesta_infrastructure::{
    ConfigLoader, FileConfig, FileSessionConfig, HttpAggregatorClient, JsonFileSessionStore,
    JsonlConversationLogger, build_adapters, providers::http::build_client,
};
use fiesta_presentation::{
    AppState, ChatRepl, Cli, Command, ConsoleFormatter, OutputFormat, ProgressReporter,
    SimpleProgress, serve,
};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let log_dir = match &cli.command {
        Some(Command::Serve { log_dir, .. }) => log_dir.clone(),
        _ => None,
    };
    let _log_guard = init_logging(cli.verbose, log_dir.as_deref())?;

    info!("Starting AI Fiesta");

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let command = cli.command.unwrap_or(Command::Chat {
        remote: None,
        quiet: false,
        fresh: false,
    });

    // Command-line flags win over every config source
    match &command {
        Command::Serve { bind: Some(bind), .. } => config.server.bind = bind.clone(),
        Command::Chat {
            remote: Some(url), ..
        }
        | Command::Ask {
            remote: Some(url), ..
        } => config.client.endpoint = Some(url.clone()),
        _ => {}
    }

    let issues = config.validate();
    if !issues.is_empty() {
        let lines: Vec<String> = issues.iter().map(|i| format!("  - {}", i)).collect();
        bail!("Invalid configuration:\n{}", lines.join("\n"));
    }

    if !config.repl.color {
        colored::control::set_override(false);
    }

    match command {
        Command::Serve { .. } => run_serve(&config).await,
        Command::Chat { quiet, fresh, .. } => run_chat(&config, quiet, fresh).await,
        Command::Ask {
            message,
            output,
            quiet,
            ..
        } => run_ask(&config, &message, output, quiet).await,
        Command::Models => {
            for model in model_catalog() {
                println!("{:<16} {:<32} {}", model.id, model.label, model.model);
            }
            Ok(())
        }
    }
}

/// Install the tracing subscriber.
///
/// `-v` picks the level (`warn`, `info`, `debug`, `trace`); `RUST_LOG` wins
/// when set. With a log directory, a daily rolling file is written as well;
/// the returned guard flushes it on drop.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let Some(dir) = log_dir else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .try_init()?;
        return Ok(None);
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "fiesta.log"));

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()?;
    Ok(Some(guard))
}

// === Dependency Injection ===

fn build_use_case(config: &FileConfig) -> Result<CompareProvidersUseCase> {
    let adapters = build_adapters(&config.providers).context("Failed to build HTTP client")?;
    let mut use_case = CompareProvidersUseCase::new(adapters);

    if let Some(path) = &config.logging.transcript {
        match JsonlConversationLogger::new(path) {
            Some(logger) => {
                info!("Writing transcript to {}", logger.path().display());
                use_case = use_case.with_logger(Arc::new(logger));
            }
            None => warn!("Transcript disabled"),
        }
    }

    Ok(use_case)
}

async fn build_aggregator(config: &FileConfig) -> Result<Arc<dyn Aggregator>> {
    match &config.client.endpoint {
        Some(endpoint) => {
            let client = build_client(Duration::from_secs(config.providers.timeout_secs))
                .context("Failed to build HTTP client")?;
            let remote = HttpAggregatorClient::connect(client, endpoint.clone()).await;
            info!("Using remote aggregator at {}", remote.endpoint());
            Ok(Arc::new(remote))
        }
        None => Ok(Arc::new(build_use_case(config)?)),
    }
}

fn build_store(config: &FileSessionConfig, fresh: bool) -> Arc<dyn SessionStore> {
    let Some(path) = config.store_path() else {
        if config.persist {
            warn!("No data directory found; the session will not be saved");
        }
        return Arc::new(InMemorySessionStore::new());
    };

    let store = JsonFileSessionStore::new(path);
    if fresh && let Err(e) = store.clear() {
        warn!("Could not clear saved session: {}", e);
    }
    Arc::new(store)
}

// === Commands ===

async fn run_serve(config: &FileConfig) -> Result<()> {
    let addr = config.bind_addr()?;
    let use_case = build_use_case(config)?;
    let providers = use_case.provider_keys();

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    println!(
        "AI Fiesta API on http://{} ({})",
        listener.local_addr()?,
        ConsoleFormatter::format_providers(&providers)
    );

    tokio::select! {
        result = serve(listener, AppState::new(use_case)) => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down"),
    }
    Ok(())
}

async fn run_chat(config: &FileConfig, quiet: bool, fresh: bool) -> Result<()> {
    let aggregator = build_aggregator(config).await?;
    let providers = aggregator.providers();
    let store = build_store(&config.session, fresh);
    let service = ChatSessionService::new(aggregator, store, config.session.to_settings());

    let mut repl = ChatRepl::new(service, providers)
        .with_progress(!quiet && config.repl.show_progress)
        .with_history_file(config.repl.history_file.clone());

    repl.run().await?;
    Ok(())
}

async fn run_ask(config: &FileConfig, message: &str, output: OutputFormat, quiet: bool) -> Result<()> {
    let aggregator = build_aggregator(config).await?;
    let conversation = Conversation::from_user_input(message)?;

    let record = if quiet || output == OutputFormat::Json {
        aggregator.aggregate(&conversation).await
    } else if std::io::stderr().is_terminal() {
        let progress = ProgressReporter::new();
        aggregator
            .aggregate_with_progress(&conversation, &progress)
            .await
    } else {
        aggregator
            .aggregate_with_progress(&conversation, &SimpleProgress)
            .await
    };

    match (output, &record) {
        (OutputFormat::Json, _) => println!("{}", ConsoleFormatter::format_json(&record)),
        (OutputFormat::Text, ResponseRecord::Error(message)) => bail!("{}", message),
        (OutputFormat::Text, _) => println!("{}", ConsoleFormatter::format_record(&record)),
    }

    if let ResponseRecord::Error(message) = record {
        bail!("{}", message);
    }
    Ok(())
}
