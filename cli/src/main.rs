//! CLI entrypoint for eunomia
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use eunomia_application::{
    ChannelMonitor, GovernanceLogger, NoGovernanceLogger, RulesSource, RunBotUseCase, SessionEnd,
};
use eunomia_domain::ProposalRecord;
use eunomia_infrastructure::{
    ChannelFileLog, ConfigLoader, ConfigRulesSource, FileConfig, IrcConnection,
    JsonlGovernanceLogger, ProposalFileLog,
};
use eunomia_presentation::{Cli, ConsoleFormatter, StartupSummary};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    if let Some(path) = &cli.print_records {
        return print_records(path);
    }

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).map_err(|e| anyhow::anyhow!("{}", e))?
    };
    apply_overrides(&mut config, &cli);

    let warnings = match config.check() {
        Ok(warnings) => warnings,
        Err(e) => {
            eprintln!("{}", ConsoleFormatter::issues(&e.issues));
            bail!("configuration has {} error(s)", e.issues.len());
        }
    };
    if !warnings.is_empty() {
        eprintln!("{}", ConsoleFormatter::issues(&warnings));
    }

    let _log_guard = init_tracing(cli.verbose, &config);

    info!("Starting eunomia {}", env!("CARGO_PKG_VERSION"));

    // === Dependency Injection ===
    let log_dir = config.logging.directory.clone();
    let events: Arc<dyn GovernanceLogger> = match config.logging.events_path() {
        Some(path) => match JsonlGovernanceLogger::open(&path) {
            Some(logger) => {
                info!("Governance events: {}", logger.path().display());
                Arc::new(logger)
            }
            None => Arc::new(NoGovernanceLogger),
        },
        None => Arc::new(NoGovernanceLogger),
    };
    let rules_source: Arc<dyn RulesSource> = if cli.no_config {
        Arc::new(ConfigRulesSource::defaults_only())
    } else {
        Arc::new(ConfigRulesSource::new(cli.config.clone()))
    };

    let params = config.bot_params();
    let rules = config.rules();
    let monitor = ChannelMonitor::new(
        params.channel.clone(),
        rules,
        Arc::new(ProposalFileLog::new(&log_dir)),
    )
    .with_channel_log(Arc::new(ChannelFileLog::new(&log_dir)))
    .with_governance_logger(events);

    if !cli.quiet {
        println!(
            "{}",
            ConsoleFormatter::banner(&StartupSummary {
                server: &config.irc.server,
                port: config.irc.port,
                params: &params,
                rules: &rules,
                log_dir: &log_dir,
            })
        );
    }

    let mut bot = RunBotUseCase::new(params, monitor, rules_source);

    let cancel = CancellationToken::new();
    spawn_signal_handler(cancel.clone());

    let reconnect_delay = Duration::from_secs(config.irc.reconnect_delay_seconds);
    loop {
        let connection = tokio::select! {
            _ = cancel.cancelled() => break,
            connection = IrcConnection::connect(&config.irc) => connection,
        };

        match connection {
            Ok(mut connection) => match bot.run(&mut connection, &cancel).await {
                Ok(SessionEnd::Shutdown) => break,
                Ok(SessionEnd::Disconnected) => warn!("Disconnected from {}", config.irc.server),
                Err(e) => warn!("Session ended: {}", e),
            },
            Err(e) => warn!("Could not connect to {}: {}", config.irc.server, e),
        }

        info!("Reconnecting in {}s", reconnect_delay.as_secs());
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(reconnect_delay) => {}
        }
    }

    if !cli.quiet {
        eprintln!("{}", ConsoleFormatter::status(&bot.monitor().status()));
    }
    info!("Stopped");
    Ok(())
}

/// Command-line flags take precedence over every configuration source.
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(server) = &cli.server {
        config.irc.server = server.clone();
    }
    if let Some(port) = cli.port {
        config.irc.port = port;
    }
    if let Some(channel) = &cli.channel {
        config.irc.channel = channel.clone();
    }
    if let Some(nick) = &cli.nick {
        config.irc.nick = nick.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.logging.directory = dir.clone();
    }
    if cli.announce {
        config.legislation.announce = true;
    }
}

/// Stderr output filtered by `-v` count (or `RUST_LOG`), plus a daily
/// rolling file in the log directory.
fn init_tracing(verbose: u8, config: &FileConfig) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = if config.logging.file {
        let appender = tracing_appender::rolling::daily(&config.logging.directory, "eunomia.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(writer);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

fn spawn_signal_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown requested");
        cancel.cancel();
    });
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        Err(e) => {
            warn!("Could not install SIGTERM handler: {}", e);
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn print_records(path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    let records = ProposalRecord::parse_all(&text)
        .with_context(|| format!("{} is not a proposal log", path.display()))?;
    for record in &records {
        println!("{}", ConsoleFormatter::record(record));
    }
    Ok(())
}
