//! Kotoba - Command-Prefixed Translation Adapter
//!
//! Command-line host for the translation pipeline: loads configuration, wires the
//! HTTP transport and prints the rendered result.

use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing::{info, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use kotoba::cli::{Args, Commands};
use kotoba::config::{Config, ProviderConfig};
use kotoba::error::KotobaError;
use kotoba::strategy::{ResponseShape, StrategyTable};
use kotoba::{ReqwestTransport, Translator};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.verbose)?;

    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new("kotoba.toml").exists() {
                info!("Found kotoba.toml in current directory, loading...");
                Config::from_file("kotoba.toml")?
            } else {
                Config::default()
            }
        }
    }
    .with_env_overrides();

    match args.command {
        Commands::Translate {
            text,
            from,
            to,
            provider,
            model,
        } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buffer = String::new();
                    tokio::io::stdin().read_to_string(&mut buffer).await?;
                    buffer
                }
            };

            let mut config = config;
            if let Some(provider) = provider {
                config.provider = provider;
            }
            if model.is_some() {
                config.model = model;
            }

            let transport = ReqwestTransport::new(Duration::from_secs(config.timeout_secs))?;
            let translator = Translator::new(config, transport);
            println!("{}", translator.translate(&text, &from, &to).await);
        }
        Commands::Strategies => {
            let table = StrategyTable;
            println!("{:<10} {:<10} {:<12}", "Command", "Reply", "Alias of");
            println!("{}", "-".repeat(34));
            for key in table.keys() {
                let Some(strategy) = table.get(key) else {
                    continue;
                };
                let shape = match strategy.shape() {
                    ResponseShape::Text if strategy.is_passthrough() => "text (raw)",
                    ResponseShape::Text => "text",
                    ResponseShape::Json => "json",
                };
                let alias = if strategy.key == key { "" } else { strategy.key };
                println!("{:<10} {:<10} {:<12}", key, shape, alias);
            }
            println!("\nProviders: {}", ProviderConfig::NAMES.join(", "));
        }
        Commands::InitConfig { path } => {
            if path.exists() {
                return Err(KotobaError::Config(format!(
                    "Refusing to overwrite existing file: {}",
                    path.display()
                ))
                .into());
            }
            Config::default().save_to_file(&path)?;
            println!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".kotoba").join("log");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = rolling::daily(&log_dir, "kotoba.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // the guard flushes on drop; keep it for the whole process
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // stdout carries the translation, so console logs go to stderr
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(verbose)
        .with_line_number(verbose);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    let console_filter = if verbose { Level::DEBUG } else { Level::WARN };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer.with_filter(LevelFilter::from_level(console_filter)))
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        "Logging initialized - console: {}, file: {}",
        log_level,
        log_dir.join("kotoba.log").display()
    );

    Ok(())
}
