//! Subtitle Gateway
//!
//! Entry point: runs the HTTP gateway, translates a single local file, or
//! writes a starter configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use subtitle_gateway::cli::{Args, Commands};
use subtitle_gateway::config::Config;
use subtitle_gateway::gateway::{Gateway, TranslationRequest};
use subtitle_gateway::server;
use subtitle_gateway::subtitle::UploadedFile;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.verbose)?;

    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    match args.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            server::serve(config).await?;
        }
        Commands::Translate { input, output, api_key } => {
            translate_file(&config, &input, output, api_key).await?;
        }
        Commands::InitConfig { output } => {
            Config::default().save_to_file(&output)?;
            println!("Wrote default configuration to {}", output.display());
        }
    }

    Ok(())
}

/// Run one local file through the gateway and write the translation to disk
async fn translate_file(
    config: &Config,
    input: &Path,
    output: Option<PathBuf>,
    api_key: String,
) -> Result<()> {
    info!("Translating subtitles: {}", input.display());

    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .context("input path has no file name")?;
    let bytes = tokio::fs::read(input)
        .await
        .with_context(|| format!("failed to read {}", input.display()))?;

    let gateway = Gateway::from_config(config)?;
    let translated = gateway
        .handle(TranslationRequest {
            api_key,
            file: UploadedFile::new(name, bytes)?,
        })
        .await?;

    let output = output.unwrap_or_else(|| input.with_file_name(&translated.filename));
    tokio::fs::write(&output, translated.text)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!("Translated subtitles written to {}", output.display());
    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".subtitle-gateway").join("log");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = rolling::daily(&log_dir, "subtitle-gateway.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // The writer must outlive every span, including those of in-flight requests
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("subtitle-gateway.log").display());

    Ok(())
}
