//! Image Identifier - describe pictures with a multimodal model
//!
//! Pick an image, add an optional prompt, and the description returned by the
//! `generateContent` endpoint is shown and kept in a session history.

mod analysis;
mod compose;
mod config;
mod storage;
mod ui;

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::AppConfig;

/// Environment variable consulted when no `--api-key` is given
const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Image Identifier - describe pictures with a multimodal model
#[derive(Parser, Debug)]
#[command(name = "image-identifier")]
#[command(about = "Send an image and a prompt to a multimodal model and keep the answers")]
struct Args {
    /// Configuration file (defaults to the per-user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API key for the inference endpoint
    #[arg(long)]
    api_key: Option<String>,

    /// Image to load at start-up
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Start in dark mode
    #[arg(long)]
    dark: bool,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    init_config: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Image Identifier starting...");

    let mut config = load_or_create_config(args.config.as_deref());
    if args.dark {
        config.ui.dark_mode = true;
    }

    if args.init_config {
        let path = match args.config {
            Some(path) => path,
            None => storage::default_config_path()?,
        };
        config::save_config(&config, &path)?;
        println!("Configuration written to {}", path.display());
        return Ok(());
    }

    let api_key = resolve_api_key(
        args.api_key,
        std::env::var(API_KEY_ENV).ok(),
        config.api.api_key.clone(),
    );
    if api_key.is_empty() {
        warn!(
            "No API key configured; pass --api-key, set {} or add api.api_key to the config",
            API_KEY_ENV
        );
    }

    let endpoint = config.endpoint_url(&api_key);
    info!(
        "Using model {} at {}",
        config.api.model, config.api.base_url
    );

    ui::run(config, endpoint, args.image)?;

    info!("Image Identifier shutdown complete");

    Ok(())
}

/// Load configuration from file or fall back to defaults
fn load_or_create_config(explicit: Option<&Path>) -> AppConfig {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => storage::default_config_path().ok(),
    };

    if let Some(path) = path {
        if path.exists() {
            match config::load_config(&path) {
                Ok(config) => {
                    info!("Loaded configuration from {:?}", path);
                    return config;
                }
                Err(e) => warn!("Ignoring unreadable configuration {:?}: {}", path, e),
            }
        } else if explicit.is_some() {
            warn!("Configuration file {:?} does not exist", path);
        }
    }

    info!("Using default configuration");
    AppConfig::default()
}

/// Pick the first non-empty key: command line, then environment, then config file
fn resolve_api_key(
    flag: Option<String>,
    env: Option<String>,
    configured: Option<String>,
) -> String {
    [flag, env, configured]
        .into_iter()
        .flatten()
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
        .unwrap_or_default()
}
