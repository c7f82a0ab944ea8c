//! DocScan - Identity document scanner
//!
//! Photograph or open an image of an identity document, locate the
//! document region, OCR it, extract the CNP and series, and send the
//! crop plus fields to a collection server.

mod app;
mod capture;
mod config;
mod extract;
mod shared;
mod storage;
mod ui;
mod upload;
mod vision;

use anyhow::Result;
use clap::Parser;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::capture::CameraCapture;
use crate::config::AppConfig;
use crate::shared::SharedAppState;

/// DocScan - Identity document scanner
#[derive(Parser, Debug)]
#[command(name = "docscan")]
#[command(about = "Scan identity documents, extract CNP and series, upload to a server")]
struct Args {
    /// Camera device index, overriding the configured one
    #[arg(short, long)]
    camera: Option<u32>,

    /// List available cameras and exit
    #[arg(long)]
    list_cameras: bool,

    /// Path to a configuration file (default: the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if args.list_cameras {
        println!("Available cameras:");
        match CameraCapture::list_devices() {
            Ok(devices) if devices.is_empty() => println!("  No cameras detected"),
            Ok(devices) => {
                for device in devices {
                    println!("  {device}");
                }
            }
            Err(e) => println!("  Enumeration failed: {e}"),
        }
        return Ok(());
    }

    info!("DocScan starting...");

    let mut config = load_or_create_config(args.config.as_deref());

    if let Some(camera_index) = args.camera {
        config.camera.device_index = camera_index;
    }

    let shared_state = Arc::new(RwLock::new(SharedAppState::new(config)));

    ui::run_app(shared_state)?;

    info!("DocScan shutdown complete");

    Ok(())
}

/// Load configuration from file or create default
fn load_or_create_config(override_path: Option<&std::path::Path>) -> AppConfig {
    if let Some(path) = override_path {
        match config::load_config(path) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", path);
                return config;
            }
            Err(e) => {
                tracing::warn!("Could not load {:?}: {}; using defaults", path, e);
                return AppConfig::default();
            }
        }
    }

    if let Ok(config_dir) = storage::get_config_dir() {
        let config_path = config_dir.join("config.toml");
        if config_path.exists() {
            if let Ok(config) = config::load_config(&config_path) {
                info!("Loaded configuration from {:?}", config_path);
                return config;
            }
        }
    }
    info!("Using default configuration");
    AppConfig::default()
}
