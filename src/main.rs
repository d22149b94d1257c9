//! veriscan - live camera OCR with barcode cross-checking
//!
//! Previews a camera feed, runs OCR on a user-selected region of interest,
//! decodes barcodes in the frame, and checks the decoded value against a
//! persisted barcode-to-text lookup table.

mod app;
mod capture;
mod config;
mod error;
mod geometry;
mod session;
mod storage;
mod vision;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::VeriscanApp;
use crate::capture::CameraSource;
use crate::config::AppConfig;
use crate::storage::LookupStore;
use crate::vision::{QrReader, TesseractOcr, VisionPipeline};

/// veriscan - camera OCR and barcode verification
#[derive(Parser, Debug)]
#[command(name = "veriscan")]
#[command(about = "Live camera preview with ROI OCR and barcode cross-checking")]
struct Args {
    /// Camera device index to open
    #[arg(short, long)]
    camera: Option<u32>,

    /// List available cameras and exit
    #[arg(long)]
    list_cameras: bool,

    /// Path to the lookup database (defaults to the platform data dir)
    #[arg(long)]
    db: Option<PathBuf>,
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
        let devices = capture::list_cameras()?;
        if devices.is_empty() {
            println!("  No cameras detected");
        } else {
            for device in &devices {
                println!("  [{}] {}", device.index, device.name);
            }
        }
        return Ok(());
    }

    info!("veriscan starting...");

    let mut config = load_or_create_config();
    if let Some(index) = args.camera {
        config.camera.index = index;
    }
    if let Some(db) = args.db {
        config.storage.db_path = Some(db);
    }

    let db_path = match &config.storage.db_path {
        Some(path) => path.clone(),
        None => storage::default_db_path()?,
    };
    let store = LookupStore::open(&db_path)
        .with_context(|| format!("failed to open lookup database {:?}", db_path))?;
    info!(path = %db_path.display(), "lookup database opened");

    let cameras = capture::list_cameras().unwrap_or_default();
    let camera = CameraSource::open(config.camera.index)?;

    let recognizer = TesseractOcr::new(&config.ocr.language)?;
    let pipeline = VisionPipeline::new(
        Box::new(recognizer),
        Box::new(QrReader::new()),
        config.canvas(),
    );

    let options = VeriscanApp::options(&config);
    let app = VeriscanApp::new(config, store, pipeline, camera, cameras)?;

    eframe::run_native("veriscan", options, Box::new(move |_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("window error: {e}"))?;

    info!("veriscan shutdown complete");
    Ok(())
}

/// Load configuration from the platform config dir or fall back to defaults.
fn load_or_create_config() -> AppConfig {
    if let Ok(config_dir) = storage::get_config_dir() {
        let config_path = config_dir.join("config.toml");
        if config_path.exists() {
            if let Ok(config) = config::load_config(&config_path) {
                info!("Loaded configuration from {:?}", config_path);
                return config;
            }
        } else if let Err(e) = config::save_config(&AppConfig::default(), &config_path) {
            tracing::debug!(error = %e, "could not write default config");
        }
    }
    info!("Using default configuration");
    AppConfig::default()
}
