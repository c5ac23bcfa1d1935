//! Application entry point for the plant viewer.
//!
//! This binary sets up logging and eframe/egui, then delegates all
//! interactive logic and rendering to [`Viewer`] from the `viewer` module.

mod viewer;

use plant_core::PlantConfig;
use tracing_subscriber::EnvFilter;
use viewer::Viewer;

/// Starts the native eframe application.
///
/// Log verbosity follows `RUST_LOG` and defaults to `info`. A plant is grown
/// from [`PlantConfig::default`]; if that configuration is rejected the app
/// fails to start with the configuration error.
fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Verlet Plant",
        options,
        Box::new(|_cc| Ok(Box::new(Viewer::new(PlantConfig::default())?))),
    )
}
