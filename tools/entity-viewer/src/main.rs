//! Entity Viewer
//!
//! Runs the Kanan entity viewer in a desktop window over a synthetic game
//! image, for working on the overlay without the game attached.
//!
//! # Usage
//!
//! ```bash
//! # Default population, config from the platform config directory
//! entity-viewer
//!
//! # Explicit layout/config file and a larger crowd
//! entity-viewer --config kanan.toml --characters 200 --items 500
//!
//! # Install a layout file as the default config
//! entity-viewer --config kanan.toml --save-config
//! ```

mod app;
mod cli;
mod world;

use anyhow::Result;
use clap::Parser;

use app::ViewerApp;
use cli::Cli;
use world::DemoWorld;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => kanan_core::config::load_from(path)?,
        None => kanan_core::config::load(),
    };

    if cli.save_config {
        kanan_core::config::save(&config)?;
        match kanan_core::config::config_path() {
            Some(path) => tracing::info!("Config written to {}", path.display()),
            None => tracing::warn!("No config directory on this platform, nothing written"),
        }
        return Ok(());
    }

    let world = DemoWorld::generate(config.layout.clone(), cli.characters, cli.items, cli.seed)?;
    tracing::info!(
        "Synthetic game ready: {} characters, {} items (seed {})",
        cli.characters,
        cli.items,
        cli.seed
    );

    app::run(ViewerApp::new(world, &config.viewer, cli.frozen))
}
