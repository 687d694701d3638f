//! Init Command
//!
//! Initialize SceneMetrics in the current directory.

use crate::config::ConfigLoader;
use crate::types::{Result, SceneMetricsError};

pub fn run(force: bool) -> Result<()> {
    if ConfigLoader::is_project_initialized() && !force {
        return Err(SceneMetricsError::Config(
            "Already initialized. Use --force to overwrite.".to_string(),
        ));
    }

    let dir = ConfigLoader::init_project(force)?;

    // Initialize global config if not exists (don't force overwrite)
    if let Err(e) = ConfigLoader::init_global(false) {
        tracing::debug!("Global config init skipped: {}", e);
    }

    println!("✓ Initialized SceneMetrics in {}/", dir.display());
    println!();
    println!("Next steps:");
    println!("  1. Adjust thresholds and toggles in .scenemetrics/config.toml");
    println!("  2. Run 'scenemetrics analyze' to export metrics for every scene");

    Ok(())
}
