//! CLI Common Utilities
//!
//! Shared configuration loading and argument resolution for CLI commands.

use std::path::{Path, PathBuf};

use crate::config::{Config, ConfigLoader, Toggle};
use crate::scene::{SceneScanner, descriptive_scene_name};
use crate::types::{Result, SceneMetricsError};

/// Command execution context
///
/// Holds the effective configuration for one invocation.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: Config,
    pub working_dir: PathBuf,
}

impl CommandContext {
    /// Load the layered configuration, or a single file when one is given
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let config = match config_file {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        let working_dir = std::env::current_dir()?;
        Ok(Self {
            config,
            working_dir,
        })
    }
}

/// Parse toggle names given on the command line
pub fn parse_toggles(names: &[String]) -> Result<Vec<Toggle>> {
    names.iter().map(|n| n.parse()).collect()
}

/// Resolve the scenes to analyze as (column name, path) pairs.
///
/// Explicit paths are used as given (directories are scanned); with no
/// paths the scan root is scanned.
pub fn resolve_scenes(
    explicit: &[PathBuf],
    root: Option<&Path>,
    config: &Config,
) -> Result<Vec<(String, PathBuf)>> {
    let base = root.unwrap_or(Path::new("."));
    let targets: Vec<PathBuf> = if explicit.is_empty() {
        vec![base.to_path_buf()]
    } else {
        explicit.to_vec()
    };

    let mut scenes = Vec::new();
    for target in targets {
        if target.is_dir() {
            let scanner = SceneScanner::new(&target)
                .with_extensions(config.discovery.extensions.clone())
                .with_exclude(config.discovery.exclude.clone())
                .with_max_file_size(config.discovery.max_file_size);
            for path in scanner.scan()? {
                scenes.push((descriptive_scene_name(&target, &path), path));
            }
        } else {
            scenes.push((descriptive_scene_name(base, &target), target));
        }
    }

    if scenes.is_empty() {
        return Err(SceneMetricsError::Config(format!(
            "No scene files found under {}",
            base.display()
        )));
    }
    Ok(scenes)
}
