//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/scenemetrics/) and project (.scenemetrics/) level configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{discovery, export, hierarchy, rendering};
use crate::types::{Result, SceneMetricsError};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Analyzer toggles and thresholds
    pub analysis: AnalyzerSettings,

    /// CSV export settings
    pub export: ExportConfig,

    /// Scene file discovery settings
    pub discovery: DiscoveryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            analysis: AnalyzerSettings::default(),
            export: ExportConfig::default(),
            discovery: DiscoveryConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `SceneMetricsError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.analysis.thresholds.max_texture_size == 0 {
            return Err(SceneMetricsError::Config(
                "analysis.thresholds.max_texture_size must be greater than 0".to_string(),
            ));
        }

        if self.export.file_prefix.trim().is_empty() {
            return Err(SceneMetricsError::Config(
                "export.file_prefix must not be empty".to_string(),
            ));
        }

        if self.export.float_precision > export::MAX_FLOAT_PRECISION {
            return Err(SceneMetricsError::Config(format!(
                "export.float_precision must be at most {}, got {}",
                export::MAX_FLOAT_PRECISION,
                self.export.float_precision
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Analyzer Settings
// =============================================================================

/// Everything an analyzer may consult: which categories run and the
/// thresholds they compare against
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AnalyzerSettings {
    pub toggles: Toggles,
    pub thresholds: Thresholds,
}

impl AnalyzerSettings {
    pub fn is_enabled(&self, toggle: Toggle) -> bool {
        self.toggles.get(toggle)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Thresholds {
    /// Nodes deeper than this are flagged
    pub max_hierarchy_depth: u32,
    /// Textures wider or taller than this are flagged
    pub max_texture_size: u32,
    /// Scene-wide triangle budget
    pub max_triangle_count: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_hierarchy_depth: hierarchy::DEFAULT_MAX_DEPTH,
            max_texture_size: rendering::DEFAULT_MAX_TEXTURE_SIZE,
            max_triangle_count: rendering::DEFAULT_MAX_TRIANGLE_COUNT,
        }
    }
}

macro_rules! toggles {
    ($($variant:ident => $field:ident, $name:literal;)*) => {
        /// Per-analyzer enable flags. All default to `true`.
        #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
        #[serde(default)]
        pub struct Toggles {
            $(pub $field: bool,)*
        }

        impl Default for Toggles {
            fn default() -> Self {
                Self { $($field: true,)* }
            }
        }

        /// Names every field of [`Toggles`]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Toggle {
            $($variant,)*
        }

        impl Toggle {
            pub const ALL: &'static [Toggle] = &[$(Toggle::$variant,)*];

            /// Stable kebab-case name used on the command line
            pub fn name(self) -> &'static str {
                match self {
                    $(Toggle::$variant => $name,)*
                }
            }
        }

        impl Toggles {
            pub fn get(&self, toggle: Toggle) -> bool {
                match toggle {
                    $(Toggle::$variant => self.$field,)*
                }
            }

            pub fn set(&mut self, toggle: Toggle, enabled: bool) {
                match toggle {
                    $(Toggle::$variant => self.$field = enabled,)*
                }
            }
        }
    };
}

toggles! {
    NodeCounts => node_counts, "node-counts";
    HierarchyDepth => hierarchy_depth, "hierarchy-depth";
    EmptyNodes => empty_nodes, "empty-nodes";
    Renderers => renderers, "renderers";
    Materials => materials, "materials";
    Shaders => shaders, "shaders";
    Textures => textures, "textures";
    Cameras => cameras, "cameras";
    DrawCalls => draw_calls, "draw-calls";
    Batching => batching, "batching";
    GpuInstancing => gpu_instancing, "gpu-instancing";
    Colliders => colliders, "colliders";
    Rigidbodies => rigidbodies, "rigidbodies";
    PrefabInstances => prefab_instances, "prefab-instances";
    ParticleSystems => particle_systems, "particle-systems";
    Lights => lights, "lights";
    ReflectionProbes => reflection_probes, "reflection-probes";
    AudioSources => audio_sources, "audio-sources";
    ComponentDistribution => component_distribution, "component-distribution";
}

impl Toggles {
    pub fn set_all(&mut self, enabled: bool) {
        for &toggle in Toggle::ALL {
            self.set(toggle, enabled);
        }
    }

    /// Enable exactly the given toggles and disable the rest
    pub fn only(&mut self, enabled: &[Toggle]) {
        self.set_all(false);
        for &toggle in enabled {
            self.set(toggle, true);
        }
    }

    pub fn enabled(&self) -> impl Iterator<Item = Toggle> + '_ {
        Toggle::ALL.iter().copied().filter(|t| self.get(*t))
    }
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Toggle {
    type Err = SceneMetricsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Toggle::ALL
            .iter()
            .copied()
            .find(|t| t.name() == normalized)
            .ok_or_else(|| SceneMetricsError::UnknownToggle(s.to_string()))
    }
}

// =============================================================================
// Export Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExportConfig {
    /// File name prefix; the export date is appended
    pub file_prefix: String,

    /// Directory the CSV is written to
    pub output_dir: PathBuf,

    /// Fractional digits kept for float metrics
    pub float_precision: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_prefix: export::DEFAULT_FILE_PREFIX.to_string(),
            output_dir: PathBuf::from("."),
            float_precision: export::DEFAULT_FLOAT_PRECISION,
        }
    }
}

// =============================================================================
// Discovery Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// File suffixes recognized as scene documents
    pub extensions: Vec<String>,

    /// Glob patterns to exclude
    pub exclude: Vec<String>,

    /// Maximum scene file size in bytes
    pub max_file_size: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            extensions: discovery::DEFAULT_SCENE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclude: Vec::new(),
            max_file_size: discovery::DEFAULT_MAX_FILE_SIZE,
        }
    }
}
