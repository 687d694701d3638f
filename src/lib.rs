//! SceneMetrics - Scene Analysis and CSV Export
//!
//! Walks game scene graphs, runs a registry of category analyzers over every
//! node and exports the per-scene results as one comparison table.
//!
//! ## Core Features
//!
//! - **Scene Model**: node hierarchy with typed attachments and shared resources
//! - **Analyzer Registry**: seventeen builtin categories, individually toggled
//! - **Fault Isolation**: a failing or panicking analyzer never aborts a scene
//! - **Aggregation**: union of metric keys across scenes, `N/A` where absent
//! - **CSV Export**: fully quoted, deterministic row order
//!
//! ## Quick Start
//!
//! ```ignore
//! use scenemetrics::{AnalyzerSettings, SceneMetricsCollector, load_scene};
//!
//! let scene = load_scene(Path::new("levels/forest.scene.yaml"))?;
//! let metrics = SceneMetricsCollector::default()
//!     .analyze_scene(&scene, &AnalyzerSettings::default())?;
//! println!("{:?}", metrics.value("Node Counts", "Total Nodes"));
//! ```
//!
//! ## Modules
//!
//! - [`scene`]: scene graph model, YAML/JSON loading, file discovery
//! - [`analyzer`]: analyzer trait, registry, collector, builtin analyzers
//! - [`export`]: multi-scene aggregation and CSV writing
//! - [`config`]: toggles, thresholds and layered configuration

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod export;
pub mod scene;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{AnalyzerSettings, Config, ConfigLoader, Thresholds, Toggle, Toggles};

// Error Types
pub use types::error::{ErrorKind, Result, ResultExt, SceneMetricsError};

// Results
pub use types::{MetricMap, MetricValue, SceneMetrics};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use analyzer::{AnalyzerRegistry, SceneAnalyzer, SceneMetricsCollector, flatten_scene};
pub use export::{
    AggregatedTable, CsvExporter, ExportDestination, ExportOutcome, aggregate_scenes, export,
};
pub use scene::{Node, NodeId, SceneGraph, SceneScanner, load_scene, parse_scene};
