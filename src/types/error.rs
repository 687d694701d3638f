//! Unified Error Type System
//!
//! Centralized error types for the entire crate.
//!
//! ## Error Kinds
//!
//! - **InvalidInput**: scene handle is invalid, or there is nothing to export
//! - **AnalyzerFault**: a single analyzer failed (isolated by the collector)
//! - **ExportFault**: writing the report failed
//! - **Configuration**: configuration could not be loaded or is out of range
//! - **System**: I/O and (de)serialization failures from dependencies
//!
//! A declined export destination is not an error; see
//! [`ExportOutcome::Cancelled`](crate::export::ExportOutcome::Cancelled).

use thiserror::Error;

// =============================================================================
// Error Kinds
// =============================================================================

/// Error kinds used by callers to decide user-visible messaging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    AnalyzerFault,
    ExportFault,
    Configuration,
    System,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput => write!(f, "INVALID_INPUT"),
            Self::AnalyzerFault => write!(f, "ANALYZER_FAULT"),
            Self::ExportFault => write!(f, "EXPORT_FAULT"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::System => write!(f, "SYSTEM"),
        }
    }
}

impl ErrorKind {
    /// Whether a multi-scene run may continue after this kind of error
    pub fn is_scene_local(&self) -> bool {
        matches!(self, Self::InvalidInput | Self::AnalyzerFault)
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum SceneMetricsError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // -------------------------------------------------------------------------
    // Scene Errors
    // -------------------------------------------------------------------------
    #[error("Invalid scene '{scene}': {reason}")]
    InvalidScene { scene: String, reason: String },

    #[error("Failed to load scene {path}: {message}")]
    SceneLoad { path: String, message: String },

    // -------------------------------------------------------------------------
    // Analysis Errors
    // -------------------------------------------------------------------------
    #[error("Analyzer '{category}' failed: {message}")]
    Analyzer { category: String, message: String },

    // -------------------------------------------------------------------------
    // Export Errors
    // -------------------------------------------------------------------------
    #[error("Failed to write report {path}: {message}")]
    Export { path: String, message: String },

    #[error("No metrics data to export")]
    NothingToExport,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Unknown toggle '{0}' (run 'scenemetrics toggles' to list them)")]
    UnknownToggle(String),

    #[error("{context}: {message}")]
    Context { context: String, message: String },
}

pub type Result<T> = std::result::Result<T, SceneMetricsError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl SceneMetricsError {
    /// Create an invalid scene error
    pub fn invalid_scene(scene: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidScene {
            scene: scene.into(),
            reason: reason.into(),
        }
    }

    /// Create an analyzer fault
    pub fn analyzer(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Analyzer {
            category: category.into(),
            message: message.into(),
        }
    }

    /// Create an export fault
    pub fn export(path: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Export {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a scene load error
    pub fn scene_load(path: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::SceneLoad {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Classify this error per the crate's error taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidScene { .. } | Self::SceneLoad { .. } | Self::NothingToExport => {
                ErrorKind::InvalidInput
            }
            Self::Analyzer { .. } => ErrorKind::AnalyzerFault,
            Self::Export { .. } | Self::Csv(_) => ErrorKind::ExportFault,
            Self::Config(_) | Self::UnknownToggle(_) => ErrorKind::Configuration,
            Self::Io(_) | Self::Json(_) | Self::Yaml(_) | Self::Context { .. } => ErrorKind::System,
        }
    }
}

/// Context extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> Result<T>;

    /// Add context using a closure (lazy evaluation)
    fn with_context_fn<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| SceneMetricsError::Context {
            context: context.into(),
            message: e.to_string(),
        })
    }

    fn with_context_fn<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| SceneMetricsError::Context {
            context: f().into(),
            message: e.to_string(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
