//! Global Constants
//!
//! Centralized constants for analysis thresholds and export formatting.
//! All magic numbers should be defined here with documentation.

/// Hierarchy analysis constants
pub mod hierarchy {
    /// Number of depth slots kept in the depth histogram.
    /// Deeper nodes still count toward max depth and average depth.
    pub const DEPTH_HISTOGRAM_CEILING: usize = 100;

    /// Default recommended maximum hierarchy depth
    pub const DEFAULT_MAX_DEPTH: u32 = 8;
}

/// Rendering analysis constants
pub mod rendering {
    /// Triangle count above which a single renderer is considered high-poly
    pub const HIGH_POLY_TRIANGLES: u64 = 5_000;

    /// Vertex ceiling for dynamic batching candidates
    pub const DYNAMIC_BATCHING_VERTEX_LIMIT: u32 = 900;

    /// Default recommended maximum texture dimension (pixels)
    pub const DEFAULT_MAX_TEXTURE_SIZE: u32 = 2048;

    /// Default recommended triangle budget for a whole scene
    pub const DEFAULT_MAX_TRIANGLE_COUNT: u64 = 100_000;

    /// Bytes per pixel assumed for unrecognized texture formats
    pub const DEFAULT_BYTES_PER_PIXEL: u64 = 4;

    /// Bytes per pixel approximation for block-compressed formats
    pub const COMPRESSED_BYTES_PER_PIXEL: u64 = 1;

    /// Bytes in one mebibyte
    pub const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;
}

/// Effects analysis constants
pub mod effects {
    /// Max particle count above which a system is flagged
    pub const HIGH_PARTICLE_COUNT: u32 = 1_000;
}

/// Component census constants
pub mod components {
    /// Label used for attachments whose type cannot be resolved
    pub const MISSING_TYPE_LABEL: &str = "Missing Script";
}

/// Export constants
pub mod export {
    /// Cell text for a metric a scene did not report
    pub const MISSING_CELL: &str = "N/A";

    /// Default file name prefix for full reports
    pub const DEFAULT_FILE_PREFIX: &str = "SceneMetrics";

    /// File name prefix used by the component census preset
    pub const COMPONENT_FILE_PREFIX: &str = "ComponentCounts";

    /// Default fractional digits for float metrics
    pub const DEFAULT_FLOAT_PRECISION: usize = 4;

    /// Upper bound accepted for float precision
    pub const MAX_FLOAT_PRECISION: usize = 12;

    /// Fixed leading header columns
    pub const CATEGORY_HEADER: &str = "Category";
    pub const METRIC_HEADER: &str = "Metric";
}

/// Scene discovery constants
pub mod discovery {
    /// Default maximum scene file size (64MB)
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 64 * 1024 * 1024;

    /// File suffixes recognized as scene documents
    pub const DEFAULT_SCENE_EXTENSIONS: &[&str] = &["scene.yaml", "scene.yml", "scene.json"];

    /// Directories skipped while scanning for scenes
    pub const DEFAULT_SKIP_DIRS: &[&str] = &["target", ".git", "node_modules", "build", "dist"];

    /// Name used when a scene path yields no usable name
    pub const UNKNOWN_SCENE_NAME: &str = "UnknownScene";
}
