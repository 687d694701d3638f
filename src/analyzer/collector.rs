//! Scene Metrics Collector
//!
//! Runs every enabled analyzer of a registry over one scene. The flat object
//! list is built once and shared. A failing analyzer (error or panic) is
//! logged with its category and left out of the result; the others still run.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error, info};

use super::{AnalyzerRegistry, SceneAnalyzer, flatten_scene};
use crate::config::AnalyzerSettings;
use crate::scene::{NodeId, SceneGraph};
use crate::types::{MetricMap, Result, SceneMetrics, SceneMetricsError};

pub struct SceneMetricsCollector<'r> {
    registry: &'r AnalyzerRegistry,
}

impl Default for SceneMetricsCollector<'static> {
    fn default() -> Self {
        Self::new(AnalyzerRegistry::builtin())
    }
}

impl<'r> SceneMetricsCollector<'r> {
    pub fn new(registry: &'r AnalyzerRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &AnalyzerRegistry {
        self.registry
    }

    /// Analyze one scene.
    ///
    /// Fails only when the scene itself is invalid; analyzer faults are
    /// isolated and never surface here.
    pub fn analyze_scene(
        &self,
        scene: &SceneGraph,
        settings: &AnalyzerSettings,
    ) -> Result<SceneMetrics> {
        if let Err(e) = scene.validate() {
            error!("Cannot analyze scene: {}", e);
            return Err(e);
        }

        let objects = flatten_scene(scene);
        let mut result = SceneMetrics::new();

        for analyzer in self.registry.iter() {
            let category = analyzer.category();
            if !analyzer.should_run(settings) {
                debug!("Skipping disabled analyzer '{}'", category);
                continue;
            }

            match run_isolated(analyzer, &objects, scene, settings) {
                Ok(metrics) if metrics.is_empty() => {
                    debug!("Analyzer '{}' reported nothing", category);
                }
                Ok(metrics) => result.insert(category, metrics),
                Err(e) => error!("Analyzer '{}' failed on '{}': {}", category, scene.name(), e),
            }
        }

        info!(
            "Processed scene '{}': {} nodes, {} categories",
            scene.name(),
            objects.len(),
            result.len()
        );
        Ok(result)
    }
}

fn run_isolated(
    analyzer: &dyn SceneAnalyzer,
    objects: &[NodeId],
    scene: &SceneGraph,
    settings: &AnalyzerSettings,
) -> Result<MetricMap> {
    match panic::catch_unwind(AssertUnwindSafe(|| {
        analyzer.analyze(objects, scene, settings)
    })) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "analyzer panicked".to_string());
            Err(SceneMetricsError::analyzer(analyzer.category(), message))
        }
    }
}
