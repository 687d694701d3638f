//! Multi-scene aggregation driver.

use tracing::{error, info};

use super::table::AggregatedTable;
use crate::analyzer::SceneMetricsCollector;
use crate::config::AnalyzerSettings;
use crate::scene::SceneGraph;
use crate::types::{Result, SceneMetrics};

/// Per-run tally of how each scene fared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateSummary {
    pub analyzed: usize,
    /// Loaded but rejected by validation; present as an empty column
    pub invalid: usize,
    /// Failed to load; absent from the table
    pub failed: usize,
}

impl AggregateSummary {
    pub fn total(&self) -> usize {
        self.analyzed + self.invalid + self.failed
    }
}

/// Analyze scenes one at a time and fold them into a table.
///
/// Each item is a column name and the outcome of loading that scene. Scenes
/// are consumed in order and dropped once analyzed.
pub fn aggregate_scenes<I>(
    collector: &SceneMetricsCollector<'_>,
    settings: &AnalyzerSettings,
    scenes: I,
) -> (AggregatedTable, AggregateSummary)
where
    I: IntoIterator<Item = (String, Result<SceneGraph>)>,
{
    let mut table = AggregatedTable::new();
    let mut summary = AggregateSummary::default();

    for (name, loaded) in scenes {
        let scene = match loaded {
            Ok(scene) => scene,
            Err(e) => {
                error!("Skipping scene '{}': {}", name, e);
                summary.failed += 1;
                continue;
            }
        };

        match collector.analyze_scene(&scene, settings) {
            Ok(metrics) => {
                summary.analyzed += 1;
                table.insert(name, metrics);
            }
            Err(_) => {
                summary.invalid += 1;
                table.insert(name, SceneMetrics::new());
            }
        }
    }

    info!(
        "Aggregated {} scenes ({} analyzed, {} invalid, {} failed)",
        summary.total(),
        summary.analyzed,
        summary.invalid,
        summary.failed
    );
    (table, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Node;
    use crate::types::{MetricValue, SceneMetricsError};

    fn scene(name: &str, nodes: usize) -> SceneGraph {
        let mut scene = SceneGraph::new(name);
        for i in 0..nodes {
            scene.add_root(Node::new(format!("N{}", i)));
        }
        scene
    }

    #[test]
    fn test_mixed_outcomes() {
        let collector = SceneMetricsCollector::default();
        let scenes = vec![
            ("A".to_string(), Ok(scene("A", 2))),
            (
                "Broken".to_string(),
                Err(SceneMetricsError::scene_load("broken.scene.yaml", "bad yaml")),
            ),
            ("Invalid".to_string(), Ok(SceneGraph::new(""))),
            ("B".to_string(), Ok(scene("B", 5))),
        ];

        let (table, summary) = aggregate_scenes(&collector, &AnalyzerSettings::default(), scenes);

        assert_eq!(
            summary,
            AggregateSummary {
                analyzed: 2,
                invalid: 1,
                failed: 1
            }
        );
        assert_eq!(
            table.scene_names().collect::<Vec<_>>(),
            vec!["A", "Invalid", "B"]
        );
        assert!(table.scene("Invalid").is_some_and(SceneMetrics::is_empty));
        assert_eq!(
            table.scene("B").and_then(|m| m.value("Node Counts", "Total Nodes")),
            Some(&MetricValue::Int(5))
        );
    }
}
