//! Aggregated multi-scene table.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use tracing::warn;

use crate::types::{MetricValue, SceneMetrics};

/// Scene name to metrics, in column order
#[derive(Debug, Clone, Default)]
pub struct AggregatedTable {
    scenes: IndexMap<String, SceneMetrics>,
}

/// One CSV row: a (category, metric) key and one cell per scene column
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow<'a> {
    pub category: &'a str,
    pub metric: &'a str,
    pub cells: Vec<Option<&'a MetricValue>>,
}

impl AggregatedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scene column.
    ///
    /// A repeated name replaces the earlier metrics but keeps its column
    /// position.
    pub fn insert(&mut self, scene: impl Into<String>, metrics: SceneMetrics) {
        let scene = scene.into();
        if self.scenes.contains_key(&scene) {
            warn!(
                "Scene name '{}' appears more than once; keeping the last result",
                scene
            );
        }
        self.scenes.insert(scene, metrics);
    }

    pub fn scene_names(&self) -> impl Iterator<Item = &str> {
        self.scenes.keys().map(String::as_str)
    }

    pub fn scene(&self, name: &str) -> Option<&SceneMetrics> {
        self.scenes.get(name)
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Sorted union of every (category, metric) pair across all scenes
    pub fn metric_keys(&self) -> BTreeSet<(&str, &str)> {
        self.scenes
            .values()
            .flat_map(|metrics| metrics.categories())
            .flat_map(|(category, map)| map.keys().map(move |m| (category, m.as_str())))
            .collect()
    }

    /// One row per metric key, cells in scene column order
    pub fn rows(&self) -> Vec<TableRow<'_>> {
        self.metric_keys()
            .into_iter()
            .map(|(category, metric)| TableRow {
                category,
                metric,
                cells: self
                    .scenes
                    .values()
                    .map(|metrics| metrics.value(category, metric))
                    .collect(),
            })
            .collect()
    }
}
