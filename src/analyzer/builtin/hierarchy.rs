//! Node count, hierarchy depth and empty node analyzers.

use std::collections::HashMap;

use super::metric;
use crate::analyzer::{SceneAnalyzer, resolve_nodes};
use crate::config::AnalyzerSettings;
use crate::constants::hierarchy::DEPTH_HISTOGRAM_CEILING;
use crate::scene::{NodeId, SceneGraph};
use crate::types::{MetricMap, Result};

pub struct NodeCounts;

impl SceneAnalyzer for NodeCounts {
    fn category(&self) -> &'static str {
        "Node Counts"
    }

    fn should_run(&self, settings: &AnalyzerSettings) -> bool {
        settings.toggles.node_counts
    }

    fn analyze(
        &self,
        objects: &[NodeId],
        scene: &SceneGraph,
        _settings: &AnalyzerSettings,
    ) -> Result<MetricMap> {
        let mut total = 0usize;
        let mut active = 0usize;
        for (id, _) in resolve_nodes(objects, scene) {
            total += 1;
            if scene.is_active_in_hierarchy(id) {
                active += 1;
            }
        }

        let mut metrics = MetricMap::new();
        metric(&mut metrics, "Total Nodes", total);
        metric(&mut metrics, "Active Nodes", active);
        metric(&mut metrics, "Inactive Nodes", total - active);
        Ok(metrics)
    }
}

/// Depth statistics of a node list.
///
/// Depths below [`DEPTH_HISTOGRAM_CEILING`] are histogrammed; deeper nodes
/// are kept in an overflow count and sum so they still contribute to the
/// maximum, the exceedance count and the average.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthProfile {
    pub histogram: Vec<u64>,
    pub overflow_count: u64,
    pub overflow_depth_sum: u64,
    pub max_depth: usize,
    /// Nodes deeper than the recommended maximum
    pub exceeding: u64,
}

impl DepthProfile {
    pub fn compute(objects: &[NodeId], scene: &SceneGraph, max_recommended: u32) -> Self {
        let mut profile = Self {
            histogram: vec![0; DEPTH_HISTOGRAM_CEILING],
            overflow_count: 0,
            overflow_depth_sum: 0,
            max_depth: 0,
            exceeding: 0,
        };

        let mut known: HashMap<NodeId, usize> = HashMap::with_capacity(objects.len());
        for (id, node) in resolve_nodes(objects, scene) {
            let depth = match node.parent {
                None => Some(0),
                Some(parent) => match known.get(&parent) {
                    Some(d) => Some(d + 1),
                    None => scene.depth(id),
                },
            };
            let Some(depth) = depth else {
                continue;
            };
            known.insert(id, depth);
            profile.record(depth, max_recommended);
        }

        profile
    }

    fn record(&mut self, depth: usize, max_recommended: u32) {
        match self.histogram.get_mut(depth) {
            Some(slot) => *slot += 1,
            None => {
                self.overflow_count += 1;
                self.overflow_depth_sum += depth as u64;
            }
        }
        self.max_depth = self.max_depth.max(depth);
        if depth as u64 > u64::from(max_recommended) {
            self.exceeding += 1;
        }
    }

    /// Nodes counted in the histogram (overflow excluded)
    pub fn histogram_total(&self) -> u64 {
        self.histogram.iter().sum()
    }

    /// Mean depth over every node, `0.0` when there are none
    pub fn average_depth(&self) -> f64 {
        let weighted: u64 = self
            .histogram
            .iter()
            .enumerate()
            .map(|(depth, count)| depth as u64 * count)
            .sum::<u64>()
            + self.overflow_depth_sum;
        let count = self.histogram_total() + self.overflow_count;
        if count == 0 {
            0.0
        } else {
            weighted as f64 / count as f64
        }
    }
}

pub struct HierarchyDepth;

impl SceneAnalyzer for HierarchyDepth {
    fn category(&self) -> &'static str {
        "Hierarchy Depth"
    }

    fn should_run(&self, settings: &AnalyzerSettings) -> bool {
        settings.toggles.hierarchy_depth
    }

    fn analyze(
        &self,
        objects: &[NodeId],
        scene: &SceneGraph,
        settings: &AnalyzerSettings,
    ) -> Result<MetricMap> {
        let profile =
            DepthProfile::compute(objects, scene, settings.thresholds.max_hierarchy_depth);

        let mut metrics = MetricMap::new();
        metric(&mut metrics, "Maximum Hierarchy Depth", profile.max_depth);
        metric(
            &mut metrics,
            "Nodes Exceeding Recommended Depth",
            profile.exceeding,
        );
        metric(
            &mut metrics,
            "Total Depth Distribution Count",
            profile.histogram_total(),
        );
        metric(&mut metrics, "Average Node Depth", profile.average_depth());
        Ok(metrics)
    }
}

pub struct EmptyNodes;

impl SceneAnalyzer for EmptyNodes {
    fn category(&self) -> &'static str {
        "Empty Nodes"
    }

    fn should_run(&self, settings: &AnalyzerSettings) -> bool {
        settings.toggles.empty_nodes
    }

    fn analyze(
        &self,
        objects: &[NodeId],
        scene: &SceneGraph,
        _settings: &AnalyzerSettings,
    ) -> Result<MetricMap> {
        let empty = resolve_nodes(objects, scene)
            .filter(|(_, node)| node.is_empty())
            .count();

        let mut metrics = MetricMap::new();
        metric(&mut metrics, "Total Empty Nodes", empty);
        Ok(metrics)
    }
}
