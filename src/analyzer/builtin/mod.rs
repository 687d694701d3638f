//! Built-in analyzers, one unit struct per metric category.

mod census;
mod effects;
mod hierarchy;
mod physics;
mod rendering;

pub use census::{Components, PrefabInstances};
pub use effects::{AudioSources, Lights, ParticleSystems, ReflectionProbes};
pub use hierarchy::{DepthProfile, EmptyNodes, HierarchyDepth, NodeCounts};
pub use physics::{Colliders, Rigidbodies};
pub use rendering::{Cameras, Materials, Renderers, RenderingPerformance, Shaders, Textures};

use std::collections::BTreeMap;

use crate::types::{MetricMap, MetricValue};

/// Occurrence counter keyed by label, iterated in key order
#[derive(Debug)]
pub(crate) struct Tally<K: Ord> {
    counts: BTreeMap<K, u64>,
}

impl<K: Ord> Default for Tally<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }
}

impl<K: Ord> Tally<K> {
    /// Count one occurrence and return the updated count for that key
    pub(crate) fn add(&mut self, key: K) -> u64 {
        let count = self.counts.entry(key).or_insert(0);
        *count += 1;
        *count
    }

    pub(crate) fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub(crate) fn most_common(&self) -> u64 {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// Write one metric per key, named by `label`
    pub(crate) fn emit(&self, metrics: &mut MetricMap, label: impl Fn(&K) -> String) {
        for (key, count) in &self.counts {
            metrics.insert(label(key), MetricValue::from(*count));
        }
    }
}

pub(crate) fn metric(metrics: &mut MetricMap, name: &str, value: impl Into<MetricValue>) {
    metrics.insert(name.to_string(), value.into());
}
