//! Collider and rigidbody analyzers.

use super::{Tally, metric};
use crate::analyzer::{SceneAnalyzer, attachments_of, resolve_nodes};
use crate::config::AnalyzerSettings;
use crate::scene::{Collider, NodeId, Rigidbody, SceneGraph};
use crate::types::{MetricMap, Result};

pub struct Colliders;

impl SceneAnalyzer for Colliders {
    fn category(&self) -> &'static str {
        "Colliders"
    }

    fn should_run(&self, settings: &AnalyzerSettings) -> bool {
        settings.toggles.colliders
    }

    fn analyze(
        &self,
        objects: &[NodeId],
        scene: &SceneGraph,
        _settings: &AnalyzerSettings,
    ) -> Result<MetricMap> {
        let mut total = 0usize;
        let mut kinds = Tally::default();

        for (_, node) in resolve_nodes(objects, scene) {
            for collider in attachments_of::<Collider>(node) {
                total += 1;
                kinds.add(collider.kind.type_name());
            }
        }

        let mut metrics = MetricMap::new();
        metric(&mut metrics, "Total Colliders", total);
        kinds.emit(&mut metrics, |kind| format!("{} Count", kind));
        Ok(metrics)
    }
}

pub struct Rigidbodies;

impl SceneAnalyzer for Rigidbodies {
    fn category(&self) -> &'static str {
        "Rigidbodies"
    }

    fn should_run(&self, settings: &AnalyzerSettings) -> bool {
        settings.toggles.rigidbodies
    }

    fn analyze(
        &self,
        objects: &[NodeId],
        scene: &SceneGraph,
        _settings: &AnalyzerSettings,
    ) -> Result<MetricMap> {
        let (kinematic, dynamic) = resolve_nodes(objects, scene)
            .flat_map(|(_, node)| attachments_of::<Rigidbody>(node))
            .fold((0usize, 0usize), |(k, d), body| {
                if body.is_kinematic {
                    (k + 1, d)
                } else {
                    (k, d + 1)
                }
            });

        let mut metrics = MetricMap::new();
        metric(&mut metrics, "Total Rigidbodies", kinematic + dynamic);
        metric(&mut metrics, "Kinematic Rigidbodies", kinematic);
        metric(&mut metrics, "Dynamic Rigidbodies", dynamic);
        Ok(metrics)
    }
}
