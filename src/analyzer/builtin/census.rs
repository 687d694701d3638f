//! Prefab provenance and attachment type census.

use super::{Tally, metric};
use crate::analyzer::{SceneAnalyzer, resolve_nodes};
use crate::config::AnalyzerSettings;
use crate::constants::components::MISSING_TYPE_LABEL;
use crate::scene::{NodeId, SceneGraph};
use crate::types::{MetricMap, Result};

/// Counts outermost prefab instance roots; nested instances are part of
/// their outer instance
pub struct PrefabInstances;

impl SceneAnalyzer for PrefabInstances {
    fn category(&self) -> &'static str {
        "Prefab Instances"
    }

    fn should_run(&self, settings: &AnalyzerSettings) -> bool {
        settings.toggles.prefab_instances
    }

    fn analyze(
        &self,
        objects: &[NodeId],
        scene: &SceneGraph,
        _settings: &AnalyzerSettings,
    ) -> Result<MetricMap> {
        let mut total = 0usize;
        let mut sources: Tally<&str> = Tally::default();

        for (_, node) in resolve_nodes(objects, scene) {
            let Some(link) = node.prefab.as_ref().filter(|l| l.outermost_root) else {
                continue;
            };
            total += 1;
            if let Some(source) = link.source.as_deref() {
                sources.add(source);
            }
        }

        let mut metrics = MetricMap::new();
        metric(&mut metrics, "Total Prefab Instances", total);
        metric(&mut metrics, "Unique Prefab Types", sources.distinct());
        metric(
            &mut metrics,
            "Most Common Prefab Instance Count",
            sources.most_common(),
        );
        Ok(metrics)
    }
}

pub struct Components;

impl SceneAnalyzer for Components {
    fn category(&self) -> &'static str {
        "Components"
    }

    fn should_run(&self, settings: &AnalyzerSettings) -> bool {
        settings.toggles.component_distribution
    }

    fn analyze(
        &self,
        objects: &[NodeId],
        scene: &SceneGraph,
        _settings: &AnalyzerSettings,
    ) -> Result<MetricMap> {
        let mut types: Tally<&str> = Tally::default();
        for (_, node) in resolve_nodes(objects, scene) {
            for attachment in &node.attachments {
                types.add(attachment.type_name().unwrap_or(MISSING_TYPE_LABEL));
            }
        }

        let mut metrics = MetricMap::new();
        types.emit(&mut metrics, |name| name.to_string());
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::flatten_scene;
    use crate::scene::{Collider, ColliderKind, Node, PrefabLink, Script};
    use crate::types::MetricValue;

    fn prefab(source: Option<&str>, outermost_root: bool) -> PrefabLink {
        PrefabLink {
            source: source.map(String::from),
            outermost_root,
        }
    }

    #[test]
    fn test_prefab_instances() {
        let mut scene = SceneGraph::new("Town");
        let a = scene.add_root(Node::new("HouseA").with_prefab(prefab(Some("House"), true)));
        scene
            .add_child(a, Node::new("Door").with_prefab(prefab(Some("Door"), false)))
            .unwrap();
        scene.add_root(Node::new("HouseB").with_prefab(prefab(Some("House"), true)));
        scene.add_root(Node::new("Tree").with_prefab(prefab(Some("Tree"), true)));
        scene.add_root(Node::new("Ghost").with_prefab(prefab(None, true)));
        scene.add_root(Node::new("Plain"));

        let metrics = PrefabInstances
            .analyze(&flatten_scene(&scene), &scene, &AnalyzerSettings::default())
            .unwrap();
        assert_eq!(metrics["Total Prefab Instances"], MetricValue::Int(4));
        assert_eq!(metrics["Unique Prefab Types"], MetricValue::Int(2));
        assert_eq!(metrics["Most Common Prefab Instance Count"], MetricValue::Int(2));
    }

    #[test]
    fn test_component_census() {
        let mut scene = SceneGraph::new("Census");
        let root = scene.add_root(
            Node::new("Player")
                .with_attachment(Script::new("game.PlayerController"))
                .with_attachment(Script::missing())
                .with_attachment(Collider::new(ColliderKind::Capsule)),
        );
        scene
            .add_child(root, Node::new("Marker").with_attachment(Script::missing()))
            .unwrap();

        let metrics = Components
            .analyze(&flatten_scene(&scene), &scene, &AnalyzerSettings::default())
            .unwrap();
        assert_eq!(metrics["core.Transform"], MetricValue::Int(2));
        assert_eq!(metrics["game.PlayerController"], MetricValue::Int(1));
        assert_eq!(metrics["physics.CapsuleCollider"], MetricValue::Int(1));
        assert_eq!(metrics[MISSING_TYPE_LABEL], MetricValue::Int(2));
        assert_eq!(metrics.len(), 4);
    }

    #[test]
    fn test_empty_scene_has_no_components() {
        let scene = SceneGraph::new("Empty");
        let metrics = Components
            .analyze(&[], &scene, &AnalyzerSettings::default())
            .unwrap();
        assert!(metrics.is_empty());
    }
}
