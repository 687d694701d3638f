//! Scene Analyzer Module
//!
//! Pluggable per-category analysis over a flattened scene graph:
//! - [`SceneAnalyzer`]: the capability every metric category implements
//! - [`flatten_scene`]: the shared, deduplicated node list all analyzers read
//! - [`AnalyzerRegistry`]: the ordered, build-once set of analyzers
//! - [`SceneMetricsCollector`]: runs the registry over one scene with
//!   per-analyzer failure isolation
//!
//! ## Writing an analyzer
//!
//! ```rust,ignore
//! struct Lights;
//!
//! impl SceneAnalyzer for Lights {
//!     fn category(&self) -> &'static str { "Lights" }
//!     fn should_run(&self, s: &AnalyzerSettings) -> bool { s.toggles.lights }
//!     fn analyze(&self, objects: &[NodeId], scene: &SceneGraph, _: &AnalyzerSettings) -> Result<MetricMap> {
//!         let total = resolve_nodes(objects, scene)
//!             .map(|(_, node)| attachments_of::<Light>(node).count())
//!             .sum::<usize>();
//!         Ok(MetricMap::from([("Total Lights".into(), total.into())]))
//!     }
//! }
//! ```

pub mod builtin;
pub mod collector;
pub mod flatten;
pub mod registry;

pub use collector::SceneMetricsCollector;
pub use flatten::flatten_scene;
pub use registry::AnalyzerRegistry;

use crate::config::AnalyzerSettings;
use crate::scene::{Attachment, AttachmentKind, Node, NodeId, SceneGraph};
use crate::types::{MetricMap, Result};

/// One metric category.
///
/// Implementations are stateless: `analyze` reads the scene and the flat
/// object list and must not assume every id resolves.
pub trait SceneAnalyzer: Send + Sync {
    /// Category name, unique within a registry
    fn category(&self) -> &'static str;

    fn should_run(&self, settings: &AnalyzerSettings) -> bool;

    /// Compute this category's metrics. An empty map means nothing to report.
    fn analyze(
        &self,
        objects: &[NodeId],
        scene: &SceneGraph,
        settings: &AnalyzerSettings,
    ) -> Result<MetricMap>;
}

/// Resolve a flat object list against its scene, skipping dangling ids
pub fn resolve_nodes<'a>(
    objects: &'a [NodeId],
    scene: &'a SceneGraph,
) -> impl Iterator<Item = (NodeId, &'a Node)> + 'a {
    objects
        .iter()
        .filter_map(move |&id| scene.node(id).map(|node| (id, node)))
}

/// Every attachment of payload type `T` on a node, in attachment order
pub fn attachments_of<'a, T: AttachmentKind + 'a>(node: &'a Node) -> impl Iterator<Item = &'a T> {
    node.attachments.iter().filter_map(T::from_attachment)
}

/// Iterate attachments of every resolvable node in the list
pub fn all_attachments<'a>(
    objects: &'a [NodeId],
    scene: &'a SceneGraph,
) -> impl Iterator<Item = &'a Attachment> + 'a {
    resolve_nodes(objects, scene).flat_map(|(_, node)| node.attachments.iter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Light, LightType, Rigidbody};

    #[test]
    fn test_resolve_nodes_skips_dangling_ids() {
        let mut scene = SceneGraph::new("Test");
        let root = scene.add_root(Node::new("Root"));
        let objects = vec![root, NodeId::new(40)];
        let resolved: Vec<_> = resolve_nodes(&objects, &scene).map(|(id, _)| id).collect();
        assert_eq!(resolved, vec![root]);
    }

    #[test]
    fn test_attachments_of_filters_by_kind() {
        let node = Node::new("Lamp")
            .with_attachment(Light::new(LightType::Point))
            .with_attachment(Rigidbody::default())
            .with_attachment(Light::new(LightType::Spot));

        let types: Vec<_> = attachments_of::<Light>(&node).map(|l| l.light_type).collect();
        assert_eq!(types, vec![LightType::Point, LightType::Spot]);
        assert_eq!(attachments_of::<Rigidbody>(&node).count(), 1);
    }
}
