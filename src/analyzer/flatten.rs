//! Graph flattening.

use std::collections::HashSet;

use crate::scene::{NodeId, SceneGraph};

/// Collect every node reachable from the scene roots, active or not.
///
/// Preorder, siblings in declaration order. Each node appears once even if it
/// is reachable from several entry points; root ids that do not resolve are
/// skipped.
pub fn flatten_scene(scene: &SceneGraph) -> Vec<NodeId> {
    let mut seen = HashSet::with_capacity(scene.node_count());
    let mut out = Vec::with_capacity(scene.node_count());
    let mut stack: Vec<NodeId> = Vec::new();

    for &root in scene.roots() {
        stack.push(root);

        while let Some(id) = stack.pop() {
            let Some(node) = scene.node(id) else {
                continue;
            };
            if !seen.insert(id) {
                continue;
            }
            out.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Node;
    use proptest::prelude::*;

    #[test]
    fn test_preorder_includes_inactive() {
        let mut scene = SceneGraph::new("Test");
        let a = scene.add_root(Node::new("A"));
        let a1 = scene.add_child(a, Node::new("A1").inactive()).unwrap();
        let a1x = scene.add_child(a1, Node::new("A1x")).unwrap();
        let a2 = scene.add_child(a, Node::new("A2")).unwrap();
        let b = scene.add_root(Node::new("B"));

        assert_eq!(flatten_scene(&scene), vec![a, a1, a1x, a2, b]);
    }

    #[test]
    fn test_empty_scene() {
        assert!(flatten_scene(&SceneGraph::new("Empty")).is_empty());
    }

    #[test]
    fn test_dangling_root_skipped() {
        let scene = SceneGraph::from_parts("Test", vec![Node::new("A")], vec![
            NodeId::new(9),
            NodeId::new(0),
        ]);
        assert_eq!(flatten_scene(&scene), vec![NodeId::new(0)]);
    }

    #[test]
    fn test_node_listed_as_root_and_child_appears_once() {
        let mut scene = SceneGraph::new("Test");
        let root = scene.add_root(Node::new("Root"));
        let child = scene.add_child(root, Node::new("Child")).unwrap();
        let scene = SceneGraph::from_parts(
            "Test",
            scene.nodes().map(|(_, n)| n.clone()).collect(),
            vec![root, child, root],
        );

        assert_eq!(flatten_scene(&scene), vec![root, child]);
    }

    /// Random forest: node i > 0 picks a parent among 0..i or becomes a root
    fn forest(parents: &[Option<usize>]) -> SceneGraph {
        let mut scene = SceneGraph::new("Random");
        let mut ids = Vec::new();
        for (i, parent) in parents.iter().enumerate() {
            let node = Node::new(format!("N{}", i));
            let id = match parent.filter(|p| *p < i) {
                Some(p) => scene.add_child(ids[p], node).unwrap(),
                None => scene.add_root(node),
            };
            ids.push(id);
        }
        scene
    }

    proptest! {
        #[test]
        fn prop_flatten_visits_each_node_once(
            parents in prop::collection::vec(prop::option::of(0usize..64), 0..64),
            extra_roots in prop::collection::vec(0u32..64, 0..8),
        ) {
            let base = forest(&parents);
            let mut roots = base.roots().to_vec();
            roots.extend(extra_roots.into_iter().map(NodeId::new));
            let scene = SceneGraph::from_parts(
                "Random",
                base.nodes().map(|(_, n)| n.clone()).collect(),
                roots,
            );

            let flat = flatten_scene(&scene);
            let unique: HashSet<_> = flat.iter().copied().collect();
            prop_assert_eq!(unique.len(), flat.len());
            prop_assert_eq!(flat.len(), parents.len());
        }
    }
}
