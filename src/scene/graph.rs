//! Scene graph arena.
//!
//! Nodes are stored in a flat arena owned by [`SceneGraph`] and addressed by
//! [`NodeId`]. A node owns its attachments and holds a non-owning back
//! reference to its parent.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use super::attachment::Attachment;
use super::resource::{Material, MaterialId, Mesh, MeshId, Texture, TextureId};
use crate::types::{Result, SceneMetricsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Link from a node to the prefab it was instantiated from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrefabLink {
    /// Source prefab name; `None` when the source asset is missing
    pub source: Option<String>,
    /// True for the outermost node of a prefab instance
    pub outermost_root: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    /// Self activation flag; see [`SceneGraph::is_active_in_hierarchy`]
    pub active: bool,
    pub batching_static: bool,
    pub prefab: Option<PrefabLink>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub attachments: Vec<Attachment>,
}

impl Node {
    /// Create an active node carrying only the implicit transform
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            batching_static: false,
            prefab: None,
            parent: None,
            children: Vec::new(),
            attachments: vec![Attachment::Transform],
        }
    }

    pub fn with_attachment(mut self, attachment: impl Into<Attachment>) -> Self {
        self.attachments.push(attachment.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn batching_static(mut self) -> Self {
        self.batching_static = true;
        self
    }

    pub fn with_prefab(mut self, link: PrefabLink) -> Self {
        self.prefab = Some(link);
        self
    }

    /// A node whose only attachment is its transform
    pub fn is_empty(&self) -> bool {
        self.attachments.len() == 1
    }
}

/// One loaded scene: node arena, root list and shared resources
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    name: String,
    path: Option<PathBuf>,
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    materials: Vec<Material>,
    textures: Vec<Texture>,
    meshes: Vec<Mesh>,
}

impl SceneGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Build a scene from an existing arena without checking links.
    ///
    /// Use [`SceneGraph::validate`] before trusting the result.
    pub fn from_parts(name: impl Into<String>, nodes: Vec<Node>, roots: Vec<NodeId>) -> Self {
        Self {
            name: name.into(),
            nodes,
            roots,
            ..Self::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // =========================================================================
    // Construction
    // =========================================================================

    pub fn add_root(&mut self, mut node: Node) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        node.parent = None;
        self.nodes.push(node);
        self.roots.push(id);
        id
    }

    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> Result<NodeId> {
        if parent.index() >= self.nodes.len() {
            return Err(SceneMetricsError::invalid_scene(
                &self.name,
                format!("parent {} does not exist", parent),
            ));
        }

        let id = NodeId::new(self.nodes.len() as u32);
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.index()].children.push(id);
        Ok(id)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId::new(self.materials.len() as u32 - 1)
    }

    pub fn add_texture(&mut self, texture: Texture) -> TextureId {
        self.textures.push(texture);
        TextureId::new(self.textures.len() as u32 - 1)
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.push(mesh);
        MeshId::new(self.meshes.len() as u32 - 1)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Traversal entry points, in declaration order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.index())
    }

    pub fn texture(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.index())
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.index())
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// True when the node and all of its ancestors are active
    pub fn is_active_in_hierarchy(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        let mut steps = 0;
        while let Some(cur) = current {
            let Some(node) = self.node(cur) else {
                return false;
            };
            if !node.active || steps > self.nodes.len() {
                return false;
            }
            current = node.parent;
            steps += 1;
        }
        true
    }

    /// Number of ancestors above the node (roots are at depth 0).
    ///
    /// Returns `None` for an unknown node or a looping parent chain.
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        let mut depth = 0;
        let mut current = self.node(id)?.parent;
        while let Some(parent) = current {
            depth += 1;
            if depth > self.nodes.len() {
                return None;
            }
            current = self.node(parent)?.parent;
        }
        Some(depth)
    }

    // =========================================================================
    // Validation
    // =========================================================================

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check that the scene is named and every parent/child link is in range,
    /// mutually consistent and acyclic.
    ///
    /// Root references that do not resolve are tolerated; traversal skips them.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SceneMetricsError::invalid_scene("", "scene has no name"));
        }

        let invalid = |reason: String| SceneMetricsError::invalid_scene(&self.name, reason);

        for (id, node) in self.nodes() {
            if let Some(parent) = node.parent {
                let parent_node = self
                    .node(parent)
                    .ok_or_else(|| invalid(format!("node {} has missing parent {}", id, parent)))?;
                if !parent_node.children.contains(&id) {
                    return Err(invalid(format!(
                        "node {} is not listed among the children of {}",
                        id, parent
                    )));
                }
            }

            for &child in &node.children {
                let child_node = self
                    .node(child)
                    .ok_or_else(|| invalid(format!("node {} has missing child {}", id, child)))?;
                if child_node.parent != Some(id) {
                    return Err(invalid(format!(
                        "child {} of node {} points at a different parent",
                        child, id
                    )));
                }
            }
        }

        // 1: on the chain being walked, 2: known to reach a root
        let mut state = vec![0u8; self.nodes.len()];
        let mut chain = Vec::new();
        for (id, _) in self.nodes() {
            let mut current = Some(id);
            while let Some(next) = current {
                match state[next.index()] {
                    0 => {
                        state[next.index()] = 1;
                        chain.push(next);
                        current = self.nodes[next.index()].parent;
                    }
                    1 => return Err(invalid(format!("parent chain of node {} loops", id))),
                    _ => break,
                }
            }
            for settled in chain.drain(..) {
                state[settled.index()] = 2;
            }
        }

        Ok(())
    }
}
