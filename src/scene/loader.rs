//! Scene Document Loader
//!
//! Reads scene documents (YAML or JSON) into a [`SceneGraph`].
//!
//! ```yaml
//! name: Forest
//! materials:
//!   - id: bark
//!     shader: Standard
//!     gpu_instancing: true
//!     textures: { _MainTex: bark_albedo }
//! textures:
//!   - { id: bark_albedo, width: 1024, height: 1024, format: dxt5 }
//! meshes:
//!   - { id: trunk, vertices: 420, triangles: 610 }
//! roots:
//!   - name: Tree
//!     batching_static: true
//!     components:
//!       - { type: mesh_filter, mesh: trunk }
//!       - { type: renderer, kind: mesh, materials: [bark, null] }
//!     children:
//!       - name: Canopy
//! ```
//!
//! Resource references are by string id. A reference to an unknown id becomes
//! an empty slot and is logged.

use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use super::attachment::{
    AudioSource, Camera, Collider, ColliderKind, Light, LightRenderMode, LightType, MeshFilter,
    ParticleSystem, ProbeMode, ReflectionProbe, Renderer, RendererKind, RenderingPath, Rigidbody,
    Script,
};
use super::graph::{Node, NodeId, PrefabLink, SceneGraph};
use super::resource::{
    Material, MaterialId, Mesh, MeshId, Texture, TextureDimension, TextureFormat,
};
use crate::types::{Result, SceneMetricsError};

/// On-disk encoding of a scene document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneFormat {
    Yaml,
    Json,
}

impl SceneFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "yaml" | "yml" => Some(SceneFormat::Yaml),
            "json" => Some(SceneFormat::Json),
            _ => None,
        }
    }
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Document Schema
// =============================================================================

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SceneDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub materials: Vec<MaterialDoc>,
    #[serde(default)]
    pub textures: Vec<TextureDoc>,
    #[serde(default)]
    pub meshes: Vec<MeshDoc>,
    #[serde(default)]
    pub roots: Vec<NodeDoc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaterialDoc {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub shader: Option<String>,
    #[serde(default)]
    pub gpu_instancing: bool,
    /// Texture property to texture id
    #[serde(default)]
    pub textures: IndexMap<String, Option<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextureDoc {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub format: TextureFormat,
    #[serde(default)]
    pub dimension: TextureDimension,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeshDoc {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub vertices: u32,
    pub triangles: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeDoc {
    pub name: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub batching_static: bool,
    #[serde(default)]
    pub prefab: Option<PrefabDoc>,
    #[serde(default)]
    pub components: Vec<ComponentDoc>,
    #[serde(default)]
    pub children: Vec<NodeDoc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrefabDoc {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default = "default_true")]
    pub outermost_root: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComponentDoc {
    MeshFilter {
        #[serde(default)]
        mesh: Option<String>,
    },
    Renderer {
        kind: RendererKind,
        #[serde(default = "default_true")]
        enabled: bool,
        #[serde(default)]
        materials: Vec<Option<String>>,
        #[serde(default)]
        mesh: Option<String>,
    },
    Camera {
        #[serde(default = "default_true")]
        enabled: bool,
        #[serde(default)]
        rendering_path: RenderingPath,
    },
    Light {
        kind: LightType,
        #[serde(default)]
        render_mode: LightRenderMode,
    },
    ReflectionProbe {
        #[serde(default)]
        mode: ProbeMode,
    },
    AudioSource {
        #[serde(default)]
        play_on_awake: bool,
        #[serde(default)]
        looping: bool,
    },
    Collider {
        shape: ColliderKind,
        #[serde(default)]
        is_trigger: bool,
    },
    Rigidbody {
        #[serde(default)]
        is_kinematic: bool,
    },
    ParticleSystem {
        #[serde(default)]
        playing: bool,
        #[serde(default)]
        max_particles: u32,
    },
    Script {
        #[serde(default)]
        class: Option<String>,
    },
}

// =============================================================================
// Loading
// =============================================================================

/// Load a scene document from disk, detecting the format from its extension
pub fn load_scene(path: &Path) -> Result<SceneGraph> {
    let display = path.display().to_string();
    let format = SceneFormat::from_path(path).ok_or_else(|| {
        SceneMetricsError::scene_load(&display, "unsupported scene file extension")
    })?;

    let text =
        fs::read_to_string(path).map_err(|e| SceneMetricsError::scene_load(&display, e))?;

    let fallback = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
        .filter(|n| !n.is_empty())
        .unwrap_or(crate::constants::discovery::UNKNOWN_SCENE_NAME);

    debug!("Loading scene {} as {:?}", path.display(), format);
    let scene = parse_scene(&text, format, fallback)
        .map_err(|e| SceneMetricsError::scene_load(&display, e))?;

    Ok(scene.with_path(path))
}

/// Parse a scene document from text
pub fn parse_scene(text: &str, format: SceneFormat, fallback_name: &str) -> Result<SceneGraph> {
    let doc: SceneDocument = match format {
        SceneFormat::Yaml => serde_yaml::from_str(text)?,
        SceneFormat::Json => serde_json::from_str(text)?,
    };
    Ok(doc.into_graph(fallback_name))
}

impl SceneDocument {
    /// Build the scene arena, resolving resource ids to handles
    pub fn into_graph(self, fallback_name: &str) -> SceneGraph {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| fallback_name.to_string());
        let mut scene = SceneGraph::new(name);

        let mut textures = HashMap::new();
        for doc in self.textures {
            let texture = Texture {
                name: doc.name.unwrap_or_else(|| doc.id.clone()),
                width: doc.width,
                height: doc.height,
                format: doc.format,
                dimension: doc.dimension,
            };
            let id = scene.add_texture(texture);
            if textures.insert(doc.id.clone(), id).is_some() {
                warn!("Scene '{}': duplicate texture id '{}'", scene.name(), doc.id);
            }
        }

        let mut meshes = HashMap::new();
        for doc in self.meshes {
            let id = scene.add_mesh(Mesh::new(
                doc.name.unwrap_or_else(|| doc.id.clone()),
                doc.vertices,
                doc.triangles,
            ));
            if meshes.insert(doc.id.clone(), id).is_some() {
                warn!("Scene '{}': duplicate mesh id '{}'", scene.name(), doc.id);
            }
        }

        let mut materials = HashMap::new();
        for doc in self.materials {
            let mut material = Material::new(doc.name.unwrap_or_else(|| doc.id.clone()));
            material.shader = doc.shader;
            material.gpu_instancing = doc.gpu_instancing;
            for (property, texture) in doc.textures {
                let handle = resolve(&textures, texture.as_deref(), "texture", scene.name());
                material.textures.push((property, handle));
            }
            let id = scene.add_material(material);
            if materials.insert(doc.id.clone(), id).is_some() {
                warn!("Scene '{}': duplicate material id '{}'", scene.name(), doc.id);
            }
        }

        let refs = Refs {
            materials: &materials,
            meshes: &meshes,
        };

        let mut stack: Vec<(Option<NodeId>, NodeDoc)> =
            self.roots.into_iter().rev().map(|n| (None, n)).collect();

        while let Some((parent, doc)) = stack.pop() {
            let NodeDoc {
                name,
                active,
                batching_static,
                prefab,
                components,
                children,
            } = doc;

            let mut node = Node::new(name);
            node.active = active;
            node.batching_static = batching_static;
            node.prefab = prefab.map(|p| PrefabLink {
                source: p.source,
                outermost_root: p.outermost_root,
            });
            for component in components {
                node = refs.attach(node, component, scene.name());
            }

            let id = match parent {
                None => scene.add_root(node),
                Some(parent) => match scene.add_child(parent, node) {
                    Ok(id) => id,
                    Err(e) => {
                        warn!("Skipping node: {}", e);
                        continue;
                    }
                },
            };

            stack.extend(children.into_iter().rev().map(|c| (Some(id), c)));
        }

        scene
    }
}

struct Refs<'a> {
    materials: &'a HashMap<String, MaterialId>,
    meshes: &'a HashMap<String, MeshId>,
}

impl Refs<'_> {
    fn attach(&self, node: Node, component: ComponentDoc, scene: &str) -> Node {
        let mesh = |id: Option<String>| resolve(self.meshes, id.as_deref(), "mesh", scene);

        match component {
            ComponentDoc::MeshFilter { mesh: id } => {
                node.with_attachment(MeshFilter { mesh: mesh(id) })
            }
            ComponentDoc::Renderer {
                kind,
                enabled,
                materials,
                mesh: id,
            } => {
                let slots = materials
                    .iter()
                    .map(|m| resolve(self.materials, m.as_deref(), "material", scene))
                    .collect();
                let mut renderer = Renderer::new(kind).with_materials(slots);
                renderer.enabled = enabled;
                renderer.mesh = mesh(id);
                node.with_attachment(renderer)
            }
            ComponentDoc::Camera {
                enabled,
                rendering_path,
            } => node.with_attachment(Camera {
                enabled,
                rendering_path,
            }),
            ComponentDoc::Light { kind, render_mode } => {
                node.with_attachment(Light::new(kind).with_render_mode(render_mode))
            }
            ComponentDoc::ReflectionProbe { mode } => {
                node.with_attachment(ReflectionProbe { mode })
            }
            ComponentDoc::AudioSource {
                play_on_awake,
                looping,
            } => node.with_attachment(AudioSource {
                play_on_awake,
                looping,
            }),
            ComponentDoc::Collider { shape, is_trigger } => node.with_attachment(Collider {
                kind: shape,
                is_trigger,
            }),
            ComponentDoc::Rigidbody { is_kinematic } => {
                node.with_attachment(Rigidbody { is_kinematic })
            }
            ComponentDoc::ParticleSystem {
                playing,
                max_particles,
            } => node.with_attachment(ParticleSystem {
                playing,
                max_particles,
            }),
            ComponentDoc::Script { class } => node.with_attachment(Script { type_name: class }),
        }
    }
}

fn resolve<T: Copy>(
    table: &HashMap<String, T>,
    id: Option<&str>,
    kind: &str,
    scene: &str,
) -> Option<T> {
    let id = id?;
    let handle = table.get(id).copied();
    if handle.is_none() {
        warn!("Scene '{}': unknown {} id '{}'", scene, kind, id);
    }
    handle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::attachment::{Attachment, AttachmentKind};
    use tempfile::TempDir;

    const FOREST: &str = r#"
name: Forest
materials:
  - id: bark
    shader: Standard
    gpu_instancing: true
    textures: { _MainTex: bark_albedo, _BumpMap: missing_normal }
textures:
  - { id: bark_albedo, width: 1024, height: 1024, format: dxt5 }
meshes:
  - { id: trunk, vertices: 420, triangles: 610 }
roots:
  - name: Tree
    batching_static: true
    components:
      - { type: mesh_filter, mesh: trunk }
      - { type: renderer, kind: mesh, materials: [bark, null, ghost] }
    children:
      - name: Canopy
        active: false
      - name: Owl
        components:
          - { type: audio_source, looping: true }
          - { type: script }
  - name: Sun
    components:
      - { type: light, kind: directional, render_mode: force_vertex }
"#;

    #[test]
    fn test_parse_yaml_scene() {
        let scene = parse_scene(FOREST, SceneFormat::Yaml, "fallback").unwrap();
        assert_eq!(scene.name(), "Forest");
        assert_eq!(scene.node_count(), 4);
        assert_eq!(scene.roots().len(), 2);
        assert!(scene.is_valid());

        let tree = scene.node(scene.roots()[0]).unwrap();
        assert_eq!(tree.name, "Tree");
        assert!(tree.batching_static);
        let names: Vec<_> = tree
            .children
            .iter()
            .map(|c| scene.node(*c).unwrap().name.as_str())
            .collect();
        assert_eq!(names, vec!["Canopy", "Owl"]);
    }

    #[test]
    fn test_unknown_references_become_empty_slots() {
        let scene = parse_scene(FOREST, SceneFormat::Yaml, "fallback").unwrap();
        let tree = scene.node(scene.roots()[0]).unwrap();
        let renderer = tree
            .attachments
            .iter()
            .find_map(Renderer::from_attachment)
            .unwrap();
        assert_eq!(renderer.materials.len(), 3);
        assert!(renderer.materials[0].is_some());
        assert!(renderer.materials[1].is_none());
        assert!(renderer.materials[2].is_none());

        let material = scene.material(renderer.materials[0].unwrap()).unwrap();
        assert_eq!(material.textures.len(), 2);
        assert_eq!(material.textures[0].0, "_MainTex");
        assert!(material.textures[1].1.is_none());
    }

    #[test]
    fn test_script_without_class_is_unresolved() {
        let scene = parse_scene(FOREST, SceneFormat::Yaml, "fallback").unwrap();
        let tree = scene.node(scene.roots()[0]).unwrap();
        let owl = scene.node(tree.children[1]).unwrap();
        assert!(matches!(
            owl.attachments.last(),
            Some(Attachment::Script(Script { type_name: None }))
        ));
    }

    #[test]
    fn test_parse_json_uses_fallback_name() {
        let json = r#"{"roots": [{"name": "Only", "components": [{"type": "rigidbody", "is_kinematic": true}]}]}"#;
        let scene = parse_scene(json, SceneFormat::Json, "Arena").unwrap();
        assert_eq!(scene.name(), "Arena");
        assert_eq!(scene.node_count(), 1);
    }

    #[test]
    fn test_parse_rejects_unknown_component() {
        let yaml = "roots:\n  - name: A\n    components:\n      - { type: hologram }\n";
        assert!(parse_scene(yaml, SceneFormat::Yaml, "x").is_err());
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            SceneFormat::from_path(Path::new("a/forest.scene.yaml")),
            Some(SceneFormat::Yaml)
        );
        assert_eq!(
            SceneFormat::from_path(Path::new("forest.JSON")),
            Some(SceneFormat::Json)
        );
        assert_eq!(SceneFormat::from_path(Path::new("forest.unity")), None);
    }

    #[test]
    fn test_load_scene_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("forest.scene.yaml");
        std::fs::write(&path, FOREST).unwrap();

        let scene = load_scene(&path).unwrap();
        assert_eq!(scene.name(), "Forest");
        assert_eq!(scene.path(), Some(path.as_path()));
    }

    #[test]
    fn test_load_scene_missing_file() {
        let err = load_scene(Path::new("/nonexistent/void.scene.json")).unwrap_err();
        assert!(matches!(err, SceneMetricsError::SceneLoad { .. }));
    }
}
