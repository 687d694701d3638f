//! Typed attachments carried by scene nodes.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::resource::{MaterialId, MeshId};

/// A typed payload owned by a node
#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    /// Implicit position attachment every node carries
    Transform,
    MeshFilter(MeshFilter),
    Renderer(Renderer),
    Camera(Camera),
    Light(Light),
    ReflectionProbe(ReflectionProbe),
    AudioSource(AudioSource),
    Collider(Collider),
    Rigidbody(Rigidbody),
    ParticleSystem(ParticleSystem),
    Script(Script),
}

impl Attachment {
    /// Fully-qualified type identity, or `None` when the type cannot be resolved
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Attachment::Transform => Some("core.Transform"),
            Attachment::MeshFilter(_) => Some("rendering.MeshFilter"),
            Attachment::Renderer(r) => Some(r.kind.qualified_name()),
            Attachment::Camera(_) => Some("rendering.Camera"),
            Attachment::Light(_) => Some("lighting.Light"),
            Attachment::ReflectionProbe(_) => Some("lighting.ReflectionProbe"),
            Attachment::AudioSource(_) => Some("audio.AudioSource"),
            Attachment::Collider(c) => Some(c.kind.qualified_name()),
            Attachment::Rigidbody(_) => Some("physics.Rigidbody"),
            Attachment::ParticleSystem(_) => Some("effects.ParticleSystem"),
            Attachment::Script(s) => s.type_name.as_deref(),
        }
    }
}

/// Payload types that can be pulled out of an [`Attachment`]
pub trait AttachmentKind {
    fn from_attachment(attachment: &Attachment) -> Option<&Self>;
}

macro_rules! attachment_kind {
    ($($variant:ident),* $(,)?) => {
        $(
            impl AttachmentKind for $variant {
                fn from_attachment(attachment: &Attachment) -> Option<&Self> {
                    match attachment {
                        Attachment::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }

            impl From<$variant> for Attachment {
                fn from(inner: $variant) -> Self {
                    Attachment::$variant(inner)
                }
            }
        )*
    };
}

attachment_kind!(
    MeshFilter,
    Renderer,
    Camera,
    Light,
    ReflectionProbe,
    AudioSource,
    Collider,
    Rigidbody,
    ParticleSystem,
    Script,
);

// =============================================================================
// Rendering
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshFilter {
    pub mesh: Option<MeshId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererKind {
    Mesh,
    SkinnedMesh,
    Sprite,
    Line,
    Trail,
}

impl RendererKind {
    pub fn type_name(self) -> &'static str {
        match self {
            RendererKind::Mesh => "MeshRenderer",
            RendererKind::SkinnedMesh => "SkinnedMeshRenderer",
            RendererKind::Sprite => "SpriteRenderer",
            RendererKind::Line => "LineRenderer",
            RendererKind::Trail => "TrailRenderer",
        }
    }

    pub fn qualified_name(self) -> &'static str {
        match self {
            RendererKind::Mesh => "rendering.MeshRenderer",
            RendererKind::SkinnedMesh => "rendering.SkinnedMeshRenderer",
            RendererKind::Sprite => "rendering.SpriteRenderer",
            RendererKind::Line => "rendering.LineRenderer",
            RendererKind::Trail => "rendering.TrailRenderer",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Renderer {
    pub kind: RendererKind,
    pub enabled: bool,
    /// Material slots in order; `None` for an empty slot
    pub materials: Vec<Option<MaterialId>>,
    /// Mesh owned by skinned renderers; mesh renderers read their node's
    /// [`MeshFilter`] instead
    pub mesh: Option<MeshId>,
}

impl Renderer {
    pub fn new(kind: RendererKind) -> Self {
        Self {
            kind,
            enabled: true,
            materials: Vec::new(),
            mesh: None,
        }
    }

    pub fn with_materials(mut self, materials: Vec<Option<MaterialId>>) -> Self {
        self.materials = materials;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshId) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Non-empty material slots
    pub fn material_ids(&self) -> impl Iterator<Item = MaterialId> + '_ {
        self.materials.iter().filter_map(|m| *m)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum RenderingPath {
    #[default]
    UsePlayerSettings,
    Forward,
    Deferred,
    VertexLit,
}

impl fmt::Display for RenderingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderingPath::UsePlayerSettings => write!(f, "UsePlayerSettings"),
            RenderingPath::Forward => write!(f, "Forward"),
            RenderingPath::Deferred => write!(f, "Deferred"),
            RenderingPath::VertexLit => write!(f, "VertexLit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub enabled: bool,
    pub rendering_path: RenderingPath,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            enabled: true,
            rendering_path: RenderingPath::default(),
        }
    }
}

// =============================================================================
// Lighting
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightType {
    Directional,
    Point,
    Spot,
    Area,
}

impl fmt::Display for LightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightType::Directional => write!(f, "Directional"),
            LightType::Point => write!(f, "Point"),
            LightType::Spot => write!(f, "Spot"),
            LightType::Area => write!(f, "Area"),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum LightRenderMode {
    #[default]
    Auto,
    ForcePixel,
    ForceVertex,
}

impl LightRenderMode {
    /// Auto and per-pixel lights are evaluated at runtime
    pub fn is_realtime(self) -> bool {
        matches!(self, LightRenderMode::Auto | LightRenderMode::ForcePixel)
    }
}

impl fmt::Display for LightRenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightRenderMode::Auto => write!(f, "Auto"),
            LightRenderMode::ForcePixel => write!(f, "ForcePixel"),
            LightRenderMode::ForceVertex => write!(f, "ForceVertex"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub light_type: LightType,
    pub render_mode: LightRenderMode,
}

impl Light {
    pub fn new(light_type: LightType) -> Self {
        Self {
            light_type,
            render_mode: LightRenderMode::default(),
        }
    }

    pub fn with_render_mode(mut self, mode: LightRenderMode) -> Self {
        self.render_mode = mode;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProbeMode {
    #[default]
    Baked,
    Realtime,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReflectionProbe {
    pub mode: ProbeMode,
}

// =============================================================================
// Audio, physics, effects
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AudioSource {
    pub play_on_awake: bool,
    pub looping: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColliderKind {
    Box,
    Sphere,
    Capsule,
    Mesh,
    Terrain,
    Wheel,
}

impl ColliderKind {
    pub fn type_name(self) -> &'static str {
        match self {
            ColliderKind::Box => "BoxCollider",
            ColliderKind::Sphere => "SphereCollider",
            ColliderKind::Capsule => "CapsuleCollider",
            ColliderKind::Mesh => "MeshCollider",
            ColliderKind::Terrain => "TerrainCollider",
            ColliderKind::Wheel => "WheelCollider",
        }
    }

    pub fn qualified_name(self) -> &'static str {
        match self {
            ColliderKind::Box => "physics.BoxCollider",
            ColliderKind::Sphere => "physics.SphereCollider",
            ColliderKind::Capsule => "physics.CapsuleCollider",
            ColliderKind::Mesh => "physics.MeshCollider",
            ColliderKind::Terrain => "physics.TerrainCollider",
            ColliderKind::Wheel => "physics.WheelCollider",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    pub kind: ColliderKind,
    pub is_trigger: bool,
}

impl Collider {
    pub fn new(kind: ColliderKind) -> Self {
        Self {
            kind,
            is_trigger: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rigidbody {
    pub is_kinematic: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParticleSystem {
    pub playing: bool,
    pub max_particles: u32,
}

/// User behaviour attached to a node
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Script {
    /// `None` when the script's type could not be resolved
    pub type_name: Option<String>,
}

impl Script {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
        }
    }

    pub fn missing() -> Self {
        Self { type_name: None }
    }
}
