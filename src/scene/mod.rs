//! Scene graph model, scene document loading and scene file discovery.

pub mod attachment;
pub mod discovery;
pub mod graph;
pub mod loader;
pub mod resource;

pub use attachment::{
    Attachment, AttachmentKind, AudioSource, Camera, Collider, ColliderKind, Light,
    LightRenderMode, LightType, MeshFilter, ParticleSystem, ProbeMode, ReflectionProbe, Renderer,
    RendererKind, RenderingPath, Rigidbody, Script,
};
pub use discovery::{SceneScanner, descriptive_scene_name};
pub use graph::{Node, NodeId, PrefabLink, SceneGraph};
pub use loader::{SceneFormat, load_scene, parse_scene};
pub use resource::{
    Material, MaterialId, Mesh, MeshId, Texture, TextureDimension, TextureFormat, TextureId,
};
