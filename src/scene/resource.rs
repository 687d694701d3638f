//! Shared scene resources: materials, textures and meshes.
//!
//! Resources live in arenas owned by the [`SceneGraph`](super::SceneGraph) and
//! are referenced by handle. Two references are the same resource exactly when
//! their handles are equal.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::rendering::{COMPRESSED_BYTES_PER_PIXEL, DEFAULT_BYTES_PER_PIXEL};

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            pub fn new(index: u32) -> Self {
                Self(index)
            }

            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

arena_id!(
    /// Handle to a material in a scene's material arena
    MaterialId
);
arena_id!(
    /// Handle to a texture in a scene's texture arena
    TextureId
);
arena_id!(
    /// Handle to a mesh in a scene's mesh arena
    MeshId
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// Shader name; `None` when the shader is missing
    pub shader: Option<String>,
    pub gpu_instancing: bool,
    /// Texture properties in declaration order; `None` for an empty slot
    pub textures: Vec<(String, Option<TextureId>)>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shader: None,
            gpu_instancing: false,
            textures: Vec::new(),
        }
    }

    pub fn with_shader(mut self, shader: impl Into<String>) -> Self {
        self.shader = Some(shader.into());
        self
    }

    pub fn with_instancing(mut self, enabled: bool) -> Self {
        self.gpu_instancing = enabled;
        self
    }

    pub fn with_texture(mut self, property: impl Into<String>, texture: Option<TextureId>) -> Self {
        self.textures.push((property.into(), texture));
        self
    }

    /// Texture handles bound to this material, skipping empty slots
    pub fn texture_ids(&self) -> impl Iterator<Item = TextureId> + '_ {
        self.textures.iter().filter_map(|(_, id)| *id)
    }
}

/// Pixel storage format of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextureFormat {
    Alpha8,
    R16,
    Rgb565,
    Rgb24,
    #[default]
    Rgba32,
    RgbaHalf,
    RgbaFloat,
    Dxt1,
    Dxt5,
    Bc7,
    Etc2,
    Astc,
    #[serde(other)]
    Unknown,
}

impl TextureFormat {
    /// Approximate storage cost of one pixel.
    ///
    /// Block-compressed formats are approximated at one byte per pixel and
    /// unrecognized formats fall back to four.
    pub fn bytes_per_pixel(self) -> u64 {
        match self {
            TextureFormat::Alpha8 => 1,
            TextureFormat::R16 | TextureFormat::Rgb565 => 2,
            TextureFormat::Rgb24 => 3,
            TextureFormat::Rgba32 => 4,
            TextureFormat::RgbaHalf => 8,
            TextureFormat::RgbaFloat => 16,
            TextureFormat::Dxt1
            | TextureFormat::Dxt5
            | TextureFormat::Bc7
            | TextureFormat::Etc2
            | TextureFormat::Astc => COMPRESSED_BYTES_PER_PIXEL,
            TextureFormat::Unknown => DEFAULT_BYTES_PER_PIXEL,
        }
    }

    pub fn is_compressed(self) -> bool {
        matches!(
            self,
            TextureFormat::Dxt1
                | TextureFormat::Dxt5
                | TextureFormat::Bc7
                | TextureFormat::Etc2
                | TextureFormat::Astc
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextureDimension {
    #[default]
    Tex2d,
    Cube,
    Tex3d,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Texture {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub dimension: TextureDimension,
}

impl Texture {
    pub fn new_2d(name: impl Into<String>, width: u32, height: u32, format: TextureFormat) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            format,
            dimension: TextureDimension::Tex2d,
        }
    }

    pub fn is_2d(&self) -> bool {
        self.dimension == TextureDimension::Tex2d
    }

    /// Largest of width and height
    pub fn max_dimension(&self) -> u32 {
        self.width.max(self.height)
    }

    pub fn estimated_bytes(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height) * self.format.bytes_per_pixel()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mesh {
    pub name: String,
    pub vertex_count: u32,
    pub triangle_count: u32,
}

impl Mesh {
    pub fn new(name: impl Into<String>, vertex_count: u32, triangle_count: u32) -> Self {
        Self {
            name: name.into(),
            vertex_count,
            triangle_count,
        }
    }
}
