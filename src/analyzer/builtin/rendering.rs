//! Renderer, material, shader, texture, camera and draw call analyzers.

use std::collections::HashSet;

use super::{Tally, metric};
use crate::analyzer::{SceneAnalyzer, attachments_of, resolve_nodes};
use crate::config::AnalyzerSettings;
use crate::constants::rendering::{BYTES_PER_MIB, DYNAMIC_BATCHING_VERTEX_LIMIT, HIGH_POLY_TRIANGLES};
use crate::scene::{
    Camera, Material, MaterialId, Mesh, MeshFilter, Node, NodeId, Renderer, RendererKind,
    SceneGraph,
};
use crate::types::{MetricMap, Result};

/// Mesh of the node's first mesh filter, if it resolves
fn filter_mesh<'s>(node: &Node, scene: &'s SceneGraph) -> Option<&'s Mesh> {
    attachments_of::<MeshFilter>(node)
        .next()
        .and_then(|f| f.mesh)
        .and_then(|id| scene.mesh(id))
}

/// Materials bound to a renderer's non-empty slots that resolve
fn renderer_materials<'s>(
    renderer: &'s Renderer,
    scene: &'s SceneGraph,
) -> impl Iterator<Item = (MaterialId, &'s Material)> + 's {
    renderer
        .material_ids()
        .filter_map(move |id| scene.material(id).map(|m| (id, m)))
}

pub struct Renderers;

impl SceneAnalyzer for Renderers {
    fn category(&self) -> &'static str {
        "Renderers"
    }

    fn should_run(&self, settings: &AnalyzerSettings) -> bool {
        settings.toggles.renderers
    }

    fn analyze(
        &self,
        objects: &[NodeId],
        scene: &SceneGraph,
        settings: &AnalyzerSettings,
    ) -> Result<MetricMap> {
        let mut kinds = Tally::default();
        let mut triangles = 0u64;
        let mut vertices = 0u64;
        let mut high_poly = 0u64;

        for (_, node) in resolve_nodes(objects, scene) {
            for renderer in attachments_of::<Renderer>(node) {
                kinds.add(renderer.kind.type_name());

                let mesh = match renderer.kind {
                    RendererKind::Mesh => filter_mesh(node, scene),
                    RendererKind::SkinnedMesh => renderer.mesh.and_then(|id| scene.mesh(id)),
                    _ => None,
                };
                if let Some(mesh) = mesh {
                    let tris = u64::from(mesh.triangle_count);
                    triangles += tris;
                    vertices += u64::from(mesh.vertex_count);
                    if tris > HIGH_POLY_TRIANGLES {
                        high_poly += 1;
                    }
                }
            }
        }

        let mut metrics = MetricMap::new();
        kinds.emit(&mut metrics, |kind| format!("{} Count", kind));
        metric(&mut metrics, "Total Triangle Count", triangles);
        metric(&mut metrics, "Total Vertex Count", vertices);
        metric(&mut metrics, "High-Poly Renderer Count", high_poly);
        let over_budget = triangles > settings.thresholds.max_triangle_count;
        metric(
            &mut metrics,
            "Exceeds Triangle Budget",
            if over_budget { "Yes" } else { "No" },
        );
        Ok(metrics)
    }
}

pub struct Materials;

impl SceneAnalyzer for Materials {
    fn category(&self) -> &'static str {
        "Materials"
    }

    fn should_run(&self, settings: &AnalyzerSettings) -> bool {
        settings.toggles.materials
    }

    fn analyze(
        &self,
        objects: &[NodeId],
        scene: &SceneGraph,
        _settings: &AnalyzerSettings,
    ) -> Result<MetricMap> {
        let mut slots = 0usize;
        let mut usage: Tally<MaterialId> = Tally::default();

        for (_, node) in resolve_nodes(objects, scene) {
            for renderer in attachments_of::<Renderer>(node) {
                slots += renderer.materials.len();
                for (id, _) in renderer_materials(renderer, scene) {
                    usage.add(id);
                }
            }
        }

        let mut metrics = MetricMap::new();
        metric(&mut metrics, "Unique Material Count", usage.distinct());
        metric(&mut metrics, "Total Material Slots", slots);
        metric(&mut metrics, "Most Used Material Count", usage.most_common());
        Ok(metrics)
    }
}

pub struct Shaders;

impl SceneAnalyzer for Shaders {
    fn category(&self) -> &'static str {
        "Shaders"
    }

    fn should_run(&self, settings: &AnalyzerSettings) -> bool {
        settings.toggles.shaders
    }

    fn analyze(
        &self,
        objects: &[NodeId],
        scene: &SceneGraph,
        _settings: &AnalyzerSettings,
    ) -> Result<MetricMap> {
        let mut usage: Tally<&str> = Tally::default();

        for (_, node) in resolve_nodes(objects, scene) {
            for renderer in attachments_of::<Renderer>(node) {
                for (_, material) in renderer_materials(renderer, scene) {
                    if let Some(shader) = material.shader.as_deref() {
                        usage.add(shader);
                    }
                }
            }
        }

        let mut metrics = MetricMap::new();
        metric(&mut metrics, "Unique Shader Count", usage.distinct());
        metric(&mut metrics, "Most Used Shader Count", usage.most_common());
        Ok(metrics)
    }
}

pub struct Textures;

impl SceneAnalyzer for Textures {
    fn category(&self) -> &'static str {
        "Textures"
    }

    fn should_run(&self, settings: &AnalyzerSettings) -> bool {
        settings.toggles.textures
    }

    fn analyze(
        &self,
        objects: &[NodeId],
        scene: &SceneGraph,
        settings: &AnalyzerSettings,
    ) -> Result<MetricMap> {
        let limit = settings.thresholds.max_texture_size;
        let mut unique = HashSet::new();
        let mut large = 0u64;
        let mut bytes = 0u64;
        let mut max_size = 0u32;

        for (_, node) in resolve_nodes(objects, scene) {
            for renderer in attachments_of::<Renderer>(node) {
                for (_, material) in renderer_materials(renderer, scene) {
                    for texture_id in material.texture_ids() {
                        let Some(texture) = scene.texture(texture_id) else {
                            continue;
                        };
                        // size and memory are counted once per texture
                        if !unique.insert(texture_id) || !texture.is_2d() {
                            continue;
                        }
                        if texture.width > limit || texture.height > limit {
                            large += 1;
                        }
                        max_size = max_size.max(texture.max_dimension());
                        bytes += texture.estimated_bytes();
                    }
                }
            }
        }

        let mut metrics = MetricMap::new();
        metric(&mut metrics, "Unique Texture Count", unique.len());
        metric(
            &mut metrics,
            "Estimated Texture Memory (MB)",
            bytes as f64 / BYTES_PER_MIB,
        );
        metric(&mut metrics, "Large Textures Count", large);
        metric(&mut metrics, "Maximum Texture Size", max_size);
        Ok(metrics)
    }
}

pub struct Cameras;

impl SceneAnalyzer for Cameras {
    fn category(&self) -> &'static str {
        "Cameras"
    }

    fn should_run(&self, settings: &AnalyzerSettings) -> bool {
        settings.toggles.cameras
    }

    fn analyze(
        &self,
        objects: &[NodeId],
        scene: &SceneGraph,
        _settings: &AnalyzerSettings,
    ) -> Result<MetricMap> {
        let mut total = 0usize;
        let mut active = 0usize;
        let mut paths = Tally::default();

        for (id, node) in resolve_nodes(objects, scene) {
            let node_active = scene.is_active_in_hierarchy(id);
            for camera in attachments_of::<Camera>(node) {
                total += 1;
                if node_active && camera.enabled {
                    active += 1;
                }
                paths.add(camera.rendering_path);
            }
        }

        let mut metrics = MetricMap::new();
        metric(&mut metrics, "Total Cameras", total);
        metric(&mut metrics, "Active Cameras", active);
        paths.emit(&mut metrics, |path| format!("Render Path: {}", path));
        Ok(metrics)
    }
}

/// Draw call, batching and instancing estimates.
///
/// Only the first renderer of a node is considered, and only when enabled.
pub struct RenderingPerformance;

impl SceneAnalyzer for RenderingPerformance {
    fn category(&self) -> &'static str {
        "Rendering Performance"
    }

    fn should_run(&self, settings: &AnalyzerSettings) -> bool {
        let t = &settings.toggles;
        t.draw_calls || t.batching || t.gpu_instancing
    }

    fn analyze(
        &self,
        objects: &[NodeId],
        scene: &SceneGraph,
        _settings: &AnalyzerSettings,
    ) -> Result<MetricMap> {
        let mut draw_calls = 0u64;
        let mut static_batched = 0u64;
        let mut dynamic_candidates = 0u64;
        let mut instanced = 0u64;

        for (_, node) in resolve_nodes(objects, scene) {
            let Some(renderer) = attachments_of::<Renderer>(node).next() else {
                continue;
            };
            if !renderer.enabled {
                continue;
            }
            draw_calls += 1;

            if node.batching_static {
                static_batched += 1;
            } else if filter_mesh(node, scene)
                .is_some_and(|mesh| mesh.vertex_count < DYNAMIC_BATCHING_VERTEX_LIMIT)
            {
                dynamic_candidates += 1;
            }

            if renderer_materials(renderer, scene).any(|(_, m)| m.gpu_instancing) {
                instanced += 1;
            }
        }

        let mut metrics = MetricMap::new();
        metric(&mut metrics, "Potential Draw Calls", draw_calls);
        metric(&mut metrics, "Static Batching Nodes", static_batched);
        metric(&mut metrics, "Dynamic Batching Candidates", dynamic_candidates);
        metric(&mut metrics, "GPU Instancing Nodes", instanced);
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::flatten_scene;
    use crate::scene::{RenderingPath, Texture, TextureDimension, TextureFormat};
    use crate::types::MetricValue;

    struct Fixture {
        scene: SceneGraph,
        objects: Vec<NodeId>,
    }

    /// Two crates sharing one material, a skinned character and a disabled sprite
    fn fixture() -> Fixture {
        let mut scene = SceneGraph::new("Props");
        let albedo = scene.add_texture(Texture::new_2d("albedo", 4096, 1024, TextureFormat::Rgba32));
        let normal = scene.add_texture(Texture::new_2d("normal", 512, 512, TextureFormat::Dxt5));
        let cube = scene.add_texture(Texture {
            dimension: TextureDimension::Cube,
            ..Texture::new_2d("sky", 8192, 8192, TextureFormat::RgbaFloat)
        });

        let wood = scene.add_material(
            Material::new("Wood")
                .with_shader("Standard")
                .with_instancing(true)
                .with_texture("_MainTex", Some(albedo))
                .with_texture("_BumpMap", Some(normal)),
        );
        let skin = scene.add_material(
            Material::new("Skin")
                .with_shader("Standard")
                .with_texture("_MainTex", Some(albedo))
                .with_texture("_Cube", Some(cube)),
        );
        let unlit = scene.add_material(Material::new("Unlit").with_shader("Unlit/Color"));

        let crate_mesh = scene.add_mesh(Mesh::new("Crate", 24, 12));
        let body_mesh = scene.add_mesh(Mesh::new("Body", 9000, 6000));

        let root = scene.add_root(Node::new("Props"));
        for name in ["CrateA", "CrateB"] {
            scene
                .add_child(
                    root,
                    Node::new(name)
                        .with_attachment(MeshFilter {
                            mesh: Some(crate_mesh),
                        })
                        .with_attachment(
                            Renderer::new(RendererKind::Mesh)
                                .with_materials(vec![Some(wood), None]),
                        ),
                )
                .unwrap();
        }
        scene
            .add_child(
                root,
                Node::new("Hero").batching_static().with_attachment(
                    Renderer::new(RendererKind::SkinnedMesh)
                        .with_mesh(body_mesh)
                        .with_materials(vec![Some(skin)]),
                ),
            )
            .unwrap();
        scene
            .add_child(
                root,
                Node::new("Icon").with_attachment(
                    Renderer::new(RendererKind::Sprite)
                        .with_materials(vec![Some(unlit)])
                        .disabled(),
                ),
            )
            .unwrap();
        scene
            .add_child(
                root,
                Node::new("Eye")
                    .with_attachment(Camera {
                        rendering_path: RenderingPath::Deferred,
                        ..Camera::default()
                    })
                    .with_attachment(Camera {
                        enabled: false,
                        ..Camera::default()
                    }),
            )
            .unwrap();

        let objects = flatten_scene(&scene);
        Fixture { scene, objects }
    }

    fn run(analyzer: &dyn SceneAnalyzer, settings: &AnalyzerSettings) -> MetricMap {
        let f = fixture();
        analyzer.analyze(&f.objects, &f.scene, settings).unwrap()
    }

    #[test]
    fn test_renderers() {
        let metrics = run(&Renderers, &AnalyzerSettings::default());
        assert_eq!(metrics["MeshRenderer Count"], MetricValue::Int(2));
        assert_eq!(metrics["SkinnedMeshRenderer Count"], MetricValue::Int(1));
        assert_eq!(metrics["SpriteRenderer Count"], MetricValue::Int(1));
        assert!(!metrics.contains_key("LineRenderer Count"));
        assert_eq!(metrics["Total Triangle Count"], MetricValue::Int(6024));
        assert_eq!(metrics["Total Vertex Count"], MetricValue::Int(9048));
        assert_eq!(metrics["High-Poly Renderer Count"], MetricValue::Int(1));
        assert_eq!(metrics["Exceeds Triangle Budget"], MetricValue::from("No"));
    }

    #[test]
    fn test_triangle_budget() {
        let mut settings = AnalyzerSettings::default();
        settings.thresholds.max_triangle_count = 5000;
        let metrics = run(&Renderers, &settings);
        assert_eq!(metrics["Exceeds Triangle Budget"], MetricValue::from("Yes"));
    }

    #[test]
    fn test_materials_dedup_by_handle() {
        let metrics = run(&Materials, &AnalyzerSettings::default());
        assert_eq!(metrics["Unique Material Count"], MetricValue::Int(3));
        assert_eq!(metrics["Total Material Slots"], MetricValue::Int(6));
        assert_eq!(metrics["Most Used Material Count"], MetricValue::Int(2));
    }

    #[test]
    fn test_shaders() {
        let metrics = run(&Shaders, &AnalyzerSettings::default());
        assert_eq!(metrics["Unique Shader Count"], MetricValue::Int(2));
        assert_eq!(metrics["Most Used Shader Count"], MetricValue::Int(3));
    }

    #[test]
    fn test_textures_counted_once() {
        let metrics = run(&Textures, &AnalyzerSettings::default());
        assert_eq!(metrics["Unique Texture Count"], MetricValue::Int(3));
        assert_eq!(metrics["Large Textures Count"], MetricValue::Int(1));
        assert_eq!(metrics["Maximum Texture Size"], MetricValue::Int(4096));

        let expected = (4096.0 * 1024.0 * 4.0 + 512.0 * 512.0) / BYTES_PER_MIB;
        let memory = metrics["Estimated Texture Memory (MB)"].as_f64().unwrap();
        assert!((memory - expected).abs() < 1e-9);
    }

    #[test]
    fn test_cameras() {
        let metrics = run(&Cameras, &AnalyzerSettings::default());
        assert_eq!(metrics["Total Cameras"], MetricValue::Int(2));
        assert_eq!(metrics["Active Cameras"], MetricValue::Int(1));
        assert_eq!(metrics["Render Path: Deferred"], MetricValue::Int(1));
        assert_eq!(metrics["Render Path: UsePlayerSettings"], MetricValue::Int(1));
    }

    #[test]
    fn test_rendering_performance() {
        let metrics = run(&RenderingPerformance, &AnalyzerSettings::default());
        assert_eq!(metrics["Potential Draw Calls"], MetricValue::Int(3));
        assert_eq!(metrics["Static Batching Nodes"], MetricValue::Int(1));
        assert_eq!(metrics["Dynamic Batching Candidates"], MetricValue::Int(2));
        assert_eq!(metrics["GPU Instancing Nodes"], MetricValue::Int(2));
    }

    #[test]
    fn test_rendering_performance_toggles() {
        let mut settings = AnalyzerSettings::default();
        settings.toggles.set_all(false);
        assert!(!RenderingPerformance.should_run(&settings));
        settings.toggles.batching = true;
        assert!(RenderingPerformance.should_run(&settings));
    }

    #[test]
    fn test_empty_scene_reports_zeros() {
        let scene = SceneGraph::new("Empty");
        let metrics = Textures
            .analyze(&[], &scene, &AnalyzerSettings::default())
            .unwrap();
        assert_eq!(metrics["Unique Texture Count"], MetricValue::Int(0));
        assert_eq!(metrics["Estimated Texture Memory (MB)"], MetricValue::Float(0.0));
    }
}
