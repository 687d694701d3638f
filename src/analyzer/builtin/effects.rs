//! Particle system, light, reflection probe and audio source analyzers.

use super::{Tally, metric};
use crate::analyzer::{SceneAnalyzer, attachments_of, resolve_nodes};
use crate::config::AnalyzerSettings;
use crate::constants::effects::HIGH_PARTICLE_COUNT;
use crate::scene::{AudioSource, Light, NodeId, ParticleSystem, ProbeMode, ReflectionProbe, SceneGraph};
use crate::types::{MetricMap, Result};

pub struct ParticleSystems;

impl SceneAnalyzer for ParticleSystems {
    fn category(&self) -> &'static str {
        "Particle Systems"
    }

    fn should_run(&self, settings: &AnalyzerSettings) -> bool {
        settings.toggles.particle_systems
    }

    fn analyze(
        &self,
        objects: &[NodeId],
        scene: &SceneGraph,
        _settings: &AnalyzerSettings,
    ) -> Result<MetricMap> {
        let mut total = 0usize;
        let mut active = 0usize;
        let mut max_particles = 0u64;
        let mut high_count = 0usize;

        for (id, node) in resolve_nodes(objects, scene) {
            let node_active = scene.is_active_in_hierarchy(id);
            for system in attachments_of::<ParticleSystem>(node) {
                total += 1;
                if node_active && system.playing {
                    active += 1;
                }
                max_particles += u64::from(system.max_particles);
                if system.max_particles > HIGH_PARTICLE_COUNT {
                    high_count += 1;
                }
            }
        }

        let mut metrics = MetricMap::new();
        metric(&mut metrics, "Total Particle Systems", total);
        metric(&mut metrics, "Active Particle Systems", active);
        metric(&mut metrics, "Total Max Particle Count", max_particles);
        metric(&mut metrics, "High Particle Count Systems", high_count);
        Ok(metrics)
    }
}

pub struct Lights;

impl SceneAnalyzer for Lights {
    fn category(&self) -> &'static str {
        "Lights"
    }

    fn should_run(&self, settings: &AnalyzerSettings) -> bool {
        settings.toggles.lights
    }

    fn analyze(
        &self,
        objects: &[NodeId],
        scene: &SceneGraph,
        _settings: &AnalyzerSettings,
    ) -> Result<MetricMap> {
        let mut total = 0usize;
        let mut realtime = 0usize;
        let mut types = Tally::default();
        let mut modes = Tally::default();

        for (_, node) in resolve_nodes(objects, scene) {
            for light in attachments_of::<Light>(node) {
                total += 1;
                types.add(light.light_type);
                modes.add(light.render_mode);
                if light.render_mode.is_realtime() {
                    realtime += 1;
                }
            }
        }

        let mut metrics = MetricMap::new();
        metric(&mut metrics, "Total Lights", total);
        metric(&mut metrics, "Realtime Lights", realtime);
        types.emit(&mut metrics, |t| format!("{} Light Count", t));
        modes.emit(&mut metrics, |m| format!("{} Render Mode Count", m));
        Ok(metrics)
    }
}

pub struct ReflectionProbes;

impl SceneAnalyzer for ReflectionProbes {
    fn category(&self) -> &'static str {
        "Reflection Probes"
    }

    fn should_run(&self, settings: &AnalyzerSettings) -> bool {
        settings.toggles.reflection_probes
    }

    fn analyze(
        &self,
        objects: &[NodeId],
        scene: &SceneGraph,
        _settings: &AnalyzerSettings,
    ) -> Result<MetricMap> {
        let probes: Vec<&ReflectionProbe> = resolve_nodes(objects, scene)
            .flat_map(|(_, node)| attachments_of::<ReflectionProbe>(node))
            .collect();
        let realtime = probes
            .iter()
            .filter(|p| p.mode == ProbeMode::Realtime)
            .count();

        let mut metrics = MetricMap::new();
        metric(&mut metrics, "Total Reflection Probes", probes.len());
        metric(&mut metrics, "Realtime Reflection Probes", realtime);
        Ok(metrics)
    }
}

pub struct AudioSources;

impl SceneAnalyzer for AudioSources {
    fn category(&self) -> &'static str {
        "Audio Sources"
    }

    fn should_run(&self, settings: &AnalyzerSettings) -> bool {
        settings.toggles.audio_sources
    }

    fn analyze(
        &self,
        objects: &[NodeId],
        scene: &SceneGraph,
        _settings: &AnalyzerSettings,
    ) -> Result<MetricMap> {
        let mut total = 0usize;
        let mut play_on_awake = 0usize;
        let mut looping = 0usize;

        for source in resolve_nodes(objects, scene)
            .flat_map(|(_, node)| attachments_of::<AudioSource>(node))
        {
            total += 1;
            play_on_awake += usize::from(source.play_on_awake);
            looping += usize::from(source.looping);
        }

        let mut metrics = MetricMap::new();
        metric(&mut metrics, "Total Audio Sources", total);
        metric(&mut metrics, "Play On Awake Sources", play_on_awake);
        metric(&mut metrics, "Looping Audio Sources", looping);
        Ok(metrics)
    }
}
