//! Analyzer registry.
//!
//! The built-in registry is built on first access and shared read-only for
//! the rest of the process.

use std::collections::HashSet;
use std::sync::OnceLock;

use super::SceneAnalyzer;
use super::builtin::{
    AudioSources, Cameras, Colliders, Components, EmptyNodes, HierarchyDepth, Lights, Materials,
    NodeCounts, ParticleSystems, PrefabInstances, ReflectionProbes, Renderers,
    RenderingPerformance, Rigidbodies, Shaders, Textures,
};

/// Ordered collection of analyzers
pub struct AnalyzerRegistry {
    analyzers: Vec<Box<dyn SceneAnalyzer>>,
}

impl AnalyzerRegistry {
    /// Build a registry from an explicit analyzer list.
    ///
    /// A later analyzer whose category repeats an earlier one is dropped.
    pub fn new(analyzers: Vec<Box<dyn SceneAnalyzer>>) -> Self {
        let mut seen = HashSet::new();
        let analyzers = analyzers
            .into_iter()
            .filter(|a| {
                let fresh = seen.insert(a.category());
                if !fresh {
                    tracing::warn!("Duplicate analyzer category '{}' ignored", a.category());
                }
                fresh
            })
            .collect();
        Self { analyzers }
    }

    /// Process-wide registry of every built-in analyzer
    pub fn builtin() -> &'static AnalyzerRegistry {
        static BUILTIN: OnceLock<AnalyzerRegistry> = OnceLock::new();
        BUILTIN.get_or_init(|| Self::new(Self::builtin_analyzers()))
    }

    fn builtin_analyzers() -> Vec<Box<dyn SceneAnalyzer>> {
        vec![
            Box::new(NodeCounts),
            Box::new(HierarchyDepth),
            Box::new(EmptyNodes),
            Box::new(Renderers),
            Box::new(Materials),
            Box::new(Shaders),
            Box::new(Textures),
            Box::new(Cameras),
            Box::new(Colliders),
            Box::new(Rigidbodies),
            Box::new(PrefabInstances),
            Box::new(ParticleSystems),
            Box::new(Lights),
            Box::new(ReflectionProbes),
            Box::new(AudioSources),
            Box::new(RenderingPerformance),
            Box::new(Components),
        ]
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn SceneAnalyzer> {
        self.analyzers.iter().map(|a| a.as_ref())
    }

    /// Category names in registry order
    pub fn categories(&self) -> Vec<&'static str> {
        self.analyzers.iter().map(|a| a.category()).collect()
    }

    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }
}
