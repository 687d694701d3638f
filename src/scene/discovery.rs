use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::constants::discovery::{
    DEFAULT_MAX_FILE_SIZE, DEFAULT_SCENE_EXTENSIONS, DEFAULT_SKIP_DIRS, UNKNOWN_SCENE_NAME,
};
use crate::types::Result;

/// Finds scene documents below a directory
pub struct SceneScanner {
    root: PathBuf,
    extensions: Vec<String>,
    exclude: Vec<String>,
    max_file_size: u64,
}

impl SceneScanner {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let exclude = DEFAULT_SKIP_DIRS
            .iter()
            .map(|d| format!("**/{}/**", d))
            .collect();
        Self {
            root: root.as_ref().to_path_buf(),
            extensions: DEFAULT_SCENE_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            exclude,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Add glob patterns to skip (matched against the full path)
    pub fn with_exclude(mut self, patterns: Vec<String>) -> Self {
        self.exclude.extend(patterns);
        self
    }

    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scene files below the root, sorted by path
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .build();

        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();

            if !path.is_file() || self.should_exclude(path) || !self.has_scene_extension(path) {
                continue;
            }

            if let Ok(metadata) = path.metadata() {
                if metadata.len() > self.max_file_size {
                    tracing::warn!(
                        "Skipping oversized scene {} ({} bytes)",
                        path.display(),
                        metadata.len()
                    );
                    continue;
                }
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        self.exclude.iter().any(|pattern| {
            glob::Pattern::new(pattern)
                .map(|p| p.matches(&path_str))
                .unwrap_or(false)
        })
    }

    fn has_scene_extension(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        let name = name.to_lowercase();
        self.extensions
            .iter()
            .any(|ext| name.ends_with(&format!(".{}", ext.to_lowercase())))
    }
}

/// Human-readable scene name derived from its path.
///
/// Strips the scan root and the scene file suffix and normalizes separators:
/// `assets/levels/forest.scene.yaml` under `assets` becomes `levels/forest`.
pub fn descriptive_scene_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut name = relative.to_string_lossy().replace('\\', "/");

    if let Some(stripped) = name.strip_prefix("./") {
        name = stripped.to_string();
    }

    let file_start = name.rfind('/').map(|i| i + 1).unwrap_or(0);
    if let Some(dot) = name[file_start..].find('.') {
        name.truncate(file_start + dot);
    }

    if name.is_empty() || name.ends_with('/') {
        UNKNOWN_SCENE_NAME.to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_descriptive_scene_name() {
        assert_eq!(
            descriptive_scene_name(
                Path::new("assets"),
                Path::new("assets/levels/forest.scene.yaml")
            ),
            "levels/forest"
        );
        assert_eq!(
            descriptive_scene_name(Path::new("/other"), Path::new("menu.scene.json")),
            "menu"
        );
        assert_eq!(
            descriptive_scene_name(Path::new("."), Path::new("./town.yml")),
            "town"
        );
    }

    #[test]
    fn test_descriptive_scene_name_normalizes_backslashes() {
        assert_eq!(
            descriptive_scene_name(Path::new("x"), Path::new("levels\\cave.scene.yaml")),
            "levels/cave"
        );
    }

    #[test]
    fn test_descriptive_scene_name_unknown() {
        assert_eq!(
            descriptive_scene_name(Path::new("a"), Path::new(".scene.yaml")),
            UNKNOWN_SCENE_NAME
        );
    }

    #[test]
    fn test_scan_finds_scene_files() {
        let dir = TempDir::new().unwrap();
        let levels = dir.path().join("levels");
        fs::create_dir_all(&levels).unwrap();
        fs::create_dir_all(dir.path().join("target")).unwrap();

        fs::write(levels.join("b.scene.yaml"), "roots: []").unwrap();
        fs::write(levels.join("a.scene.json"), "{}").unwrap();
        fs::write(levels.join("notes.yaml"), "x: 1").unwrap();
        fs::write(dir.path().join("target/c.scene.yaml"), "roots: []").unwrap();

        let files = SceneScanner::new(dir.path()).scan().unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| descriptive_scene_name(dir.path(), p))
            .collect();
        assert_eq!(names, vec!["levels/a", "levels/b"]);
    }

    #[test]
    fn test_scan_respects_max_size() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("big.scene.yaml"), "roots: []\n".repeat(10)).unwrap();

        let files = SceneScanner::new(dir.path())
            .with_max_file_size(4)
            .scan()
            .unwrap();
        assert!(files.is_empty());
    }
}
