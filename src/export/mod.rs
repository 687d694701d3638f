//! Multi-scene aggregation and CSV export.
//!
//! ```rust,ignore
//! let (table, _) = aggregate_scenes(&collector, &settings, scenes);
//! export(&table, &ExportDestination::File(path), &CsvExporter::default())?;
//! ```

mod aggregate;
mod destination;
mod table;
mod writer;

pub use aggregate::{AggregateSummary, aggregate_scenes};
pub use destination::{ExportDestination, ExportOutcome, export, suggested_file_name};
pub use table::{AggregatedTable, TableRow};
pub use writer::CsvExporter;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::SceneMetricsCollector;
    use crate::config::{AnalyzerSettings, Toggle};
    use crate::scene::{SceneScanner, descriptive_scene_name, load_scene};
    use std::fs;
    use tempfile::TempDir;

    const SCENE_A: &str = r#"
name: A
roots:
  - name: Root
    children:
      - name: Child
        children:
          - name: Grandchild
  - name: Lamp
    components:
      - { type: light, kind: point }
  - name: Ground
"#;

    const SCENE_B: &str = r#"
name: B
roots:
  - name: Root
    children:
      - name: Left
      - name: Right
        active: false
"#;

    #[test]
    fn test_two_scene_report() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.scene.yaml"), SCENE_A).unwrap();
        fs::write(dir.path().join("b.scene.yaml"), SCENE_B).unwrap();

        let mut settings = AnalyzerSettings::default();
        settings
            .toggles
            .only(&[Toggle::NodeCounts, Toggle::HierarchyDepth]);

        let paths = SceneScanner::new(dir.path()).scan().unwrap();
        let scenes = paths
            .iter()
            .map(|p| (descriptive_scene_name(dir.path(), p), load_scene(p)));
        let (table, summary) =
            aggregate_scenes(&SceneMetricsCollector::default(), &settings, scenes);
        assert_eq!(summary.analyzed, 2);

        let path = dir.path().join("out/report.csv");
        let outcome = export(
            &table,
            &ExportDestination::File(path.clone()),
            &CsvExporter::default(),
        )
        .unwrap();
        assert_eq!(outcome, ExportOutcome::Written { path: path.clone(), rows: 7 });

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            concat!(
                "\"Category\",\"Metric\",\"a\",\"b\"\n",
                "\"Hierarchy Depth\",\"Average Node Depth\",\"0.6\",\"0.6667\"\n",
                "\"Hierarchy Depth\",\"Maximum Hierarchy Depth\",\"2\",\"1\"\n",
                "\"Hierarchy Depth\",\"Nodes Exceeding Recommended Depth\",\"0\",\"0\"\n",
                "\"Hierarchy Depth\",\"Total Depth Distribution Count\",\"5\",\"3\"\n",
                "\"Node Counts\",\"Active Nodes\",\"5\",\"2\"\n",
                "\"Node Counts\",\"Inactive Nodes\",\"0\",\"1\"\n",
                "\"Node Counts\",\"Total Nodes\",\"5\",\"3\"\n",
            )
        );
    }
}
