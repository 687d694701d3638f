//! Where an exported report goes.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{error, info};

use super::table::AggregatedTable;
use super::writer::CsvExporter;
use crate::types::{Result, SceneMetricsError};

/// Output target chosen by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportDestination {
    File(PathBuf),
    Stdout,
    /// The caller chose not to export
    Declined,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written { path: PathBuf, rows: usize },
    Printed { rows: usize },
    Cancelled,
}

/// `<prefix>_<YYYYMMDD>.csv`
pub fn suggested_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}_{}.csv", prefix, date.format("%Y%m%d"))
}

/// Serialize the table to the destination
pub fn export(
    table: &AggregatedTable,
    destination: &ExportDestination,
    exporter: &CsvExporter,
) -> Result<ExportOutcome> {
    if *destination == ExportDestination::Declined {
        info!("Export cancelled, no destination chosen");
        return Ok(ExportOutcome::Cancelled);
    }

    if table.is_empty() {
        return Err(SceneMetricsError::NothingToExport);
    }

    let rows = table.metric_keys().len();
    match destination {
        ExportDestination::File(path) => {
            write_file(table, path, exporter).inspect_err(|e| error!("{}", e))?;
            info!("Exported {} metrics for {} scenes to {}", rows, table.scene_count(), path.display());
            Ok(ExportOutcome::Written {
                path: path.clone(),
                rows,
            })
        }
        ExportDestination::Stdout => {
            write_stream(table, io::stdout().lock(), "<stdout>", exporter)?;
            Ok(ExportOutcome::Printed { rows })
        }
        ExportDestination::Declined => Ok(ExportOutcome::Cancelled),
    }
}

fn write_stream<W: Write>(
    table: &AggregatedTable,
    mut writer: W,
    label: &str,
    exporter: &CsvExporter,
) -> Result<()> {
    exporter
        .write_to(table, &mut writer)
        .and_then(|()| writer.flush().map_err(SceneMetricsError::from))
        .map_err(|e| SceneMetricsError::export(label, e))
        .inspect_err(|e| error!("{}", e))
}

fn write_file(table: &AggregatedTable, path: &Path, exporter: &CsvExporter) -> Result<()> {
    let display = path.display().to_string();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SceneMetricsError::export(&display, e))?;
    }

    let file = File::create(path).map_err(|e| SceneMetricsError::export(&display, e))?;
    let mut writer = BufWriter::new(file);
    exporter
        .write_to(table, &mut writer)
        .map_err(|e| SceneMetricsError::export(&display, e))?;
    writer
        .flush()
        .map_err(|e| SceneMetricsError::export(&display, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MetricMap, MetricValue, SceneMetrics};
    use tempfile::TempDir;

    fn table() -> AggregatedTable {
        let mut metrics = MetricMap::new();
        metrics.insert("Total Lights".to_string(), MetricValue::Int(2));
        let mut result = SceneMetrics::new();
        result.insert("Lights", metrics);

        let mut table = AggregatedTable::new();
        table.insert("Forest", result);
        table
    }

    #[test]
    fn test_suggested_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            suggested_file_name("SceneMetrics", date),
            "SceneMetrics_20240307.csv"
        );
    }

    #[test]
    fn test_declined_is_not_an_error() {
        let outcome = export(
            &AggregatedTable::new(),
            &ExportDestination::Declined,
            &CsvExporter::default(),
        )
        .unwrap();
        assert_eq!(outcome, ExportOutcome::Cancelled);
    }

    #[test]
    fn test_empty_table_rejected() {
        let dir = TempDir::new().unwrap();
        let err = export(
            &AggregatedTable::new(),
            &ExportDestination::File(dir.path().join("out.csv")),
            &CsvExporter::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SceneMetricsError::NothingToExport));
    }

    #[test]
    fn test_write_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports/out.csv");
        let outcome = export(
            &table(),
            &ExportDestination::File(path.clone()),
            &CsvExporter::default(),
        )
        .unwrap();

        assert_eq!(outcome, ExportOutcome::Written { path: path.clone(), rows: 1 });
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "\"Category\",\"Metric\",\"Forest\"\n\"Lights\",\"Total Lights\",\"2\"\n"
        );
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_stream_failure_is_export_fault() {
        let err = write_stream(&table(), BrokenPipe, "<stdout>", &CsvExporter::default())
            .unwrap_err();
        match err {
            SceneMetricsError::Export { path, .. } => assert_eq!(path, "<stdout>"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_write_failure_is_export_fault() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let err = export(
            &table(),
            &ExportDestination::File(blocker.join("out.csv")),
            &CsvExporter::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SceneMetricsError::Export { .. }));
    }
}
