//! CSV serialization of an [`AggregatedTable`].
//!
//! Header `Category,Metric,<scene..>`, one row per metric key, every field
//! quoted, missing cells rendered as `N/A`.

use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::table::AggregatedTable;
use crate::constants::export::{
    CATEGORY_HEADER, DEFAULT_FLOAT_PRECISION, METRIC_HEADER, MISSING_CELL,
};
use crate::types::Result;

#[derive(Debug, Clone, Copy)]
pub struct CsvExporter {
    pub float_precision: usize,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self {
            float_precision: DEFAULT_FLOAT_PRECISION,
        }
    }
}

impl CsvExporter {
    pub fn new(float_precision: usize) -> Self {
        Self { float_precision }
    }

    pub fn write_to<W: Write>(&self, table: &AggregatedTable, writer: W) -> Result<()> {
        let mut csv = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(writer);

        let mut header = vec![CATEGORY_HEADER, METRIC_HEADER];
        header.extend(table.scene_names());
        csv.write_record(&header)?;

        for row in table.rows() {
            let mut record = Vec::with_capacity(row.cells.len() + 2);
            record.push(row.category.to_string());
            record.push(row.metric.to_string());
            record.extend(row.cells.iter().map(|cell| match cell {
                Some(value) => value.render(self.float_precision),
                None => MISSING_CELL.to_string(),
            }));
            csv.write_record(&record)?;
        }

        csv.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self, table: &AggregatedTable) -> Result<String> {
        let mut buf = Vec::new();
        self.write_to(table, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MetricMap, MetricValue, SceneMetrics};
    use proptest::prelude::*;
    use std::collections::{BTreeMap, BTreeSet};

    fn scene(entries: &[(&str, &str, MetricValue)]) -> SceneMetrics {
        let mut grouped: BTreeMap<&str, MetricMap> = BTreeMap::new();
        for (category, metric, value) in entries {
            grouped
                .entry(*category)
                .or_default()
                .insert(metric.to_string(), value.clone());
        }
        let mut result = SceneMetrics::new();
        for (category, map) in grouped {
            result.insert(category, map);
        }
        result
    }

    #[test]
    fn test_csv_layout() {
        let mut table = AggregatedTable::new();
        table.insert(
            "Forest",
            scene(&[
                ("Lights", "Total Lights", MetricValue::Int(1200)),
                ("Hierarchy Depth", "Average Node Depth", MetricValue::Float(1.25)),
            ]),
        );
        table.insert(
            "Menu",
            scene(&[("Renderers", "Exceeds Triangle Budget", MetricValue::from("No"))]),
        );

        let csv = CsvExporter::default().to_csv_string(&table).unwrap();
        assert_eq!(
            csv,
            concat!(
                "\"Category\",\"Metric\",\"Forest\",\"Menu\"\n",
                "\"Hierarchy Depth\",\"Average Node Depth\",\"1.25\",\"N/A\"\n",
                "\"Lights\",\"Total Lights\",\"1200\",\"N/A\"\n",
                "\"Renderers\",\"Exceeds Triangle Budget\",\"N/A\",\"No\"\n",
            )
        );
    }

    #[test]
    fn test_embedded_quotes_doubled() {
        let mut table = AggregatedTable::new();
        table.insert(
            "Say \"hi\"",
            scene(&[("Components", "game.Thing", MetricValue::Int(1))]),
        );
        let csv = CsvExporter::default().to_csv_string(&table).unwrap();
        assert!(csv.starts_with("\"Category\",\"Metric\",\"Say \"\"hi\"\"\"\n"));
    }

    #[test]
    fn test_float_precision() {
        let mut table = AggregatedTable::new();
        table.insert(
            "S",
            scene(&[("Textures", "Estimated Texture Memory (MB)", MetricValue::Float(2.0 / 3.0))]),
        );
        let csv = CsvExporter::new(2).to_csv_string(&table).unwrap();
        assert!(csv.contains("\"0.67\""));
    }

    #[test]
    fn test_header_only_for_empty_results() {
        let mut table = AggregatedTable::new();
        table.insert("Blank", SceneMetrics::new());
        let csv = CsvExporter::default().to_csv_string(&table).unwrap();
        assert_eq!(csv, "\"Category\",\"Metric\",\"Blank\"\n");
    }

    fn arb_scene() -> impl Strategy<Value = Vec<(u8, u8, i64)>> {
        prop::collection::vec((0u8..4, 0u8..4, any::<i64>()), 0..10)
    }

    proptest! {
        #[test]
        fn prop_rows_are_key_union_with_na_cells(scenes in prop::collection::vec(arb_scene(), 1..4)) {
            let mut table = AggregatedTable::new();
            let mut expected_keys = BTreeSet::new();
            let mut results = Vec::new();
            for (i, entries) in scenes.iter().enumerate() {
                let entries: Vec<_> = entries
                    .iter()
                    .map(|(c, m, v)| (format!("C{}", c), format!("M{}", m), MetricValue::Int(*v)))
                    .collect();
                let borrowed: Vec<_> = entries
                    .iter()
                    .map(|(c, m, v)| (c.as_str(), m.as_str(), v.clone()))
                    .collect();
                for (c, m, _) in &entries {
                    expected_keys.insert((c.clone(), m.clone()));
                }
                let result = scene(&borrowed);
                results.push(result.clone());
                table.insert(format!("S{}", i), result);
            }

            let text = CsvExporter::default().to_csv_string(&table).unwrap();
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(true)
                .from_reader(text.as_bytes());
            let records: Vec<csv::StringRecord> =
                reader.records().collect::<std::result::Result<_, _>>().unwrap();

            let keys: BTreeSet<(String, String)> = records
                .iter()
                .map(|r| (r[0].to_string(), r[1].to_string()))
                .collect();
            prop_assert_eq!(keys.len(), records.len());
            prop_assert_eq!(&keys, &expected_keys);

            for record in &records {
                for (col, result) in results.iter().enumerate() {
                    let expected = result
                        .value(&record[0], &record[1])
                        .map(|v| v.render(DEFAULT_FLOAT_PRECISION))
                        .unwrap_or_else(|| MISSING_CELL.to_string());
                    prop_assert_eq!(&record[col + 2], expected.as_str());
                }
            }
        }
    }
}
