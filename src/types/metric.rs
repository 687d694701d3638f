//! Metric value, map and per-scene result types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::export::DEFAULT_FLOAT_PRECISION;

/// Scalar metric value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl MetricValue {
    /// Render as locale-independent text.
    ///
    /// Integers have no grouping separators. Floats are rounded to
    /// `precision` fractional digits with trailing zeros removed.
    pub fn render(&self, precision: usize) -> String {
        match self {
            MetricValue::Int(v) => v.to_string(),
            MetricValue::Float(v) => format_float(*v, precision),
            MetricValue::Text(s) => s.clone(),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetricValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Int(v) => Some(*v as f64),
            MetricValue::Float(v) => Some(*v),
            MetricValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetricValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

fn format_float(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let mut text = format!("{:.*}", precision, value);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(DEFAULT_FLOAT_PRECISION))
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for MetricValue {
                fn from(v: $t) -> Self {
                    MetricValue::Int(v as i64)
                }
            }
        )*
    };
}

impl_from_int!(i32, i64, u32, u64, usize);

impl From<f32> for MetricValue {
    fn from(v: f32) -> Self {
        MetricValue::Float(v as f64)
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Float(v)
    }
}

impl From<String> for MetricValue {
    fn from(v: String) -> Self {
        MetricValue::Text(v)
    }
}

impl From<&str> for MetricValue {
    fn from(v: &str) -> Self {
        MetricValue::Text(v.to_string())
    }
}

/// Metric name to value, unique within one category
pub type MetricMap = BTreeMap<String, MetricValue>;

/// Metrics for one scene, grouped by analyzer category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneMetrics {
    categories: BTreeMap<String, MetricMap>,
}

impl SceneMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the metrics of one category, replacing any previous map
    pub fn insert(&mut self, category: impl Into<String>, metrics: MetricMap) {
        self.categories.insert(category.into(), metrics);
    }

    pub fn category(&self, category: &str) -> Option<&MetricMap> {
        self.categories.get(category)
    }

    pub fn value(&self, category: &str, metric: &str) -> Option<&MetricValue> {
        self.categories.get(category)?.get(metric)
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &MetricMap)> {
        self.categories.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Total number of metrics across all categories
    pub fn metric_count(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_int_has_no_grouping() {
        assert_eq!(MetricValue::from(1_234_567usize).render(4), "1234567");
        assert_eq!(MetricValue::from(-12i32).render(4), "-12");
    }

    #[test]
    fn test_render_float_trims() {
        assert_eq!(MetricValue::from(1.5f64).render(4), "1.5");
        assert_eq!(MetricValue::from(2.0f64).render(4), "2");
        assert_eq!(MetricValue::from(1.0 / 3.0).render(4), "0.3333");
        assert_eq!(MetricValue::from(0.0f64).render(2), "0");
        assert_eq!(MetricValue::from(-0.00001f64).render(2), "0");
    }

    #[test]
    fn test_render_float_zero_precision() {
        assert_eq!(MetricValue::from(2.6f64).render(0), "3");
    }

    #[test]
    fn test_render_text_verbatim() {
        assert_eq!(MetricValue::from("Yes").render(4), "Yes");
    }

    #[test]
    fn test_display_uses_default_precision() {
        assert_eq!(MetricValue::from(2.0f64 / 3.0).to_string(), "0.6667");
    }

    #[test]
    fn test_scene_metrics_lookup() {
        let mut metrics = SceneMetrics::new();
        let mut lights = MetricMap::new();
        lights.insert("Total Lights".to_string(), 3usize.into());
        metrics.insert("Lights", lights);

        assert_eq!(
            metrics.value("Lights", "Total Lights"),
            Some(&MetricValue::Int(3))
        );
        assert!(metrics.value("Lights", "Realtime Lights").is_none());
        assert!(metrics.value("Cameras", "Total Cameras").is_none());
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics.metric_count(), 1);
    }

    #[test]
    fn test_serialize_json_shape() {
        let mut metrics = SceneMetrics::new();
        let mut map = MetricMap::new();
        map.insert("Average Node Depth".to_string(), 1.25f64.into());
        map.insert("Maximum Hierarchy Depth".to_string(), 2u32.into());
        metrics.insert("Hierarchy Depth", map);

        let json = serde_json::to_string(&metrics).unwrap();
        assert_eq!(
            json,
            r#"{"Hierarchy Depth":{"Average Node Depth":1.25,"Maximum Hierarchy Depth":2}}"#
        );
    }
}
