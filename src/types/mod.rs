pub mod error;
pub mod metric;

pub use error::{ErrorKind, Result, ResultExt, SceneMetricsError};
pub use metric::{MetricMap, MetricValue, SceneMetrics};
