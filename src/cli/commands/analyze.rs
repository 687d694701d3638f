//! Analyze Command
//!
//! Loads the selected scenes one at a time, runs the analyzer registry over
//! each and exports the combined table as CSV.
//!
//! Usage:
//!   scenemetrics analyze [SCENES..] [--root DIR] [--output FILE | --stdout | --no-export]
//!   scenemetrics components [SCENES..]

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::analyzer::SceneMetricsCollector;
use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, parse_toggles, resolve_scenes};
use crate::config::{Config, Toggle};
use crate::constants::export::COMPONENT_FILE_PREFIX;
use crate::export::{
    AggregateSummary, AggregatedTable, CsvExporter, ExportDestination, ExportOutcome,
    aggregate_scenes, export, suggested_file_name,
};
use crate::scene::load_scene;
use crate::types::Result;

#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    pub scenes: Vec<PathBuf>,
    pub root: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub stdout: bool,
    pub no_export: bool,
    pub prefix: Option<String>,
    pub only: Vec<String>,
    pub disable: Vec<String>,
}

/// Full analysis with every configured analyzer
pub fn run(ctx: CommandContext, options: AnalyzeOptions) -> Result<()> {
    let config = apply_overrides(ctx.config, &options)?;
    execute(&config, &options)
}

/// Component census preset: only the attachment type census runs
pub fn run_components(ctx: CommandContext, mut options: AnalyzeOptions) -> Result<()> {
    let mut config = ctx.config;
    config.analysis.toggles.only(&[Toggle::ComponentDistribution]);
    if options.prefix.is_none() {
        options.prefix = Some(COMPONENT_FILE_PREFIX.to_string());
    }
    options.only.clear();
    options.disable.clear();
    execute(&config, &options)
}

fn apply_overrides(mut config: Config, options: &AnalyzeOptions) -> Result<Config> {
    if !options.only.is_empty() {
        config.analysis.toggles.only(&parse_toggles(&options.only)?);
    }
    for toggle in parse_toggles(&options.disable)? {
        config.analysis.toggles.set(toggle, false);
    }
    if let Some(prefix) = &options.prefix {
        config.export.file_prefix = prefix.clone();
    }
    config.validate()?;
    Ok(config)
}

fn execute(config: &Config, options: &AnalyzeOptions) -> Result<()> {
    let out = Output::new().with_quiet(options.stdout);

    let scenes = resolve_scenes(&options.scenes, options.root.as_deref(), config)?;
    out.info(&format!("Analyzing {} scenes", scenes.len()));

    let collector = SceneMetricsCollector::default();
    let loaded = scenes
        .into_iter()
        .map(|(name, path)| (name, load_scene(&path)));
    let (table, summary) = aggregate_scenes(&collector, &config.analysis, loaded);

    print_summary(&out, &table, &summary);

    let prefix = options
        .prefix
        .as_deref()
        .unwrap_or(&config.export.file_prefix);
    let destination = destination(options, &config.export.output_dir, prefix);
    let exporter = CsvExporter::new(config.export.float_precision);

    match export(&table, &destination, &exporter)? {
        ExportOutcome::Written { path, rows } => {
            out.success(&format!("Exported {} rows to {}", rows, path.display()));
        }
        ExportOutcome::Printed { .. } => {}
        ExportOutcome::Cancelled => out.info("Export skipped"),
    }

    Ok(())
}

fn destination(options: &AnalyzeOptions, output_dir: &Path, prefix: &str) -> ExportDestination {
    if options.no_export {
        ExportDestination::Declined
    } else if options.stdout {
        ExportDestination::Stdout
    } else if let Some(path) = &options.output {
        ExportDestination::File(path.clone())
    } else {
        let today = Local::now().date_naive();
        ExportDestination::File(output_dir.join(suggested_file_name(prefix, today)))
    }
}

fn print_summary(out: &Output, table: &AggregatedTable, summary: &AggregateSummary) {
    out.section("Scenes");
    for name in table.scene_names() {
        let (categories, metrics) = table
            .scene(name)
            .map(|m| (m.len(), m.metric_count()))
            .unwrap_or((0, 0));
        out.detail(name, format!("{} categories, {} metrics", categories, metrics));
    }

    if summary.invalid > 0 {
        out.warning(&format!("{} invalid scenes exported as empty columns", summary.invalid));
    }
    if summary.failed > 0 {
        out.warning(&format!("{} scenes failed to load and were skipped", summary.failed));
    }
}
