//! Toggles Command
//!
//! Lists every analyzer toggle with its effective state.

use console::style;

use crate::config::{Config, Toggle};
use crate::types::Result;

pub fn run(config: &Config, format: &str) -> Result<()> {
    let toggles = &config.analysis.toggles;

    if format == "json" {
        let states: serde_json::Map<String, serde_json::Value> = Toggle::ALL
            .iter()
            .map(|t| (t.name().to_string(), serde_json::Value::Bool(toggles.get(*t))))
            .collect();
        println!("{}", serde_json::to_string_pretty(&states)?);
        return Ok(());
    }

    for toggle in Toggle::ALL {
        let state = if toggles.get(*toggle) {
            style("on").green()
        } else {
            style("off").dim()
        };
        println!("  {:<24} {}", toggle.name(), state);
    }
    println!();
    println!(
        "{} of {} enabled",
        toggles.enabled().count(),
        Toggle::ALL.len()
    );
    Ok(())
}
