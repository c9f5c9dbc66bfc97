use crate::config::{Config, GeneralConfig};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::debug;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

#[derive(Deserialize)]
struct GeneralSection {
    #[serde(default)]
    general: GeneralConfig,
}

/// Read only `general.log_level` from a scenario file, so logging can be set
/// up before the full load. Any read or parse failure yields `None`; the real
/// load reports it.
pub fn peek_log_level(config_path: &Path) -> Option<String> {
    let file = File::open(config_path).ok()?;
    let section: GeneralSection = serde_yaml::from_reader(file).ok()?;
    section.general.log_level
}

/// Load, parse and validate a scenario from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    debug!("Loading scenario from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open scenario file '{}'", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse scenario file '{}'", config_path.display()))?;

    config.validate()?;

    debug!(
        "Scenario defines {} networks and {} steps",
        config.networks.len(),
        config.steps.len()
    );
    Ok(config)
}

/// Parse and validate a scenario from YAML text
pub fn parse_config(yaml: &str) -> Result<Config> {
    let config: Config = serde_yaml::from_str(yaml).wrap_err("Failed to parse scenario")?;
    config.validate()?;
    Ok(config)
}
