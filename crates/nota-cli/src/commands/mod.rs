//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod extract;

use std::path::Path;

use nota_core::NotaConfig;

/// Load the configuration file if given, then apply environment overrides.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<NotaConfig> {
    let mut config = match config_path {
        Some(path) => NotaConfig::from_file(Path::new(path))?,
        None => {
            let default_path = config::default_config_path();
            if default_path.exists() {
                NotaConfig::from_file(&default_path)?
            } else {
                NotaConfig::default()
            }
        }
    };
    config.ocr = config.ocr.with_env_overrides();
    Ok(config)
}
