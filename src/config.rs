use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::service::ServiceSettings;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeolinkConfig {
    /// Path to the NDJSON snapshot materialization
    pub snapshot: Option<String>,
    /// Maximum child/sibling list length in a response
    pub max_related: Option<usize>,
    /// Result-cache expiry threshold in whole days
    pub cache_expiry_days: Option<u64>,
    /// Port for `geolink serve`
    pub port: Option<u16>,
}

impl GeolinkConfig {
    /// Fold config values over the built-in defaults
    pub fn settings(&self) -> ServiceSettings {
        let defaults = ServiceSettings::default();
        ServiceSettings {
            max_related: self.max_related.unwrap_or(defaults.max_related),
            cache_expiry_days: self.cache_expiry_days.unwrap_or(defaults.cache_expiry_days),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("geolink.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<GeolinkConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: GeolinkConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &GeolinkConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
