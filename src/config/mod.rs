use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::coverage::CoveragePolicy;
use crate::error::{Error, Result};
use crate::visibility::VisibilitySettings;

fn default_effect_range() -> f64 {
    5.0
}
fn default_minimum_coverage() -> f64 {
    0.8
}
fn default_policy() -> CoveragePolicy {
    CoveragePolicy::default()
}
fn default_required_ratio() -> f64 {
    0.0
}
fn default_verbose() -> bool {
    false
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    #[serde(default = "default_effect_range")]
    pub effect_range: f64,
    #[serde(default = "default_minimum_coverage")]
    pub minimum_coverage: f64,
    #[serde(default = "default_policy")]
    pub policy: CoveragePolicy,
    /// Property ratio check is off unless this is positive
    #[serde(default = "default_required_ratio")]
    pub required_ratio: f64,
    #[serde(default)]
    pub use_multipliers: bool,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    #[serde(default)]
    pub visibility: VisibilitySettings,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            effect_range: default_effect_range(),
            minimum_coverage: default_minimum_coverage(),
            policy: default_policy(),
            required_ratio: default_required_ratio(),
            use_multipliers: false,
            output: None,
            verbose: default_verbose(),
            visibility: VisibilitySettings::default(),
        }
    }
}

impl FileConfig {
    /// First parseable config file on the search path.
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        warn!("failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(toml::from_str(&contents)?)
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("covis.toml"));
    paths.push(PathBuf::from(".covis.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("covis").join("config.toml"));
        paths.push(config_dir.join("covis.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".covis.toml"));
        paths.push(home.join(".config").join("covis").join("config.toml"));
    }

    paths
}
