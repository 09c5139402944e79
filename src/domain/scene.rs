use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{EffectSource, Space};
use crate::coverage::CoveragePolicy;
use crate::error::{Error, Result};

/// Everything one evaluation needs: spaces, sources and rule parameters.
///
/// Rule parameters left out of the scene fall back to the command line or
/// config file values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub effect_range: Option<f64>,
    #[serde(default)]
    pub minimum_coverage: Option<f64>,
    #[serde(default)]
    pub policy: Option<CoveragePolicy>,
    #[serde(default)]
    pub spaces: Vec<Space>,
    #[serde(default)]
    pub sources: Vec<EffectSource>,
}

impl Scene {
    /// Load a scene, JSON for `.json` files and TOML otherwise.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<()> {
        for space in &self.spaces {
            space.validate()?;
        }
        for source in &self.sources {
            source.validate()?;
        }
        if let Some(range) = self.effect_range
            && (!range.is_finite() || range < 0.0)
        {
            return Err(Error::InvalidParameter {
                name: "effect_range",
                value: range,
            });
        }
        if let Some(minimum) = self.minimum_coverage
            && (!minimum.is_finite() || minimum < 0.0)
        {
            return Err(Error::InvalidParameter {
                name: "minimum_coverage",
                value: minimum,
            });
        }
        Ok(())
    }
}
