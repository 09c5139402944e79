use serde::{Deserialize, Serialize};

use super::space::validate_ring;
use crate::error::Result;
use crate::geometry::{Area, Bounds};

/// A footprint an effect (light, sound, signal) is emitted from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSource {
    pub name: String,
    pub outer: Vec<(f64, f64)>,
    #[serde(default)]
    pub holes: Vec<Vec<(f64, f64)>>,
    /// Effect property value used by the property ratio check
    #[serde(default)]
    pub effect_value: Option<f64>,
    #[serde(default)]
    pub multiplier: Option<f64>,
}

impl EffectSource {
    pub fn new(name: impl Into<String>, outer: Vec<(f64, f64)>) -> Self {
        Self {
            name: name.into(),
            outer,
            holes: Vec::new(),
            effect_value: None,
            multiplier: None,
        }
    }

    /// Axis-aligned rectangular footprint
    pub fn rectangle(name: impl Into<String>, min: (f64, f64), max: (f64, f64)) -> Self {
        Self::new(
            name,
            vec![(min.0, min.1), (max.0, min.1), (max.0, max.1), (min.0, max.1)],
        )
    }

    pub fn with_effect_value(mut self, value: f64) -> Self {
        self.effect_value = Some(value);
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_ring(&self.name, &self.outer)?;
        for hole in &self.holes {
            validate_ring(&self.name, hole)?;
        }
        Ok(())
    }

    pub fn area(&self) -> Area {
        Area::from_rings(&self.outer, &self.holes)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.outer)
    }
}
