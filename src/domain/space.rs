use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{Area, Bounds};

/// A named region whose coverage is evaluated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub name: String,
    pub outer: Vec<(f64, f64)>,
    #[serde(default)]
    pub holes: Vec<Vec<(f64, f64)>>,
    /// Area property value used by the property ratio check
    #[serde(default)]
    pub area_value: Option<f64>,
}

impl Space {
    pub fn new(name: impl Into<String>, outer: Vec<(f64, f64)>) -> Self {
        Self {
            name: name.into(),
            outer,
            holes: Vec::new(),
            area_value: None,
        }
    }

    pub fn with_holes(mut self, holes: Vec<Vec<(f64, f64)>>) -> Self {
        self.holes = holes;
        self
    }

    pub fn with_area_value(mut self, value: f64) -> Self {
        self.area_value = Some(value);
        self
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
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

/// A ring needs at least three distinct finite points.
pub(crate) fn validate_ring(name: &str, ring: &[(f64, f64)]) -> Result<()> {
    if let Some(&(x, y)) = ring.iter().find(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return Err(Error::InvalidRing {
            name: name.to_string(),
            reason: format!("non-finite coordinate ({}, {})", x, y),
        });
    }
    let mut distinct: Vec<(f64, f64)> = Vec::with_capacity(ring.len());
    for point in ring {
        if !distinct.contains(point) {
            distinct.push(*point);
        }
    }
    if distinct.len() < 3 {
        return Err(Error::InvalidRing {
            name: name.to_string(),
            reason: format!("{} distinct points, need at least 3", distinct.len()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<(f64, f64)> {
        vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]
    }

    #[test]
    fn test_space_area_with_hole() {
        let space = Space::new("hall", square())
            .with_holes(vec![vec![(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0)]]);
        assert!(space.is_valid());
        assert!((space.area().size() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_closed_ring_with_repeat_is_valid() {
        let mut ring = square();
        ring.push((0.0, 0.0));
        assert!(validate_ring("a", &ring).is_ok());
    }

    #[test]
    fn test_degenerate_ring_rejected() {
        let space = Space::new("line", vec![(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]);
        assert!(matches!(space.validate(), Err(Error::InvalidRing { .. })));
    }

    #[test]
    fn test_non_finite_ring_rejected() {
        let space = Space::new("nan", vec![(0.0, 0.0), (f64::NAN, 0.0), (0.0, 1.0)]);
        assert!(!space.is_valid());
    }
}
