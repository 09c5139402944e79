use tracing::{debug, warn};

use super::policy::CoveragePolicy;
use crate::domain::{EffectSource, Space};
use crate::error::{Error, Result};
use crate::geometry::{Area, union_all};
use crate::visibility::{
    DistanceOfTravelEffectCalculator, VisibilityPolygonCalculator, VisibilitySettings,
};

/// Covered part of a region and its share of the region's size.
#[derive(Debug, Clone)]
pub struct Coverage {
    pub area: Area,
    pub size: f64,
    pub region_size: f64,
    pub ratio: f64,
}

/// A space that is not covered enough by its sources.
#[derive(Debug, Clone)]
pub struct CoverageViolation {
    pub space: String,
    pub sources: Vec<String>,
    pub coverage: Area,
    pub coverage_area: f64,
    pub ratio: f64,
    pub minimum_coverage: f64,
}

impl CoverageViolation {
    /// One-line description with percentages floored to two decimals.
    pub fn summary(&self) -> String {
        format!(
            "{}: coverage {}% (required {}%) from {}",
            self.space,
            floor_percent(self.ratio),
            floor_percent(self.minimum_coverage),
            if self.sources.is_empty() {
                "no sources".to_string()
            } else {
                self.sources.join(", ")
            }
        )
    }
}

/// `ratio` as a percentage floored to two decimals, without trailing zeros.
pub fn floor_percent(ratio: f64) -> String {
    let hundredths = (ratio * 10_000.0 + 1e-9).floor();
    format!("{}", hundredths / 100.0)
}

#[derive(Debug, Clone)]
pub struct CoverageOutcome {
    pub coverage: Coverage,
    pub violation: Option<CoverageViolation>,
}

impl CoverageOutcome {
    pub fn is_violation(&self) -> bool {
        self.violation.is_some()
    }
}

/// Compares the area covered by a set of sources against a minimum share.
#[derive(Debug, Clone)]
pub struct CoverageCheck {
    policy: CoveragePolicy,
    effect_range: f64,
    minimum_coverage: f64,
    settings: VisibilitySettings,
}

impl CoverageCheck {
    pub fn new(policy: CoveragePolicy, effect_range: f64, minimum_coverage: f64) -> Result<Self> {
        if !effect_range.is_finite() || effect_range < 0.0 {
            return Err(Error::InvalidParameter {
                name: "effect_range",
                value: effect_range,
            });
        }
        if !minimum_coverage.is_finite() || minimum_coverage < 0.0 {
            return Err(Error::InvalidParameter {
                name: "minimum_coverage",
                value: minimum_coverage,
            });
        }
        Ok(Self {
            policy,
            effect_range,
            minimum_coverage,
            settings: VisibilitySettings::default(),
        })
    }

    pub fn with_settings(mut self, settings: VisibilitySettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn policy(&self) -> CoveragePolicy {
        self.policy
    }

    pub fn effect_range(&self) -> f64 {
        self.effect_range
    }

    pub fn minimum_coverage(&self) -> f64 {
        self.minimum_coverage
    }

    /// Area one source covers inside `region` under the configured policy.
    pub fn contribution(&self, region: &Area, source: &Area) -> Area {
        let range = self.effect_range;
        match self.policy {
            CoveragePolicy::Unoccluded | CoveragePolicy::UnoccludedWithinArea => {
                source.buffer(range, self.settings.buffer_segments)
            }
            CoveragePolicy::OccludedWithinArea => {
                let mut calculator =
                    VisibilityPolygonCalculator::from_area_and_source(region, source, &self.settings);
                calculator
                    .effect_source_polygon()
                    .intersection(&source.buffer(range, self.settings.buffer_segments))
            }
            CoveragePolicy::DistanceOfTravel => {
                let mut effect = DistanceOfTravelEffectCalculator::from_area_and_source_and_effect_range(
                    region,
                    source,
                    range,
                    &self.settings,
                );
                let resized = effect.calculator().geometry().possibly_resized_source().clone();
                effect.effect_area().union(&resized).intersection(region)
            }
        }
    }

    /// Union of all contributions clipped to `region`.
    pub fn coverage(&self, region: &Area, sources: &[Area]) -> Coverage {
        let region_size = region.size();
        if region.is_empty() {
            warn!("region has no area, coverage is empty");
            return Coverage {
                area: Area::empty(),
                size: 0.0,
                region_size,
                ratio: 0.0,
            };
        }

        let contributing: Vec<&Area> = match self.policy {
            CoveragePolicy::UnoccludedWithinArea => sources
                .iter()
                .filter(|s| !s.intersection(region).is_empty())
                .collect(),
            _ => sources.iter().collect(),
        };

        let parts = contributing
            .iter()
            .map(|s| {
                let part = self.contribution(region, s);
                debug!(policy = %self.policy, size = part.size(), "source contribution");
                part
            })
            .collect();
        let area = union_all(parts).intersection(region);
        let size = area.size();
        Coverage {
            area,
            size,
            region_size,
            ratio: size / region_size,
        }
    }

    /// Evaluate `space` against `sources`, reporting a violation when the
    /// covered share falls below the minimum.
    pub fn check(&self, space: &Space, sources: &[&EffectSource]) -> CoverageOutcome {
        let footprints: Vec<Area> = sources.iter().map(|s| s.area()).collect();
        let coverage = self.coverage(&space.area(), &footprints);
        debug!(
            space = %space.name,
            sources = sources.len(),
            ratio = coverage.ratio,
            "coverage evaluated"
        );

        let violation = (coverage.ratio < self.minimum_coverage).then(|| CoverageViolation {
            space: space.name.clone(),
            sources: sources.iter().map(|s| s.name.clone()).collect(),
            coverage: coverage.area.clone(),
            coverage_area: coverage.size,
            ratio: coverage.ratio,
            minimum_coverage: self.minimum_coverage,
        });
        CoverageOutcome {
            coverage,
            violation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> Space {
        Space::new(
            "room",
            vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
        )
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            CoverageCheck::new(CoveragePolicy::Unoccluded, -1.0, 0.5),
            Err(Error::InvalidParameter { name: "effect_range", .. })
        ));
        assert!(CoverageCheck::new(CoveragePolicy::Unoccluded, f64::INFINITY, 0.5).is_err());
        assert!(CoverageCheck::new(CoveragePolicy::Unoccluded, 1.0, -0.1).is_err());
    }

    #[test]
    fn test_unoccluded_counts_outside_sources() {
        let outside = EffectSource::rectangle("outside", (11.0, 4.0), (12.0, 6.0));
        let open = CoverageCheck::new(CoveragePolicy::Unoccluded, 3.0, 0.0).unwrap();
        let within = CoverageCheck::new(CoveragePolicy::UnoccludedWithinArea, 3.0, 0.0).unwrap();

        let open_ratio = open.check(&room(), &[&outside]).coverage.ratio;
        let within_ratio = within.check(&room(), &[&outside]).coverage.ratio;
        assert!(open_ratio > 0.1);
        assert_eq!(within_ratio, 0.0);
    }

    #[test]
    fn test_violation_below_threshold() {
        let lamp = EffectSource::rectangle("lamp", (4.0, 4.0), (6.0, 6.0));
        let check = CoverageCheck::new(CoveragePolicy::Unoccluded, 1.0, 0.5).unwrap();
        let outcome = check.check(&room(), &[&lamp]);
        assert!(outcome.is_violation());
        let violation = outcome.violation.unwrap();
        assert_eq!(violation.sources, vec!["lamp".to_string()]);
        assert!(violation.ratio < 0.5);
    }

    #[test]
    fn test_zero_area_region_is_empty() {
        let flat = Space::new("flat", vec![(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]);
        let lamp = EffectSource::rectangle("lamp", (4.0, -1.0), (6.0, 1.0));
        let check = CoverageCheck::new(CoveragePolicy::DistanceOfTravel, 5.0, 0.1).unwrap();
        let outcome = check.check(&flat, &[&lamp]);
        assert_eq!(outcome.coverage.ratio, 0.0);
        assert!(outcome.is_violation());
    }

    #[test]
    fn test_summary_floors_percentages() {
        let violation = CoverageViolation {
            space: "hall".into(),
            sources: vec!["a".into(), "b".into()],
            coverage: Area::empty(),
            coverage_area: 0.0,
            ratio: 0.123_456,
            minimum_coverage: 0.5,
        };
        assert_eq!(violation.summary(), "hall: coverage 12.34% (required 50%) from a, b");
        assert_eq!(floor_percent(0.29), "29");
        assert_eq!(floor_percent(0.999_99), "99.99");
    }
}
