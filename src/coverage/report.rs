use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use super::check::CoverageOutcome;
use super::policy::CoveragePolicy;
use super::property_ratio::PropertyRatioFinding;
use crate::domain::{EffectSource, Space};
use crate::error::{Error, Result};
use crate::geometry::Area;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonRings {
    pub outer: Vec<(f64, f64)>,
    pub holes: Vec<Vec<(f64, f64)>>,
}

pub fn polygon_rings(area: &Area) -> Vec<PolygonRings> {
    area.to_rings()
        .into_iter()
        .map(|(outer, holes)| PolygonRings { outer, holes })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct SpaceReport {
    pub name: String,
    pub sources: Vec<String>,
    pub ratio: f64,
    pub minimum_coverage: f64,
    pub violation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub coverage_area: f64,
    pub coverage: Vec<PolygonRings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_ratio: Option<PropertyRatioFinding>,
}

impl SpaceReport {
    pub fn new(
        space: &Space,
        sources: &[&EffectSource],
        outcome: &CoverageOutcome,
        minimum_coverage: f64,
    ) -> Self {
        Self {
            name: space.name.clone(),
            sources: sources.iter().map(|s| s.name.clone()).collect(),
            ratio: outcome.coverage.ratio,
            minimum_coverage,
            violation: outcome.is_violation(),
            summary: outcome.violation.as_ref().map(|v| v.summary()),
            coverage_area: outcome.coverage.size,
            coverage: polygon_rings(&outcome.coverage.area),
            property_ratio: None,
        }
    }

    pub fn with_property_ratio(mut self, finding: Option<PropertyRatioFinding>) -> Self {
        self.property_ratio = finding;
        self
    }
}

/// Results for a whole scene
#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub policy: CoveragePolicy,
    pub effect_range: f64,
    pub minimum_coverage: f64,
    pub spaces: Vec<SpaceReport>,
}

impl CoverageReport {
    pub fn violation_count(&self) -> usize {
        self.spaces.iter().filter(|s| s.violation).count()
    }
}

/// Write the report as pretty-printed JSON
pub fn write_report(path: &Path, report: &CoverageReport) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n").map_err(|e| Error::io(path, e))?;
    writer.flush().map_err(|e| Error::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::CoverageCheck;
    use std::fs;
    use tempfile::tempdir;

    fn sample_report() -> CoverageReport {
        let space = Space::new(
            "room",
            vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)],
        );
        let lamp = EffectSource::rectangle("lamp", (1.0, 1.0), (2.0, 2.0));
        let check = CoverageCheck::new(CoveragePolicy::Unoccluded, 0.5, 0.9).unwrap();
        let outcome = check.check(&space, &[&lamp]);
        CoverageReport {
            policy: check.policy(),
            effect_range: check.effect_range(),
            minimum_coverage: check.minimum_coverage(),
            spaces: vec![SpaceReport::new(&space, &[&lamp], &outcome, 0.9)],
        }
    }

    #[test]
    fn test_write_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");

        let report = sample_report();
        assert_eq!(report.violation_count(), 1);
        write_report(&path, &report).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["policy"], "unoccluded");
        assert_eq!(value["spaces"][0]["name"], "room");
        assert_eq!(value["spaces"][0]["violation"], true);
        assert!(value["spaces"][0]["summary"].is_string());
        assert!(value["spaces"][0].get("property_ratio").is_none());
        assert_eq!(value["spaces"][0]["coverage"].as_array().map(|a| a.len()), Some(1));
    }

    #[test]
    fn test_write_report_to_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("report.json");
        assert!(matches!(write_report(&path, &sample_report()), Err(Error::Io { .. })));
    }
}
