//! Ratio of the sources' effect property values to the space's area value.
//!
//! Runs independently of the geometric check and only when a positive
//! required ratio is configured.

use serde::Serialize;

use super::check::floor_percent;
use crate::domain::{EffectSource, Space};

/// What went wrong with the property values of a space and its sources.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyRatioIssue {
    /// The space has no (or a zero) area value
    MissingSpaceValue,
    /// No sources were found for the space
    MissingSources,
    /// Every source lacks a value or multiplier
    AllSourcesMissingValues,
    /// Ratio below the requirement, and some sources lack values
    RatioTooSmallWithMissingValues,
    RatioTooSmall,
    /// Ratio fine, but some sources lack values
    MissingSourceValues,
}

/// Contribution of one source, `None` when a needed value is missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceShare {
    pub name: String,
    pub share: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyRatioFinding {
    pub space: String,
    pub issue: PropertyRatioIssue,
    /// Total source value over the space value, when a space value exists
    pub ratio: Option<f64>,
    pub required_ratio: f64,
    pub sources: Vec<SourceShare>,
}

impl PropertyRatioFinding {
    pub fn summary(&self) -> String {
        let detail = match self.issue {
            PropertyRatioIssue::MissingSpaceValue => "space is missing its area value".to_string(),
            PropertyRatioIssue::MissingSources => "no effect sources found".to_string(),
            PropertyRatioIssue::AllSourcesMissingValues => {
                "every effect source is missing property values".to_string()
            }
            PropertyRatioIssue::RatioTooSmallWithMissingValues
            | PropertyRatioIssue::RatioTooSmall
            | PropertyRatioIssue::MissingSourceValues => format!(
                "property ratio {}% (required {}%)",
                floor_percent(self.ratio.unwrap_or(0.0)),
                floor_percent(self.required_ratio)
            ),
        };
        let missing: Vec<&str> = self
            .sources
            .iter()
            .filter(|s| s.share.is_none())
            .map(|s| s.name.as_str())
            .collect();
        if missing.is_empty() {
            format!("{}: {}", self.space, detail)
        } else {
            format!("{}: {}; missing values: {}", self.space, detail, missing.join(", "))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyRatioCheck {
    required_ratio: f64,
    use_multipliers: bool,
}

impl PropertyRatioCheck {
    pub fn new(required_ratio: f64) -> Self {
        Self {
            required_ratio,
            use_multipliers: false,
        }
    }

    /// Require and apply every source's multiplier.
    pub fn with_multipliers(mut self, use_multipliers: bool) -> Self {
        self.use_multipliers = use_multipliers;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.required_ratio > 0.0
    }

    fn share_value(&self, source: &EffectSource) -> Option<f64> {
        let value = source.effect_value.filter(|v| *v != 0.0)?;
        if self.use_multipliers {
            let multiplier = source.multiplier.filter(|m| *m != 0.0)?;
            Some(value * multiplier)
        } else {
            Some(value)
        }
    }

    pub fn check(&self, space: &Space, sources: &[&EffectSource]) -> Option<PropertyRatioFinding> {
        if !self.is_enabled() {
            return None;
        }
        let finding = |issue: PropertyRatioIssue, ratio: Option<f64>, shares: Vec<SourceShare>| PropertyRatioFinding {
            space: space.name.clone(),
            issue,
            ratio,
            required_ratio: self.required_ratio,
            sources: shares,
        };

        let space_value = space.area_value.unwrap_or(0.0);
        if space_value == 0.0 {
            return Some(finding(PropertyRatioIssue::MissingSpaceValue, None, Vec::new()));
        }

        let shares: Vec<SourceShare> = sources
            .iter()
            .map(|s| SourceShare {
                name: s.name.clone(),
                share: self.share_value(s).map(|v| v / space_value),
            })
            .collect();
        let total: f64 = sources.iter().filter_map(|s| self.share_value(s)).sum();
        let ratio = total / space_value;
        let too_small = ratio < self.required_ratio;
        let has_missing = shares.iter().any(|s| s.share.is_none());
        let has_complete = shares.iter().any(|s| s.share.is_some());

        let issue = match (has_missing, has_complete, too_small) {
            (false, false, _) => PropertyRatioIssue::MissingSources,
            (true, false, _) => PropertyRatioIssue::AllSourcesMissingValues,
            (true, true, true) => PropertyRatioIssue::RatioTooSmallWithMissingValues,
            (false, true, true) => PropertyRatioIssue::RatioTooSmall,
            (true, true, false) => PropertyRatioIssue::MissingSourceValues,
            (false, true, false) => return None,
        };
        Some(finding(issue, Some(ratio), shares))
    }
}
