use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How a source footprint is turned into covered area.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum CoveragePolicy {
    /// Source grown by the effect range, walls ignored
    #[serde(alias = "rpOcclusionAndBounds.Unoccluded")]
    Unoccluded,
    /// As `Unoccluded`, but only sources overlapping the space count
    #[serde(alias = "rpOcclusionAndBounds.UnoccludedWithinArea")]
    UnoccludedWithinArea,
    /// Area in line of sight of the source, within range
    #[default]
    #[serde(alias = "rpOcclusionAndBounds.OccludedWithinArea")]
    OccludedWithinArea,
    /// Effect bends around corners, losing the distance travelled
    #[serde(alias = "rpOcclusionAndBounds.DistanceOfTravel")]
    DistanceOfTravel,
}

impl CoveragePolicy {
    pub const ALL: [CoveragePolicy; 4] = [
        CoveragePolicy::Unoccluded,
        CoveragePolicy::UnoccludedWithinArea,
        CoveragePolicy::OccludedWithinArea,
        CoveragePolicy::DistanceOfTravel,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CoveragePolicy::Unoccluded => "unoccluded",
            CoveragePolicy::UnoccludedWithinArea => "unoccluded-within-area",
            CoveragePolicy::OccludedWithinArea => "occluded-within-area",
            CoveragePolicy::DistanceOfTravel => "distance-of-travel",
        }
    }

    /// Key of the "occlusion and bounds" rule parameter
    pub fn property_key(&self) -> &'static str {
        match self {
            CoveragePolicy::Unoccluded => "rpOcclusionAndBounds.Unoccluded",
            CoveragePolicy::UnoccludedWithinArea => "rpOcclusionAndBounds.UnoccludedWithinArea",
            CoveragePolicy::OccludedWithinArea => "rpOcclusionAndBounds.OccludedWithinArea",
            CoveragePolicy::DistanceOfTravel => "rpOcclusionAndBounds.DistanceOfTravel",
        }
    }

    pub fn from_property_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.property_key() == key)
    }
}

impl fmt::Display for CoveragePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CoveragePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(trimmed))
            .or_else(|| Self::from_property_key(trimmed))
            .ok_or_else(|| Error::UnknownPolicy(s.to_string()))
    }
}
