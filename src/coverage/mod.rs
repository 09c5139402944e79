//! Coverage rules built on the visibility machinery.

pub mod check;
pub mod nearby;
pub mod policy;
pub mod property_ratio;
pub mod report;

pub use check::{Coverage, CoverageCheck, CoverageOutcome, CoverageViolation};
pub use nearby::nearby_sources;
pub use policy::CoveragePolicy;
pub use property_ratio::{PropertyRatioCheck, PropertyRatioFinding, PropertyRatioIssue, SourceShare};
pub use report::{CoverageReport, SpaceReport, write_report};
