//! Occlusion-aware reach of an effect source inside a space.
//!
//! The pipeline runs boundary graph → line-of-sight graph → per-vertex
//! visibility polygons, with an optional travel-distance search on top.

mod geometry_graph;
mod graph;
mod polygon;
mod settings;
mod travel;
mod visibility_graph;

pub use geometry_graph::EffectGeometryGraph;
pub use graph::{DirectedGraph, Edge};
pub use polygon::VisibilityPolygonCalculator;
pub use settings::VisibilitySettings;
pub use travel::DistanceOfTravelEffectCalculator;
pub use visibility_graph::{VisibilityGraph, is_valid_direction, is_visible};
