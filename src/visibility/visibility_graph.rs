//! Line-of-sight graph between the vertices of an [`EffectGeometryGraph`].

use std::f64::consts::TAU;

use geo::Line;
use geo::algorithm::line_intersection::{LineIntersection, line_intersection};
use tracing::debug;

use super::geometry_graph::EffectGeometryGraph;
use super::graph::{DirectedGraph, Edge};
use super::settings::VisibilitySettings;
use crate::geometry::{Point, clockwise_angle};

/// `a -> b` is an edge when `b` can be seen from `a`, weighted by their
/// distance. Edges need not be symmetric: whether a direction is open
/// depends on the boundary winding at the start vertex.
#[derive(Debug, Clone)]
pub struct VisibilityGraph {
    graph: DirectedGraph<Point>,
}

impl VisibilityGraph {
    /// Brute force over all ordered vertex pairs.
    pub fn from_geometry(geometry: &EffectGeometryGraph, settings: &VisibilitySettings) -> Self {
        let mut graph = DirectedGraph::new();
        let vertices: Vec<Point> = geometry.graph().vertices().copied().collect();
        for vertex in &vertices {
            graph.add_vertex(*vertex);
        }

        for src in &vertices {
            for dst in &vertices {
                if src != dst
                    && is_valid_direction(geometry, src, dst)
                    && is_visible(geometry, src, dst, settings.crossing_tolerance)
                {
                    graph.add_edge(*src, *dst, src.distance(dst));
                }
            }
        }

        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "built visibility graph"
        );
        Self { graph }
    }

    pub fn graph(&self) -> &DirectedGraph<Point> {
        &self.graph
    }

    pub fn has_edge(&self, source: &Point, destination: &Point) -> bool {
        self.graph.has_edge(source, destination)
    }

    pub fn edges_from<'a>(&'a self, vertex: &Point) -> impl Iterator<Item = &'a Edge<Point>> + use<'a> {
        self.graph.edges_from(vertex)
    }

    /// Vertices visible from `vertex`.
    pub fn visible_from(&self, vertex: &Point) -> Vec<Point> {
        self.graph.edges_from(vertex).map(|e| e.destination).collect()
    }
}

/// Whether the ray `src -> dst` leaves `src` into free space.
///
/// Outer rings run clockwise and holes counter-clockwise, so the free side
/// lies between the outgoing boundary edge and the reversed incoming one,
/// sweeping clockwise. A vertex missing either edge sees in all directions.
pub fn is_valid_direction(geometry: &EffectGeometryGraph, src: &Point, dst: &Point) -> bool {
    let (Some(outgoing), Some(incoming)) = (geometry.outgoing_edge(src), geometry.incoming_edge(src))
    else {
        return true;
    };

    let src_angle = clockwise_angle(outgoing.source.to(&outgoing.destination));
    let limit = relative(clockwise_angle(incoming.destination.to(&incoming.source)), src_angle);
    let dir = relative(clockwise_angle(src.to(dst)), src_angle);
    dir <= limit
}

fn relative(angle: f64, origin: f64) -> f64 {
    let diff = angle - origin;
    if diff < 0.0 { diff + TAU } else { diff }
}

/// Whether the segment `src -> dst` crosses no boundary edge.
///
/// Edges touching either endpoint are ignored, as are crossings within
/// `tolerance` of any segment endpoint.
pub fn is_visible(geometry: &EffectGeometryGraph, src: &Point, dst: &Point, tolerance: f64) -> bool {
    let sight = Line::new(src.coord(), dst.coord());
    !geometry
        .graph()
        .edges()
        .iter()
        .filter(|e| !e.touches(src) && !e.touches(dst))
        .any(|e| {
            let boundary = Line::new(e.source.coord(), e.destination.coord());
            crosses(sight, boundary, tolerance)
        })
}

/// Proper crossing of two segments away from all four endpoints.
pub(crate) fn crosses(a: Line<f64>, b: Line<f64>, tolerance: f64) -> bool {
    match line_intersection(a, b) {
        Some(LineIntersection::SinglePoint {
            intersection,
            is_proper: true,
        }) => {
            let at = Point::new(intersection.x, intersection.y);
            [a.start, a.end, b.start, b.end]
                .iter()
                .all(|c| at.distance(&Point::new(c.x, c.y)) > tolerance)
        }
        _ => false,
    }
}
