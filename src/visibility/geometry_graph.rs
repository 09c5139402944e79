//! Boundary graph of a space footprint with the effect source cut out of it.
//!
//! Rings follow the clockwise-outer / counter-clockwise-hole convention, so
//! every vertex has the free space on the right of its outgoing edge. The
//! source boundary is added as an extra hole whose vertices are the
//! "source vertices" effect is emitted from.

use std::collections::HashSet;

use geo::LineString;
use tracing::{debug, warn};

use super::graph::{DirectedGraph, Edge};
use super::settings::VisibilitySettings;
use crate::geometry::{Area, Point, sample_segment};

/// Offset of the free-side test point from a source edge.
const FREE_SIDE_STEP: f64 = 1e-4;

#[derive(Debug, Clone)]
pub struct EffectGeometryGraph {
    graph: DirectedGraph<Point>,
    source_vertices: Vec<Point>,
    source_set: HashSet<Point>,
    possibly_resized_source: Area,
}

impl EffectGeometryGraph {
    fn empty() -> Self {
        Self {
            graph: DirectedGraph::new(),
            source_vertices: Vec::new(),
            source_set: HashSet::new(),
            possibly_resized_source: Area::empty(),
        }
    }

    /// Build the graph for `region` with the footprint `source` cut out.
    ///
    /// A source modelled right next to the region (touching but not
    /// overlapping) is grown by a tenth of its side length before clipping.
    pub fn from_area_and_source(region: &Area, source: &Area, settings: &VisibilitySettings) -> Self {
        let region_minus_source = region.difference(source);
        let mut clipped = source.intersection(region);

        if clipped.is_empty() && !source.is_empty() {
            let margin = source.size().sqrt() / 10.0;
            debug!(margin, "source does not overlap region, growing it");
            clipped = source
                .buffer(margin, settings.buffer_segments)
                .intersection(region);
        }

        let mut graph = Self::empty();
        graph.possibly_resized_source = clipped.clone();

        for polygon in region_minus_source.clockwise_polygons() {
            graph.add_ring(polygon.exterior(), settings.snap_grid);
            for hole in polygon.interiors() {
                graph.add_ring(hole, settings.snap_grid);
            }
        }

        // Clockwise source outline, densified and reversed into a hole
        for polygon in clipped.clockwise_polygons() {
            let corners = ring_vertices(polygon.exterior(), settings.snap_grid);
            let mut ring = densify(&corners, settings.source_samples, settings.snap_grid);
            ring.reverse();
            graph.add_source_ring(&ring, &region_minus_source);
        }

        if graph.source_vertices.is_empty() {
            warn!("source could not be clipped against the region; no source vertices");
        }
        debug!(
            vertices = graph.graph.vertex_count(),
            edges = graph.graph.edge_count(),
            source_vertices = graph.source_vertices.len(),
            "built effect geometry graph"
        );
        graph
    }

    /// Build the graph for `region` with a single point-like source at `location`.
    pub fn from_area_and_location(
        region: &Area,
        location: (f64, f64),
        settings: &VisibilitySettings,
    ) -> Self {
        let mut graph = Self::empty();
        for polygon in region.clockwise_polygons() {
            graph.add_ring(polygon.exterior(), settings.snap_grid);
            for hole in polygon.interiors() {
                graph.add_ring(hole, settings.snap_grid);
            }
        }
        let source = Point::snapped(location.0, location.1, settings.snap_grid);
        graph.graph.add_vertex(source);
        graph.mark_source(source);
        graph
    }

    fn mark_source(&mut self, vertex: Point) {
        if self.source_set.insert(vertex) {
            self.source_vertices.push(vertex);
        }
    }

    /// Add every edge of a closed ring, following its own winding.
    fn add_ring(&mut self, ring: &LineString<f64>, grid: f64) {
        for line in ring.lines() {
            let start = Point::from_coord(line.start, grid);
            let end = Point::from_coord(line.end, grid);
            if start != end {
                self.graph.add_unweighted_edge(start, end);
            }
        }
    }

    /// Add the sampled source outline as a closed cycle.
    ///
    /// Only edges with free space on their right are kept, so stretches of
    /// the outline flush against a wall or a hole add nothing. A sample left
    /// without any kept edge is not a source vertex and never enters the graph.
    fn add_source_ring(&mut self, ring: &[Point], free_space: &Area) {
        let n = ring.len();
        if n < 2 {
            return;
        }
        let open: Vec<bool> = (0..n)
            .map(|i| faces_free_space(&ring[i], &ring[(i + 1) % n], free_space))
            .collect();

        for (i, &start) in ring.iter().enumerate() {
            let end = ring[(i + 1) % n];
            if open[i] && start != end {
                self.graph.add_unweighted_edge(start, end);
            }
        }
        for (i, &vertex) in ring.iter().enumerate() {
            if open[i] || open[(i + n - 1) % n] {
                self.mark_source(vertex);
            }
        }

        let closed = open.iter().filter(|&&o| !o).count();
        if closed > 0 {
            debug!(closed, "source edges against walls dropped");
        }
    }

    pub fn graph(&self) -> &DirectedGraph<Point> {
        &self.graph
    }

    /// Source vertices in ring order.
    pub fn source_vertices(&self) -> &[Point] {
        &self.source_vertices
    }

    pub fn is_source_vertex(&self, vertex: &Point) -> bool {
        self.source_set.contains(vertex)
    }

    /// The clipped source footprint, grown first if it had to be.
    pub fn possibly_resized_source(&self) -> &Area {
        &self.possibly_resized_source
    }

    pub fn has_edge(&self, source: &Point, destination: &Point) -> bool {
        self.graph.has_edge(source, destination)
    }

    /// First boundary edge leaving `vertex`.
    pub fn outgoing_edge(&self, vertex: &Point) -> Option<&Edge<Point>> {
        self.graph.edges_from(vertex).next()
    }

    /// First boundary edge entering `vertex`.
    pub fn incoming_edge(&self, vertex: &Point) -> Option<&Edge<Point>> {
        self.graph.edges_to(vertex).next()
    }
}

/// Distinct ring vertices, without the closing repeat.
fn ring_vertices(ring: &LineString<f64>, grid: f64) -> Vec<Point> {
    let mut points: Vec<Point> = ring
        .coords()
        .map(|c| Point::from_coord(*c, grid))
        .collect();
    points.dedup();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

/// Whether a point just right of the midpoint of `start -> end` is free space.
fn faces_free_space(start: &Point, end: &Point, free_space: &Area) -> bool {
    let (dx, dy) = start.to(end);
    let length = dx.hypot(dy);
    if length <= 0.0 {
        return false;
    }
    let step = FREE_SIDE_STEP.min(length / 4.0);
    let (mx, my) = start.lerp(end, 0.5);
    free_space.contains_point(mx + dy / length * step, my - dx / length * step)
}

/// Insert `samples` evenly spaced points on every edge of the closed ring.
fn densify(corners: &[Point], samples: usize, grid: f64) -> Vec<Point> {
    let mut ring = Vec::with_capacity(corners.len() * (samples + 1));
    for (i, corner) in corners.iter().enumerate() {
        let next = &corners[(i + 1) % corners.len()];
        ring.push(*corner);
        ring.extend(sample_segment(corner, next, samples, grid));
    }
    ring.dedup();
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}
