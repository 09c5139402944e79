//! Visibility polygons by angular sweep over a vertex's visible neighbours.

use std::collections::HashMap;

use geo::Coord;
use tracing::{debug, trace};

use super::geometry_graph::EffectGeometryGraph;
use super::settings::VisibilitySettings;
use super::visibility_graph::VisibilityGraph;
use crate::geometry::{Area, Point, Triangle, clockwise_angle, union_all};

/// Triangles smaller than this are dropped before the union.
const MIN_TRIANGLE: f64 = 1e-12;

/// Computes and memoizes the visibility polygon of every graph vertex.
#[derive(Debug, Clone)]
pub struct VisibilityPolygonCalculator {
    geometry: EffectGeometryGraph,
    visibility: VisibilityGraph,
    region: Area,
    has_source: bool,
    settings: VisibilitySettings,
    cache: HashMap<Point, Area>,
}

impl VisibilityPolygonCalculator {
    pub fn from_area_and_source(region: &Area, source: &Area, settings: &VisibilitySettings) -> Self {
        let geometry = EffectGeometryGraph::from_area_and_source(region, source, settings);
        Self::new(geometry, region, true, settings)
    }

    pub fn from_area_and_location(
        region: &Area,
        location: (f64, f64),
        settings: &VisibilitySettings,
    ) -> Self {
        let geometry = EffectGeometryGraph::from_area_and_location(region, location, settings);
        Self::new(geometry, region, false, settings)
    }

    fn new(
        geometry: EffectGeometryGraph,
        region: &Area,
        has_source: bool,
        settings: &VisibilitySettings,
    ) -> Self {
        let visibility = VisibilityGraph::from_geometry(&geometry, settings);
        Self {
            geometry,
            visibility,
            region: region.clone(),
            has_source,
            settings: *settings,
            cache: HashMap::new(),
        }
    }

    pub fn geometry(&self) -> &EffectGeometryGraph {
        &self.geometry
    }

    pub fn visibility(&self) -> &VisibilityGraph {
        &self.visibility
    }

    /// Visibility polygon of one graph vertex, computed once and cached.
    pub fn visibility_polygon(&mut self, vertex: &Point) -> Area {
        if let Some(area) = self.cache.get(vertex) {
            return area.clone();
        }
        let triangles = self.visibility_triangles(vertex);
        trace!(triangles = triangles.len(), "vertex visibility wedges");
        let area = union_all(triangles.iter().map(Triangle::to_area).collect());
        self.cache.insert(*vertex, area.clone());
        area
    }

    /// Visibility polygon of the whole source: every source vertex's
    /// polygon plus the clipped source itself, limited to the region.
    pub fn effect_source_polygon(&mut self) -> Area {
        let vertices = self.geometry.source_vertices().to_vec();
        let mut parts: Vec<Area> = vertices
            .iter()
            .map(|v| self.visibility_polygon(v))
            .collect();
        if self.has_source {
            parts.push(self.geometry.possibly_resized_source().clone());
        }
        let combined = union_all(parts);
        debug!(
            source_vertices = vertices.len(),
            size = combined.size(),
            "source visibility polygon"
        );
        if self.region.is_empty() {
            combined
        } else {
            combined.intersection(&self.region)
        }
    }

    /// The wedge triangles making up the visibility polygon of `src`.
    ///
    /// Visible vertices are swept clockwise; each consecutive pair spans a
    /// wedge that is closed by a shared boundary edge, by the nearest
    /// obstruction along one of its rays, or pushed far out when open.
    pub fn visibility_triangles(&self, src: &Point) -> Vec<Triangle> {
        let mut destinations = self.visibility.visible_from(src);
        destinations.sort_by(|a, b| {
            let angle_a = clockwise_angle(src.to(a));
            let angle_b = clockwise_angle(src.to(b));
            angle_a
                .total_cmp(&angle_b)
                .then_with(|| src.distance(a).total_cmp(&src.distance(b)))
        });
        if let Some(first) = destinations.first().copied() {
            destinations.push(first);
        }

        let mut triangles = Vec::new();
        for pair in destinations.windows(2) {
            let (prev, curr) = (pair[0], pair[1]);
            // a boundary edge into or out of src marks a wedge outside the free space
            if self.geometry.has_edge(&prev, src) || self.geometry.has_edge(src, &curr) {
                continue;
            }
            let triangle = if self.geometry.has_edge(&curr, &prev) || self.geometry.has_edge(&prev, &curr) {
                Triangle::new(prev.coord(), curr.coord(), src.coord())
            } else {
                self.extended_triangle(src, &prev, &curr)
            };
            if !triangle.is_degenerate(MIN_TRIANGLE) {
                triangles.push(triangle);
            }
        }
        triangles
    }

    fn extended_triangle(&self, base: &Point, left: &Point, right: &Point) -> Triangle {
        let left_hit = self.edge_intersection(base, left, right, |other| base.side_of(right, other) > 0.0);
        let right_hit = self.edge_intersection(base, right, left, |other| base.side_of(left, other) < 0.0);

        let origin = base.coord();
        match (left_hit, right_hit) {
            (Some(l), Some(r)) if distance_sq(origin, r) < distance_sq(origin, l) => {
                Triangle::new(left.coord(), r, origin)
            }
            (Some(l), _) => Triangle::new(l, right.coord(), origin),
            (None, Some(r)) => Triangle::new(left.coord(), r, origin),
            (None, None) => {
                let scale = self.settings.ray_extension;
                Triangle::new(
                    base.offset(base.to(left), scale),
                    base.offset(base.to(right), scale),
                    origin,
                )
            }
        }
    }

    /// Nearest point where the ray `base -> towards` meets a boundary edge
    /// incident to `search` whose far end passes `keep`.
    fn edge_intersection(
        &self,
        base: &Point,
        towards: &Point,
        search: &Point,
        keep: impl Fn(&Point) -> bool,
    ) -> Option<Coord<f64>> {
        let dir = base.to(towards);
        let graph = self.geometry.graph();
        graph
            .edges_from(search)
            .chain(graph.edges_to(search))
            .filter(|e| e.other(search).is_some_and(|other| keep(&other)))
            .map(|e| {
                ray_intersection(base, dir, &e.source, e.source.to(&e.destination))
                    .unwrap_or_else(|| base.offset(dir, self.settings.ray_extension))
            })
            .min_by(|a, b| distance_sq(base.coord(), *a).total_cmp(&distance_sq(base.coord(), *b)))
    }
}

/// Intersection of two rays, `None` when parallel or pointing apart.
fn ray_intersection(
    origin_a: &Point,
    dir_a: (f64, f64),
    origin_b: &Point,
    dir_b: (f64, f64),
) -> Option<Coord<f64>> {
    let denom = cross(dir_a, dir_b);
    if denom.abs() <= f64::EPSILON {
        return None;
    }
    let between = origin_a.to(origin_b);
    let t = cross(between, dir_b) / denom;
    let u = cross(between, dir_a) / denom;
    if t < 0.0 || u < 0.0 {
        return None;
    }
    Some(origin_a.offset(dir_a, t))
}

fn cross(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.1 - a.1 * b.0
}

fn distance_sq(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (a.x - b.x).powi(2) + (a.y - b.y).powi(2)
}
