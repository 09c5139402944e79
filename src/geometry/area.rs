use geo::orient::{Direction, Orient};
use geo::{Area as _, BooleanOps, Contains, Coord, LineString, MultiPolygon, Polygon};

use super::Bounds;
use super::shapes::{regular_polygon, swept_quad};

/// Areas below this size are treated as empty.
const MIN_AREA: f64 = 1e-12;

/// A set of polygons with holes.
///
/// Every operation returns a new value; nothing mutates in place. All the
/// boolean work is delegated to `geo::BooleanOps`.
#[derive(Debug, Clone, PartialEq)]
pub struct Area(MultiPolygon<f64>);

impl Default for Area {
    fn default() -> Self {
        Self::empty()
    }
}

impl Area {
    pub fn empty() -> Self {
        Self(MultiPolygon::new(Vec::new()))
    }

    /// Build an area from an outer ring and hole rings given as `(x, y)` pairs.
    /// Rings may be open or closed; winding is normalised.
    pub fn from_rings(outer: &[(f64, f64)], holes: &[Vec<(f64, f64)>]) -> Self {
        if outer.len() < 3 {
            return Self::empty();
        }
        let exterior = to_line_string(outer);
        let interiors = holes
            .iter()
            .filter(|h| h.len() >= 3)
            .map(|h| to_line_string(h))
            .collect();
        Self::from_polygon(Polygon::new(exterior, interiors))
    }

    pub fn from_polygon(polygon: Polygon<f64>) -> Self {
        Self(MultiPolygon::new(vec![polygon.orient(Direction::Default)]))
    }

    /// Axis-aligned rectangle spanning the two corners.
    pub fn rectangle(min: (f64, f64), max: (f64, f64)) -> Self {
        Self::from_rings(
            &[(min.0, min.1), (max.0, min.1), (max.0, max.1), (min.0, max.1)],
            &[],
        )
    }

    pub fn polygons(&self) -> &[Polygon<f64>] {
        &self.0.0
    }

    /// Polygons with clockwise outer rings and counter-clockwise holes.
    pub fn clockwise_polygons(&self) -> Vec<Polygon<f64>> {
        self.0
            .iter()
            .map(|p| p.orient(Direction::Reversed))
            .collect()
    }

    pub fn size(&self) -> f64 {
        self.0.unsigned_area()
    }

    pub fn is_empty(&self) -> bool {
        self.0.0.is_empty() || self.size() <= MIN_AREA
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.0.contains(&geo::Point::new(x, y))
    }

    pub fn union(&self, other: &Area) -> Area {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        Area(self.0.union(&other.0))
    }

    pub fn intersection(&self, other: &Area) -> Area {
        if self.is_empty() || other.is_empty() {
            return Area::empty();
        }
        Area(self.0.intersection(&other.0))
    }

    pub fn difference(&self, other: &Area) -> Area {
        if self.is_empty() {
            return Area::empty();
        }
        if other.is_empty() {
            return self.clone();
        }
        Area(self.0.difference(&other.0))
    }

    /// Grow the area outward by `distance`.
    ///
    /// Computed as the Minkowski sum with a disc: the area itself, a quad swept
    /// along every ring edge, and a circumscribed regular polygon around every
    /// ring vertex. The result always contains the exact offset.
    pub fn buffer(&self, distance: f64, segments: usize) -> Area {
        if distance <= 0.0 || self.is_empty() {
            return self.clone();
        }
        let mut pieces = vec![self.clone()];
        for polygon in self.polygons() {
            for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
                for line in ring.lines() {
                    if let Some(quad) = swept_quad(line.start, line.end, distance) {
                        pieces.push(Area::from_polygon(quad));
                    }
                    pieces.push(Area::from_polygon(regular_polygon(
                        line.start, distance, segments, true,
                    )));
                }
            }
        }
        union_all(pieces)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let points: Vec<(f64, f64)> = self
            .0
            .iter()
            .flat_map(|p| p.exterior().coords())
            .map(|c| (c.x, c.y))
            .collect();
        Bounds::from_points(&points)
    }

    /// Flatten every ring to `(x, y)` pairs: `(outer, holes)` per polygon.
    pub fn to_rings(&self) -> Vec<(Vec<(f64, f64)>, Vec<Vec<(f64, f64)>>)> {
        self.0
            .iter()
            .map(|p| {
                (
                    ring_points(p.exterior()),
                    p.interiors().iter().map(ring_points).collect(),
                )
            })
            .collect()
    }
}

impl From<Polygon<f64>> for Area {
    fn from(polygon: Polygon<f64>) -> Self {
        Self::from_polygon(polygon)
    }
}

/// Union a list of areas by pairwise reduction.
pub fn union_all(areas: Vec<Area>) -> Area {
    let mut layer: Vec<Area> = areas.into_iter().filter(|a| !a.is_empty()).collect();
    if layer.is_empty() {
        return Area::empty();
    }
    while layer.len() > 1 {
        let mut next = Vec::with_capacity(layer.len().div_ceil(2));
        let mut iter = layer.into_iter();
        while let Some(first) = iter.next() {
            match iter.next() {
                Some(second) => next.push(first.union(&second)),
                None => next.push(first),
            }
        }
        layer = next;
    }
    layer.pop().unwrap_or_default()
}

fn to_line_string(points: &[(f64, f64)]) -> LineString<f64> {
    points
        .iter()
        .map(|&(x, y)| Coord { x, y })
        .collect::<Vec<_>>()
        .into()
}

fn ring_points(ring: &LineString<f64>) -> Vec<(f64, f64)> {
    ring.coords().map(|c| (c.x, c.y)).collect()
}
