//! Effect that bends around corners, losing range with the distance travelled.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::{debug, trace};

use super::polygon::VisibilityPolygonCalculator;
use super::settings::VisibilitySettings;
use crate::geometry::{Area, Point, regular_polygon, union_all};

/// A vertex waiting in the search queue, ordered by travel distance.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    vertex: Point,
    distance: f64,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance && self.vertex == other.vertex
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the nearest vertex first
        other.distance.total_cmp(&self.distance)
    }
}

/// Travel distances from the source to every vertex within range, and the
/// area the effect reaches from them.
#[derive(Debug, Clone)]
pub struct DistanceOfTravelEffectCalculator {
    calculator: VisibilityPolygonCalculator,
    effect_range: f64,
    distances: HashMap<Point, f64>,
    settings: VisibilitySettings,
}

impl DistanceOfTravelEffectCalculator {
    pub fn from_area_and_source_and_effect_range(
        region: &Area,
        source: &Area,
        effect_range: f64,
        settings: &VisibilitySettings,
    ) -> Self {
        let calculator = VisibilityPolygonCalculator::from_area_and_source(region, source, settings);
        let mut effect = Self {
            calculator,
            effect_range,
            distances: HashMap::new(),
            settings: *settings,
        };
        effect.settle_distances();
        effect
    }

    /// Shortest travel distance through the visibility graph from any source
    /// vertex, pruned at the effect range.
    fn settle_distances(&mut self) {
        let mut heap = BinaryHeap::new();
        for vertex in self.calculator.geometry().source_vertices() {
            self.distances.insert(*vertex, 0.0);
            heap.push(Candidate {
                vertex: *vertex,
                distance: 0.0,
            });
        }

        let visibility = self.calculator.visibility();
        while let Some(Candidate { vertex, distance }) = heap.pop() {
            if self.distances.get(&vertex).is_some_and(|&best| distance > best) {
                continue;
            }
            for edge in visibility.edges_from(&vertex) {
                let travelled = distance + edge.weight;
                if travelled > self.effect_range {
                    continue;
                }
                let known = self
                    .distances
                    .get(&edge.destination)
                    .copied()
                    .unwrap_or(f64::INFINITY);
                if travelled < known {
                    self.distances.insert(edge.destination, travelled);
                    heap.push(Candidate {
                        vertex: edge.destination,
                        distance: travelled,
                    });
                }
            }
        }
        debug!(
            reached = self.distances.len(),
            range = self.effect_range,
            "settled travel distances"
        );
    }

    pub fn effect_range(&self) -> f64 {
        self.effect_range
    }

    /// Travel distance of `vertex`, `None` when it lies beyond the range.
    pub fn distance_to_source(&self, vertex: &Point) -> Option<f64> {
        self.distances.get(vertex).copied()
    }

    pub fn calculator(&self) -> &VisibilityPolygonCalculator {
        &self.calculator
    }

    /// Union of every reached vertex's visibility polygon cut to its
    /// remaining range, together with the clipped source.
    pub fn effect_area(&mut self) -> Area {
        // graph order keeps the union deterministic
        let reached: Vec<(Point, f64)> = self
            .calculator
            .visibility()
            .graph()
            .vertices()
            .filter_map(|v| self.distances.get(v).map(|&d| (*v, d)))
            .collect();

        let mut parts = vec![self.calculator.geometry().possibly_resized_source().clone()];
        for (vertex, distance) in reached {
            let remaining = self.effect_range - distance;
            if remaining <= 0.0 {
                continue;
            }
            let disc = Area::from_polygon(regular_polygon(
                vertex.coord(),
                remaining,
                self.settings.circle_segments,
                false,
            ));
            let contribution = self.calculator.visibility_polygon(&vertex).intersection(&disc);
            trace!(distance, size = contribution.size(), "vertex effect");
            parts.push(contribution);
        }
        union_all(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l_region() -> Area {
        Area::from_rings(
            &[(0.0, 0.0), (10.0, 0.0), (10.0, 4.0), (4.0, 4.0), (4.0, 10.0), (0.0, 10.0)],
            &[],
        )
    }

    fn snap(x: f64, y: f64) -> Point {
        Point::snapped(x, y, 1e-6)
    }

    fn effect(range: f64) -> DistanceOfTravelEffectCalculator {
        DistanceOfTravelEffectCalculator::from_area_and_source_and_effect_range(
            &l_region(),
            &Area::rectangle((8.0, 1.0), (9.0, 2.0)),
            range,
            &VisibilitySettings::default().with_source_samples(1),
        )
    }

    #[test]
    fn test_candidate_heap_pops_nearest() {
        let mut heap = BinaryHeap::new();
        for d in [3.0, 1.0, 2.0] {
            heap.push(Candidate {
                vertex: Point::new(d, 0.0),
                distance: d,
            });
        }
        assert_eq!(heap.pop().map(|c| c.distance), Some(1.0));
        assert_eq!(heap.pop().map(|c| c.distance), Some(2.0));
    }

    #[test]
    fn test_source_vertices_start_at_zero() {
        let calc = effect(3.0);
        assert_eq!(calc.distance_to_source(&snap(8.0, 1.0)), Some(0.0));
        assert_eq!(calc.distance_to_source(&snap(8.5, 2.0)), Some(0.0));
    }

    #[test]
    fn test_distances_are_pruned_at_range() {
        let calc = effect(3.0);
        // nearest source corner is (9, 1), one unit away
        let corner = calc.distance_to_source(&snap(10.0, 0.0)).unwrap();
        assert!((corner - 2.0_f64.sqrt()).abs() < 1e-9);
        assert!(calc.distance_to_source(&snap(4.0, 4.0)).is_none());
        assert!(calc.distance_to_source(&snap(0.0, 10.0)).is_none());
    }

    #[test]
    fn test_distance_bends_around_corner() {
        let calc = effect(100.0);
        // (4, 10) is only reachable through the reflex corner (4, 4)
        let reflex = calc.distance_to_source(&snap(4.0, 4.0)).unwrap();
        let far = calc.distance_to_source(&snap(4.0, 10.0)).unwrap();
        assert!((far - (reflex + 6.0)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_range_is_source_only() {
        let mut calc = effect(0.0);
        let area = calc.effect_area();
        assert!((area.size() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_larger_range_reaches_far_arm() {
        let mut short = effect(3.0);
        let mut long = effect(20.0);
        let short_area = short.effect_area();
        let long_area = long.effect_area();
        assert!(short_area.size() < long_area.size());
        assert!(short_area.difference(&long_area).size() < 1e-6);
        assert!(!short_area.contains_point(2.0, 8.0));
        assert!(long_area.contains_point(2.0, 8.0));
    }
}
