use covis::coverage::{CoverageCheck, CoveragePolicy, nearby_sources};
use covis::domain::{EffectSource, Space};
use covis::geometry::{Area, Point};
use covis::visibility::{
    DistanceOfTravelEffectCalculator, VisibilityPolygonCalculator, VisibilitySettings,
};
use proptest::prelude::*;

const L_RING: [(f64, f64); 6] = [
    (0.0, 0.0),
    (10.0, 0.0),
    (10.0, 4.0),
    (4.0, 4.0),
    (4.0, 10.0),
    (0.0, 10.0),
];

fn settings() -> VisibilitySettings {
    VisibilitySettings::default().with_source_samples(1)
}

fn square() -> Area {
    Area::rectangle((0.0, 0.0), (10.0, 10.0))
}

fn l_region() -> Area {
    Area::from_rings(&L_RING, &[])
}

fn l_source() -> Area {
    Area::rectangle((8.0, 1.0), (9.0, 2.0))
}

fn room_with_column() -> Area {
    Area::from_rings(
        &[(0.0, 0.0), (20.0, 0.0), (20.0, 10.0), (0.0, 10.0)],
        &[vec![(8.0, 3.0), (12.0, 3.0), (12.0, 7.0), (8.0, 7.0)]],
    )
}

fn point(x: f64, y: f64) -> Point {
    Point::snapped(x, y, settings().snap_grid)
}

#[test]
fn test_convex_room_seen_whole_from_center() {
    let region = square();
    let mut calculator = VisibilityPolygonCalculator::from_area_and_location(&region, (5.0, 5.0), &settings());
    let polygon = calculator.visibility_polygon(&point(5.0, 5.0));
    assert!((polygon.size() - 100.0).abs() < 1e-6);
    assert!(polygon.difference(&region).size() < 1e-9);
}

#[test]
fn test_visibility_polygon_is_repeatable() {
    let region = l_region();
    let mut calculator = VisibilityPolygonCalculator::from_area_and_location(&region, (2.0, 2.0), &settings());
    let first = calculator.visibility_polygon(&point(2.0, 2.0));
    let second = calculator.visibility_polygon(&point(2.0, 2.0));
    assert_eq!(first, second);
    assert!((first.size() - 64.0).abs() < 1e-6);
}

#[test]
fn test_outside_location_sees_in_but_not_out() {
    let region = square();
    let calculator = VisibilityPolygonCalculator::from_area_and_location(&region, (-5.0, 5.0), &settings());
    let outside = point(-5.0, 5.0);
    let corner = point(0.0, 0.0);
    assert!(calculator.visibility().has_edge(&outside, &corner));
    assert!(!calculator.visibility().has_edge(&corner, &outside));
}

fn assert_no_sight_line_through_column(source: &Area) {
    let region = room_with_column();
    let calculator = VisibilityPolygonCalculator::from_area_and_source(&region, source, &settings());
    let eps = 1e-3;
    for edge in calculator.visibility().graph().edges() {
        let (mx, my) = edge.source.lerp(&edge.destination, 0.5);
        let inside_column = mx > 8.0 + eps && mx < 12.0 - eps && my > 3.0 + eps && my < 7.0 - eps;
        assert!(
            !inside_column,
            "sight line {:?} -> {:?} passes through the column",
            edge.source, edge.destination
        );
    }
}

#[test]
fn test_sight_lines_never_cross_column() {
    assert_no_sight_line_through_column(&Area::rectangle((6.5, 4.0), (7.5, 5.0)));
}

#[test]
fn test_sight_lines_never_cross_column_from_flush_source() {
    assert_no_sight_line_through_column(&Area::rectangle((7.0, 4.0), (8.0, 5.0)));
    assert_no_sight_line_through_column(&Area::rectangle((12.0, 5.0), (13.0, 6.0)));
}

#[test]
fn test_flush_source_travels_around_column_corner() {
    let region = room_with_column();
    let source = Area::rectangle((7.0, 4.0), (8.0, 5.0));
    let far_corner = point(12.0, 3.0);

    let travel =
        DistanceOfTravelEffectCalculator::from_area_and_source_and_effect_range(&region, &source, 10.0, &settings());
    let distance = travel.distance_to_source(&far_corner).unwrap();
    // down the column face to (8, 3), then along its south side
    assert!((distance - 5.0).abs() < 1e-9);

    let short =
        DistanceOfTravelEffectCalculator::from_area_and_source_and_effect_range(&region, &source, 4.5, &settings());
    assert_eq!(short.distance_to_source(&far_corner), None);
}

#[test]
fn test_travel_reaches_behind_column() {
    let region = room_with_column();
    let source = Area::rectangle((6.5, 4.0), (7.5, 5.0));

    let mut calculator = VisibilityPolygonCalculator::from_area_and_source(&region, &source, &settings());
    let direct = calculator.effect_source_polygon();
    assert!(!direct.contains_point(14.0, 5.0));

    let mut travel =
        DistanceOfTravelEffectCalculator::from_area_and_source_and_effect_range(&region, &source, 100.0, &settings());
    let reached = travel.effect_area().intersection(&region);
    assert!(reached.contains_point(14.0, 5.0));
    assert!(reached.size() > direct.size());
}

#[test]
fn test_travel_grows_with_range_around_corner() {
    let region = l_region();
    let source = l_source();

    let mut near =
        DistanceOfTravelEffectCalculator::from_area_and_source_and_effect_range(&region, &source, 3.0, &settings());
    let mut far =
        DistanceOfTravelEffectCalculator::from_area_and_source_and_effect_range(&region, &source, 20.0, &settings());
    let near_area = near.effect_area();
    let far_area = far.effect_area();

    assert!(!near_area.is_empty());
    assert!(near_area.size() < far_area.size());
    assert!(!near_area.contains_point(2.0, 8.0));
    assert!(far_area.contains_point(2.0, 8.0));
}

#[test]
fn test_policies_rank_on_corner_room() {
    let space = Space::new("office", L_RING.to_vec());
    let sources = [EffectSource::rectangle("lamp", (8.0, 1.0), (9.0, 2.0))];
    let nearby = nearby_sources(&space, &sources, 20.0);
    assert_eq!(nearby.len(), 1);

    let ratio = |policy: CoveragePolicy| {
        CoverageCheck::new(policy, 20.0, 0.5)
            .unwrap()
            .with_settings(settings())
            .check(&space, &nearby)
            .coverage
            .ratio
    };

    let unoccluded = ratio(CoveragePolicy::Unoccluded);
    let occluded = ratio(CoveragePolicy::OccludedWithinArea);
    let travel = ratio(CoveragePolicy::DistanceOfTravel);

    assert!((unoccluded - 1.0).abs() < 1e-6);
    assert!(occluded < travel);
    assert!(travel <= unoccluded + 1e-6);
}

#[test]
fn test_short_range_travel_stays_below_line_of_sight() {
    let space = Space::new("office", L_RING.to_vec());
    let sources = [EffectSource::rectangle("lamp", (8.0, 1.0), (9.0, 2.0))];
    let refs: Vec<&EffectSource> = sources.iter().collect();

    let ratio = |policy: CoveragePolicy| {
        CoverageCheck::new(policy, 3.0, 0.5)
            .unwrap()
            .with_settings(settings())
            .check(&space, &refs)
            .coverage
            .ratio
    };

    let occluded = ratio(CoveragePolicy::OccludedWithinArea);
    let travel = ratio(CoveragePolicy::DistanceOfTravel);
    assert!(travel > 0.0);
    assert!(travel < occluded);
}

#[test]
fn test_zero_threshold_never_violates() {
    let space = Space::new("store", vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    let sources = [EffectSource::rectangle("far", (50.0, 50.0), (51.0, 51.0))];
    let refs: Vec<&EffectSource> = sources.iter().collect();

    let lenient = CoverageCheck::new(CoveragePolicy::Unoccluded, 1.0, 0.0).unwrap();
    let outcome = lenient.check(&space, &refs);
    assert_eq!(outcome.coverage.ratio, 0.0);
    assert!(!outcome.is_violation());

    let strict = CoverageCheck::new(CoveragePolicy::Unoccluded, 1.0, 1.0).unwrap();
    assert!(strict.check(&space, &refs).is_violation());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn prop_travel_area_monotone_in_range(range in 0.5f64..8.0, extra in 0.0f64..8.0) {
        let region = l_region();
        let source = l_source();
        let mut shorter =
            DistanceOfTravelEffectCalculator::from_area_and_source_and_effect_range(&region, &source, range, &settings());
        let mut longer = DistanceOfTravelEffectCalculator::from_area_and_source_and_effect_range(
            &region,
            &source,
            range + extra,
            &settings(),
        );
        let shorter_area = shorter.effect_area();
        let longer_area = longer.effect_area();
        prop_assert!(shorter_area.difference(&longer_area).size() < 1e-6);
    }
}
