use crate::domain::{EffectSource, Space};

/// Sources whose bounding box touches the space's bounding box grown by
/// `tolerance`, usually the effect range.
pub fn nearby_sources<'a>(
    space: &Space,
    sources: &'a [EffectSource],
    tolerance: f64,
) -> Vec<&'a EffectSource> {
    let Some(reach) = space.bounds().map(|b| b.grow(tolerance.max(0.0))) else {
        return Vec::new();
    };
    sources
        .iter()
        .filter(|s| s.bounds().is_some_and(|b| reach.intersects(&b)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_within_range_are_kept() {
        let space = Space::new(
            "office",
            vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
        );
        let sources = vec![
            EffectSource::rectangle("inside", (2.0, 2.0), (3.0, 3.0)),
            EffectSource::rectangle("close", (11.0, 2.0), (12.0, 3.0)),
            EffectSource::rectangle("far", (30.0, 2.0), (31.0, 3.0)),
        ];

        let names: Vec<&str> = nearby_sources(&space, &sources, 2.0)
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["inside", "close"]);

        assert_eq!(nearby_sources(&space, &sources, 0.0).len(), 1);
    }
}
