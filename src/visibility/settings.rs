use serde::{Deserialize, Serialize};

fn default_source_samples() -> usize {
    9
}
fn default_circle_segments() -> usize {
    36
}
fn default_buffer_segments() -> usize {
    36
}
fn default_ray_extension() -> f64 {
    10.0
}
fn default_snap_grid() -> f64 {
    1e-6
}
fn default_crossing_tolerance() -> f64 {
    1e-5
}

/// Numeric knobs of the visibility computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibilitySettings {
    /// Extra points inserted on every edge of the source boundary
    #[serde(default = "default_source_samples")]
    pub source_samples: usize,
    /// Sides of the polygon standing in for a range circle
    #[serde(default = "default_circle_segments")]
    pub circle_segments: usize,
    /// Sides of the vertex discs used when buffering an area
    #[serde(default = "default_buffer_segments")]
    pub buffer_segments: usize,
    /// How far an unobstructed wedge is pushed out, as a multiple of its ray length
    #[serde(default = "default_ray_extension")]
    pub ray_extension: f64,
    /// Grid every graph vertex is rounded to
    #[serde(default = "default_snap_grid")]
    pub snap_grid: f64,
    /// Crossings closer than this to a segment endpoint do not block sight
    #[serde(default = "default_crossing_tolerance")]
    pub crossing_tolerance: f64,
}

impl Default for VisibilitySettings {
    fn default() -> Self {
        Self {
            source_samples: default_source_samples(),
            circle_segments: default_circle_segments(),
            buffer_segments: default_buffer_segments(),
            ray_extension: default_ray_extension(),
            snap_grid: default_snap_grid(),
            crossing_tolerance: default_crossing_tolerance(),
        }
    }
}

impl VisibilitySettings {
    pub fn with_source_samples(mut self, samples: usize) -> Self {
        self.source_samples = samples;
        self
    }

    pub fn with_circle_segments(mut self, segments: usize) -> Self {
        self.circle_segments = segments.max(3);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_table_uses_defaults() {
        let settings: VisibilitySettings = toml::from_str("source_samples = 4").unwrap();
        assert_eq!(settings.source_samples, 4);
        assert_eq!(settings.circle_segments, 36);
        assert_eq!(settings.ray_extension, 10.0);
    }

    #[test]
    fn test_builders() {
        let settings = VisibilitySettings::default()
            .with_source_samples(3)
            .with_circle_segments(1);
        assert_eq!(settings.source_samples, 3);
        assert_eq!(settings.circle_segments, 3);
    }
}
