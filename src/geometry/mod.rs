pub mod area;
pub mod bounds;
pub mod point;
pub mod shapes;

pub use area::{Area, union_all};
pub use bounds::Bounds;
pub use point::{Point, clockwise_angle};
pub use shapes::{Triangle, regular_polygon, sample_segment, swept_quad};
