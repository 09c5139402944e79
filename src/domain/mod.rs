pub mod scene;
pub mod source;
pub mod space;

pub use scene::Scene;
pub use source::EffectSource;
pub use space::Space;
