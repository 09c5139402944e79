//! covis - Effective coverage area of building spaces, with occlusion by walls

pub mod config;
pub mod coverage;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod visibility;

pub use error::{Error, Result};
