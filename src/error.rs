//! Errors raised while loading and validating evaluation input

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ring of '{name}' is invalid: {reason}")]
    InvalidRing { name: String, reason: String },
    #[error("parameter {name} has invalid value {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("unknown coverage policy '{0}'")]
    UnknownPolicy(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
