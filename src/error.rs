// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VetError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VetError>;

// Allow `?` on std::io::Error by converting to VetError::Io with unknown path.
impl From<std::io::Error> for VetError {
    fn from(source: std::io::Error) -> Self {
        VetError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}
