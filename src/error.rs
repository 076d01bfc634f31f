use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    /// Caller-facing input problem; the message is shown to the user as is.
    #[error("{0}")]
    Validation(String),

    #[error("no combined data for {rank} on {map} at {}", .path.display())]
    NotFound {
        rank: String,
        map: String,
        path: PathBuf,
    },

    #[error("request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("unexpected page markup: {0}")]
    Parse(String),

    #[error("cannot train model: {0}")]
    Training(String),

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error in {}: {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },
}

pub type Result<T> = std::result::Result<T, PredictError>;

impl PredictError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PredictError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        PredictError::Csv {
            path: path.into(),
            source,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, PredictError::Validation(_))
    }
}
