//! Error types for backdrop

use backdrop_core::LifecycleError;
use thiserror::Error;

use crate::preferences::PreferenceError;

/// Backdrop error type
#[derive(Error, Debug)]
pub enum BackdropError {
    /// The drawing context could not be obtained at start
    #[error("rendering surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error(transparent)]
    InvalidLifecycle(#[from] LifecycleError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Preference(#[from] PreferenceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for BackdropError {
    fn from(err: toml::de::Error) -> Self {
        BackdropError::Config(err.to_string())
    }
}

impl From<backdrop_gpu::GpuError> for BackdropError {
    fn from(err: backdrop_gpu::GpuError) -> Self {
        BackdropError::SurfaceUnavailable(err.to_string())
    }
}

/// Result type for backdrop operations
pub type Result<T> = std::result::Result<T, BackdropError>;
