use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::threads::JoinError;

/// Failures while producing an image. Numeric work cannot fail; only the
/// output side and the worker pool can.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("could not create {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("write failed: {0}")]
    Write(#[from] io::Error),

    #[error("image writer expected {expected} pixels, got {written}")]
    PixelCount { expected: usize, written: usize },

    #[error("image of {width}x{height} pixels does not fit the image buffer")]
    TooLarge { width: usize, height: usize },

    #[error("render worker failed: {0}")]
    Worker(#[from] JoinError),
}

/// Rejected configuration. Only raised by
/// [`crate::config::RenderConfig::validate`] and the preset lookups; the
/// render path itself trusts its input.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("zoom must be positive and finite, got {0}")]
    Zoom(f64),

    #[error("image dimensions must be non-zero, got {width}x{height}")]
    Dimensions { width: usize, height: usize },

    #[error("{what} must be finite")]
    NotFinite { what: &'static str },

    #[error("escape threshold must be positive, got {0}")]
    Threshold(f64),

    #[error("iteration cap must be at least 1")]
    Iterations,

    #[error("unknown resolution '{0}'")]
    UnknownResolution(String),

    #[error("unknown colormap '{0}'")]
    UnknownColormap(String),

    #[error("unknown iteration function '{0}'")]
    UnknownFunction(String),
}
