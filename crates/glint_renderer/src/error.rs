//! Error type for the fallible parts of the renderer.
//!
//! The tracing core itself is total; only scene assembly, configuration
//! and image output can fail.

use thiserror::Error;

/// Errors that can occur while setting up or writing out a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Cannot build a BVH over an empty scene")]
    EmptyScene,

    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;
