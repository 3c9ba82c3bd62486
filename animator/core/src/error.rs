//! Animator Errors
//!
//! All failures the engine surfaces are local validation failures returned
//! synchronously to the caller. Transient conditions (degenerate viewports,
//! resize bursts, stale timers) are not errors and never show up here.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the animation engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnimatorError {
    /// A frame duration was negative or its range was inverted
    #[error("invalid frame duration: min {min} ms, max {max} ms")]
    InvalidDuration { min: i64, max: i64 },

    /// An animation set was declared without any frames
    #[error("animation set '{name}' has no frames")]
    EmptyAnimationSet { name: String },

    /// The requested animation set was never registered
    #[error("unknown animation set '{name}'")]
    UnknownAnimationSet { name: String },

    /// A set with the same name is already registered
    #[error("animation set '{name}' is already registered")]
    DuplicateAnimationSet { name: String },

    /// The image service could not decode or resize a frame image
    #[error("failed to load image {path:?}: {reason}")]
    ImageDecode { path: PathBuf, reason: String },

    /// Configuration could not be read or failed validation
    #[error("invalid configuration: {reason}")]
    Config { reason: String },
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, AnimatorError>;
