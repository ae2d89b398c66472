// src/error.rs

//! Error types for layer construction, compositing and configuration.

use thiserror::Error;

/// Why a [`Layer`](crate::layer::Layer) could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayerError {
    #[error("layer dimensions must be between 1 and {max}, got {width}x{height}")]
    InvalidDimension { width: u16, height: u16, max: u16 },
    #[error("failed to allocate {bytes} bytes of pixel storage for a {width}x{height} layer")]
    AllocationFailed { width: u16, height: u16, bytes: usize },
}

/// Caller contract violations rejected by the compositor before any pixel is emitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositeError {
    #[error("no layers to composite")]
    NoLayers,
    #[error("{count} layers exceeds the supported maximum of {max}")]
    TooManyLayers { count: usize, max: usize },
    #[error("expected {expected} {what}, got {actual}")]
    OperandMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("could not read configuration file: {0}")]
    Io(#[from] std::io::Error),
}
