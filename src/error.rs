use thiserror::Error;

/// Top-level error type for racetrace.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Errors raised when a configuration value violates its contract.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} = {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("viewport dimensions must be finite, got {width}x{height}")]
    NonFiniteViewport { width: f64, height: f64 },

    #[error("viewport dimensions must not be negative, got {width}x{height}")]
    NegativeViewport { width: f64, height: f64 },

    #[error("invalid breakpoint table: {0}")]
    Breakpoints(String),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to tube tessellation.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("invalid tessellation parameters: {0}")]
    InvalidParameters(String),
}

/// Errors related to mesh ownership.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("mesh not found: {0}")]
    NotFound(String),
}

/// Convenience type alias for results using [`TrackError`].
pub type Result<T> = std::result::Result<T, TrackError>;
