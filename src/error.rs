//! Error types shared across the crate

use thiserror::Error;

/// Problems with the shape of trend data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("unknown dimension key: {0}")]
    UnknownDimension(String),

    #[error("unknown time window: {0} (expected first-half, second-half or all)")]
    UnknownWindow(String),

    #[error("dimension {dimension} has {actual} points, expected {expected}")]
    MisalignedSeries {
        dimension: String,
        expected: usize,
        actual: usize,
    },

    #[error("dimension {dimension} has year {found} at index {index}, expected {expected}")]
    MisalignedYear {
        dimension: String,
        index: usize,
        expected: i32,
        found: i32,
    },

    #[error("year {year} appears more than once in {dimension}")]
    DuplicateYear { dimension: String, year: i32 },

    #[error("years in {dimension} are not ascending at index {index}")]
    UnorderedYears { dimension: String, index: usize },
}

/// Failures reported by a chart surface
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    #[error("surface has been disposed")]
    Disposed,

    #[error("invalid surface size {width}x{height}")]
    InvalidSize { width: f64, height: f64 },

    #[error("coordinate conversion unavailable: {0}")]
    ConversionUnavailable(String),

    #[error("render failed: {0}")]
    Render(String),
}

/// Failures talking to the remote fortune service
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned status {0}")]
    Status(u16),

    #[error("server reported failure")]
    Unsuccessful,

    #[error("response missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Top-level error for host applications
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to parse payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
