//! Error types for the sounding-stability crate.
use metfor::{HectoPascal, Quantity};
use thiserror::Error;

/// Error type for the analysis of a single station.
///
/// Every variant is local to one station, a failure never aborts a run for the other stations.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum AnalysisError {
    /// The sounding is unusable: too few levels, non-monotonic pressure, bad surface data, etc.
    #[error("malformed profile: {0}")]
    MalformedProfile(String),
    /// The sounding does not bracket a standard pressure level needed by an index.
    #[error("sounding does not span the {} hPa level", hpa(.0))]
    MissingStandardLevel(HectoPascal),
    /// The station has no latitude/longitude, so it cannot be placed on a map.
    #[error("station has no geolocation")]
    NoGeolocation,
    /// The profile source had no data for this station and time.
    #[error("no profile available")]
    ProfileUnavailable,
    /// A value (surface value, index, location, etc) that is required is not available.
    #[error("missing value required for analysis")]
    MissingValue,
    /// Not enough data available for analysis.
    #[error("not enough data available for analysis")]
    NotEnoughData,
    /// Bad or invalid input, e.g. a parcel metfor cannot evaluate.
    #[error("invalid input")]
    InvalidInput,
    /// Missing data during interpolation, or it would have been extrapolation.
    #[error("none value encountered during interpolation")]
    InterpolationError,
    /// The root finder could not bracket the lifting condensation level.
    #[error("could not find the lifting condensation level")]
    LclNotFound,
}

fn hpa(p: &HectoPascal) -> f64 {
    p.unpack()
}

/// Shorthand for results.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors in the static reference data or configuration. These are fatal and reported once at
/// startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path of the file that failed.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The station table itself is corrupt.
    #[error("invalid station table: {0}")]
    InvalidStation(String),
    /// Some other setting is out of range.
    #[error("invalid setting: {0}")]
    InvalidSetting(String),
}
