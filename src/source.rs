//! Sources of soundings.
//!
//! The analysis itself never does I/O, soundings are supplied by a `ProfileSource`. Sources are
//! shared between the worker threads of a run, so they must be `Sync`.
use crate::{error::AnalysisError, sounding::Sounding, station::Station};
use chrono::NaiveDateTime;
use std::collections::HashMap;
use thiserror::Error;

pub use self::csv::{parse_sounding, CsvDirectorySource};
pub use self::retry::{RetryPolicy, RetryingSource};

mod csv;
mod retry;

/// Failure to get a sounding from a source.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum FetchError {
    /// The source has no sounding for this station and time.
    #[error("no sounding available")]
    NotAvailable,
    /// The source failed in a way that may go away if tried again, e.g. a busy server.
    #[error("transient failure: {0}")]
    Transient(String),
    /// The source has data, but it can't be turned into a sounding.
    #[error("corrupt sounding data: {0}")]
    Corrupt(String),
}

impl FetchError {
    /// Whether trying again might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Transient(_))
    }
}

impl From<FetchError> for AnalysisError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::NotAvailable | FetchError::Transient(_) => AnalysisError::ProfileUnavailable,
            FetchError::Corrupt(msg) => AnalysisError::MalformedProfile(msg),
        }
    }
}

/// Supplies one sounding per station for a requested time.
pub trait ProfileSource: Sync {
    /// Get the sounding for `station` valid at `time`.
    fn fetch(&self, time: NaiveDateTime, station: &Station) -> Result<Sounding, FetchError>;
}

impl<T: ProfileSource + ?Sized> ProfileSource for &T {
    fn fetch(&self, time: NaiveDateTime, station: &Station) -> Result<Sounding, FetchError> {
        (**self).fetch(time, station)
    }
}

impl<T: ProfileSource + ?Sized> ProfileSource for Box<T> {
    fn fetch(&self, time: NaiveDateTime, station: &Station) -> Result<Sounding, FetchError> {
        (**self).fetch(time, station)
    }
}

/// A source holding soundings in memory, keyed by time and station code.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use sounding_stability::{MemorySource, ProfileSource, Station, FetchError};
/// # use sounding_stability::doctest::make_test_sounding;
///
/// let time = NaiveDate::from_ymd_opt(2023, 10, 16).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let src = MemorySource::new().with_sounding(time, "WIII", make_test_sounding());
///
/// assert!(src.fetch(time, &Station::new("WIII", "Jakarta")).is_ok());
/// assert_eq!(
///     src.fetch(time, &Station::new("WAAA", "Makassar")).unwrap_err(),
///     FetchError::NotAvailable
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    soundings: HashMap<(NaiveDateTime, String), Sounding>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        MemorySource::default()
    }

    /// Builder method to add a sounding.
    pub fn with_sounding<S: Into<String>>(
        mut self,
        time: NaiveDateTime,
        code: S,
        snd: Sounding,
    ) -> Self {
        self.insert(time, code, snd);
        self
    }

    /// Add a sounding, replacing any already there for the same time and station.
    pub fn insert<S: Into<String>>(&mut self, time: NaiveDateTime, code: S, snd: Sounding) {
        self.soundings.insert((time, code.into()), snd);
    }

    /// Number of soundings held.
    pub fn len(&self) -> usize {
        self.soundings.len()
    }

    /// True if there are no soundings.
    pub fn is_empty(&self) -> bool {
        self.soundings.is_empty()
    }
}

impl ProfileSource for MemorySource {
    fn fetch(&self, time: NaiveDateTime, station: &Station) -> Result<Sounding, FetchError> {
        self.soundings
            .get(&(time, station.code.clone()))
            .cloned()
            .ok_or(FetchError::NotAvailable)
    }
}
