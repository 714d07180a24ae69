//! Collect the per-station results of a run into a single result set.
use crate::{
    analysis::Diagnostics,
    classify::StabilityCategory,
    error::AnalysisError,
    station::Station,
};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use tracing::debug;

/// The final, classified result for one station.
#[derive(Debug, Clone, PartialEq)]
pub struct StabilityRecord {
    /// The station the sounding came from.
    pub station: Station,
    /// Valid time of the sounding.
    pub time: NaiveDateTime,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// The computed diagnostics.
    pub diagnostics: Diagnostics,
    /// Category assigned from the diagnostics.
    pub category: StabilityCategory,
}

impl StabilityRecord {
    /// Create a record, classifying the diagnostics.
    pub fn new(
        station: Station,
        time: NaiveDateTime,
        (latitude, longitude): (f64, f64),
        diagnostics: Diagnostics,
    ) -> Self {
        let category = diagnostics.category();

        StabilityRecord {
            station,
            time,
            latitude,
            longitude,
            diagnostics,
            category,
        }
    }

    /// Classify the stored diagnostics again, this always agrees with `category`.
    pub fn reclassify(&self) -> StabilityCategory {
        self.diagnostics.category()
    }
}

/// What happened to one station during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum StationOutcome {
    /// The sounding was retrieved and analyzed.
    Analyzed {
        /// Station from the station table.
        station: Station,
        /// Valid time reported with the sounding, if any.
        valid_time: Option<NaiveDateTime>,
        /// Location reported with the sounding, if any.
        reported_location: Option<(f64, f64)>,
        /// The computed diagnostics.
        diagnostics: Diagnostics,
    },
    /// The sounding couldn't be retrieved or analyzed.
    Failed {
        /// Station from the station table.
        station: Station,
        /// What went wrong.
        error: AnalysisError,
    },
}

impl StationOutcome {
    /// The station this outcome is for.
    pub fn station(&self) -> &Station {
        match self {
            StationOutcome::Analyzed { station, .. } | StationOutcome::Failed { station, .. } => {
                station
            }
        }
    }
}

/// Why a station is not in the result set.
#[derive(Debug, Clone, PartialEq)]
pub enum Exclusion {
    /// Analyzed, but there is no location to map it at.
    NoGeolocation(Diagnostics),
    /// Retrieval or analysis failed.
    Failed(AnalysisError),
}

impl Exclusion {
    /// The error describing this exclusion.
    pub fn error(&self) -> AnalysisError {
        match self {
            Exclusion::NoGeolocation(_) => AnalysisError::NoGeolocation,
            Exclusion::Failed(err) => err.clone(),
        }
    }
}

/// Stability records keyed and ordered by station code.
#[derive(Debug, Clone)]
pub struct ResultSet {
    time: NaiveDateTime,
    records: BTreeMap<String, StabilityRecord>,
    excluded: BTreeMap<String, (Station, Exclusion)>,
}

impl ResultSet {
    /// Create an empty result set for a run at `time`.
    pub fn new(time: NaiveDateTime) -> Self {
        ResultSet {
            time,
            records: BTreeMap::new(),
            excluded: BTreeMap::new(),
        }
    }

    /// The requested time of the run.
    pub fn time(&self) -> NaiveDateTime {
        self.time
    }

    /// Merge the outcome for one station.
    ///
    /// The location comes from the station table, falling back to the location reported with the
    /// sounding. Without either the station is excluded. Failed stations are excluded too, never
    /// given a default category.
    pub fn insert(&mut self, outcome: StationOutcome) {
        match outcome {
            StationOutcome::Analyzed {
                station,
                valid_time,
                reported_location,
                diagnostics,
            } => match station.location().or(reported_location) {
                Some(location) => {
                    let time = valid_time.unwrap_or(self.time);
                    let record = StabilityRecord::new(station, time, location, diagnostics);
                    self.excluded.remove(&record.station.code);
                    self.records.insert(record.station.code.clone(), record);
                }
                None => {
                    debug!(station = %station.code, "no geolocation, excluded");
                    self.exclude(station, Exclusion::NoGeolocation(diagnostics));
                }
            },
            StationOutcome::Failed { station, error } => {
                debug!(station = %station.code, %error, "failed, excluded");
                self.exclude(station, Exclusion::Failed(error));
            }
        }
    }

    fn exclude(&mut self, station: Station, reason: Exclusion) {
        self.records.remove(&station.code);
        self.excluded
            .insert(station.code.clone(), (station, reason));
    }

    /// Iterate over the records in station code order.
    pub fn records(&self) -> impl Iterator<Item = &StabilityRecord> {
        self.records.values()
    }

    /// Look up the record for a station.
    pub fn get(&self, code: &str) -> Option<&StabilityRecord> {
        self.records.get(code)
    }

    /// Iterate over the excluded stations in station code order.
    pub fn excluded(&self) -> impl Iterator<Item = (&Station, &Exclusion)> {
        self.excluded.values().map(|(stn, why)| (stn, why))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no station made it into the result set.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Merge all the outcomes of a run, in order, into a result set.
pub fn aggregate<I>(time: NaiveDateTime, outcomes: I) -> ResultSet
where
    I: IntoIterator<Item = StationOutcome>,
{
    outcomes
        .into_iter()
        .fold(ResultSet::new(time), |mut set, outcome| {
            set.insert(outcome);
            set
        })
}
