//! Run the analysis for a set of stations.
//!
//! Each station is fetched and analyzed on its own worker, results are collected and then merged
//! into the `ResultSet` in one place.
use crate::{
    aggregate::{aggregate, ResultSet, StationOutcome},
    analysis::analyze_sounding,
    config::Config,
    error::{AnalysisError, ConfigError},
    source::ProfileSource,
    station::Station,
};
use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use metfor::Quantity;
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Fetch and analyze one station.
pub fn process_station<S>(time: NaiveDateTime, station: &Station, source: &S) -> StationOutcome
where
    S: ProfileSource + ?Sized,
{
    let result = source
        .fetch(time, station)
        .map_err(AnalysisError::from)
        .and_then(|snd| analyze_sounding(&snd).map(|diag| (snd, diag)));

    match result {
        Ok((snd, diagnostics)) => {
            debug!(
                station = %station.code,
                source = snd.source_description().unwrap_or("-"),
                cape = diagnostics.cape().unpack(),
                category = %diagnostics.category(),
                "analyzed"
            );

            StationOutcome::Analyzed {
                station: station.clone(),
                valid_time: snd.valid_time(),
                reported_location: snd.reported_location(),
                diagnostics,
            }
        }
        Err(error) => {
            warn!(station = %station.code, %error, "station skipped");

            StationOutcome::Failed {
                station: station.clone(),
                error,
            }
        }
    }
}

/// Analyze every station for `time` in parallel on the current rayon pool.
///
/// A station that fails affects only itself, it is left out of the records and noted in the
/// exclusions.
pub fn run_diagnostics<S>(time: NaiveDateTime, stations: &[Station], source: &S) -> ResultSet
where
    S: ProfileSource + ?Sized,
{
    info!(%time, stations = stations.len(), "starting run");

    let outcomes: Vec<StationOutcome> = stations
        .par_iter()
        .map(|stn| process_station(time, stn, source))
        .collect();

    let results = aggregate(time, outcomes);

    info!(
        %time,
        classified = results.len(),
        excluded = results.excluded().count(),
        "run complete"
    );

    results
}

/// Run for all configured stations on a thread pool sized by the configuration.
pub fn run_with_config<S>(
    config: &Config,
    time: NaiveDateTime,
    source: &S,
) -> Result<ResultSet, ConfigError>
where
    S: ProfileSource + ?Sized,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()
        .map_err(|err| ConfigError::InvalidSetting(format!("worker pool: {}", err)))?;

    Ok(pool.install(|| run_diagnostics(time, config.stations.stations(), source)))
}

/// The most recent synoptic sounding time at or before `now`, 00 or 12 UTC.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use sounding_stability::latest_sounding_time;
///
/// let day = NaiveDate::from_ymd_opt(2023, 10, 16).unwrap();
///
/// let now = day.and_hms_opt(14, 35, 0).unwrap();
/// assert_eq!(latest_sounding_time(now), day.and_hms_opt(12, 0, 0).unwrap());
///
/// let now = day.and_hms_opt(11, 59, 59).unwrap();
/// assert_eq!(latest_sounding_time(now), day.and_hms_opt(0, 0, 0).unwrap());
/// ```
pub fn latest_sounding_time(now: NaiveDateTime) -> NaiveDateTime {
    let midnight = now.date().and_time(NaiveTime::MIN);

    if now.hour() >= 12 {
        midnight + Duration::hours(12)
    } else {
        midnight
    }
}
