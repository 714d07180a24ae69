#![warn(missing_docs)]
/*!
Convective stability diagnostics for upper air soundings.

Each sounding is lifted from the surface to get a parcel profile, and from that CAPE, CIN, the
LCL, LFC, and EL. The K-Index, Lifted Index, and Showalter Index come from the standard pressure
levels. Together they place the sounding in a `StabilityCategory`.

A run fetches the soundings for a set of stations from a `ProfileSource`, analyzes them in
parallel, and collects the classified records into a `ResultSet`. The `render` inputs turn a result
set into a table, map markers, and a legend.

*/

//
// API
//
pub use crate::{
    aggregate::{aggregate, Exclusion, ResultSet, StabilityRecord, StationOutcome},
    analysis::{analyze_sounding, Diagnostics},
    buoyancy::{buoyancy_analysis, BuoyancyAnalysis},
    classify::{classify, StabilityCategory},
    config::{Config, RetrySettings},
    error::{AnalysisError, ConfigError, Result},
    indexes::{kindex, lifted_index, showalter_index},
    interpolation::linear_interpolate_sounding,
    keys::DiagnosticIndex,
    parcel::{pressure_parcel, surface_parcel, Parcel},
    parcel_profile::{lift_parcel, lifted_temperature, parcel_profile, ParcelProfile},
    pipeline::{latest_sounding_time, process_station, run_diagnostics, run_with_config},
    render::{
        legend, map_markers, map_view, table, LegendEntry, MapMarker, MapView, Table, TableRow,
    },
    sounding::{doctest, DataRow, Sounding},
    source::{
        parse_sounding, CsvDirectorySource, FetchError, MemorySource, ProfileSource, RetryPolicy,
        RetryingSource,
    },
    station::{Station, StationTable},
};

pub mod render;

//
// Internal use only
//

// Modules
mod aggregate;
mod analysis;
mod buoyancy;
mod classify;
mod config;
mod error;
mod indexes;
mod interpolation;
mod keys;
mod parcel;
mod parcel_profile;
mod pipeline;
mod sounding;
mod source;
mod station;
mod utility;
