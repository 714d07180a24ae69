//! Inputs for rendering a result set as a table or a map.
//!
//! Nothing here draws anything. These are the rows, markers, and legend entries a table or map
//! front end needs.
use crate::{
    aggregate::{Exclusion, ResultSet, StabilityRecord},
    analysis::Diagnostics,
    classify::StabilityCategory,
    keys::DiagnosticIndex,
};
use chrono::NaiveDateTime;
use metfor::Quantity;
use std::fmt::{self, Display, Write};
use strum::IntoEnumIterator;

/// Zoom level for a map showing the whole network.
pub const DEFAULT_ZOOM: u8 = 5;

// The diagnostics shown in tables and popups, in display order.
const DISPLAYED: [DiagnosticIndex; 4] = [
    DiagnosticIndex::CAPE,
    DiagnosticIndex::K,
    DiagnosticIndex::LI,
    DiagnosticIndex::SI,
];

/// One row of the results table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Station code.
    pub station: String,
    /// Station name.
    pub name: String,
    /// Valid time.
    pub time: NaiveDateTime,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// CAPE in J/kg.
    pub cape: f64,
    /// K-Index
    pub k_index: Option<f64>,
    /// Lifted index
    pub lifted_index: Option<f64>,
    /// Showalter index
    pub showalter_index: Option<f64>,
    /// Assigned category.
    pub category: StabilityCategory,
}

impl From<&StabilityRecord> for TableRow {
    fn from(rec: &StabilityRecord) -> Self {
        TableRow {
            station: rec.station.code.clone(),
            name: rec.station.name.clone(),
            time: rec.time,
            latitude: rec.latitude,
            longitude: rec.longitude,
            cape: rec.diagnostics.cape().unpack(),
            k_index: rec.diagnostics.k_index(),
            lifted_index: rec.diagnostics.lifted_index(),
            showalter_index: rec.diagnostics.showalter_index(),
            category: rec.category,
        }
    }
}

/// The results as a table, one row per classified station in station code order.
///
/// Displays as plain text with the excluded stations listed after the table.
#[derive(Debug, Clone)]
pub struct Table {
    rows: Vec<TableRow>,
    excluded: Vec<(String, String)>,
}

impl Table {
    /// The rows of the table.
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }
}

/// Build the table for a result set.
pub fn table(results: &ResultSet) -> Table {
    let rows = results.records().map(TableRow::from).collect();
    let excluded = results
        .excluded()
        .map(|(stn, why)| {
            let reason = match why {
                Exclusion::NoGeolocation(diag) => {
                    format!("{} ({})", why.error(), summarize(diag, ", "))
                }
                Exclusion::Failed(err) => err.to_string(),
            };
            (stn.code.clone(), reason)
        })
        .collect();

    Table { rows, excluded }
}

fn format_value(val: Option<f64>, precision: usize) -> String {
    match val {
        Some(val) => format!("{:.*}", precision, val),
        None => "-".to_owned(),
    }
}

fn summarize(diag: &Diagnostics, sep: &str) -> String {
    DISPLAYED
        .iter()
        .map(|&idx| match diag.get(idx) {
            Some(val) => format!(
                "{}: {:.*} {}",
                idx.label(),
                idx.precision(),
                val,
                idx.units()
            ),
            None => format!("{}: -", idx.label()),
        })
        .collect::<Vec<_>>()
        .join(sep)
}

impl Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{:<6} {:<16} {:>8} {:>8} {:>6} {:>5} {:>6} {:>6}  {}",
            "Code", "Time", "Lat", "Lon", "CAPE", "KI", "LI", "SI", "Category"
        )?;

        for row in &self.rows {
            writeln!(
                f,
                "{:<6} {:<16} {:>8.2} {:>8.2} {:>6.0} {:>5} {:>6} {:>6}  {}",
                row.station,
                row.time.format("%Y-%m-%d %H:%M"),
                row.latitude,
                row.longitude,
                row.cape,
                format_value(row.k_index, DiagnosticIndex::K.precision()),
                format_value(row.lifted_index, DiagnosticIndex::LI.precision()),
                format_value(row.showalter_index, DiagnosticIndex::SI.precision()),
                row.category
            )?;
        }

        if !self.excluded.is_empty() {
            writeln!(f)?;
            writeln!(f, "Excluded:")?;
            for (code, reason) in &self.excluded {
                writeln!(f, "{:<6} {}", code, reason)?;
            }
        }

        Ok(())
    }
}

/// A color coded marker for one station.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Assigned category.
    pub category: StabilityCategory,
    /// Fill color for the marker.
    pub color: &'static str,
    /// Text shown when the marker is selected.
    pub popup: String,
    /// The diagnostics behind the category.
    pub diagnostics: Diagnostics,
}

impl From<&StabilityRecord> for MapMarker {
    fn from(rec: &StabilityRecord) -> Self {
        let mut popup = String::new();
        // Writing to a String can't fail.
        let _ = write!(
            popup,
            "{} ({})\n{}\n{}",
            rec.station.name,
            rec.station.code,
            rec.category,
            summarize(&rec.diagnostics, "\n")
        );

        MapMarker {
            latitude: rec.latitude,
            longitude: rec.longitude,
            category: rec.category,
            color: rec.category.color(),
            popup,
            diagnostics: rec.diagnostics,
        }
    }
}

/// One marker per classified station.
pub fn map_markers(results: &ResultSet) -> Vec<MapMarker> {
    results.records().map(MapMarker::from).collect()
}

/// An entry in the map legend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendEntry {
    /// The category.
    pub category: StabilityCategory,
    /// Its color.
    pub color: &'static str,
    /// Its label.
    pub label: &'static str,
}

/// Legend entries from stable to strongly unstable.
pub fn legend() -> Vec<LegendEntry> {
    StabilityCategory::iter()
        .map(|category| LegendEntry {
            category,
            color: category.color(),
            label: category.as_str(),
        })
        .collect()
}

/// Where to center a map of the results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    /// Mean latitude of the records.
    pub latitude: f64,
    /// Mean longitude of the records.
    pub longitude: f64,
    /// Zoom level.
    pub zoom: u8,
}

/// Center the map on the mean location of the records, `None` if there are no records.
pub fn map_view(results: &ResultSet) -> Option<MapView> {
    if results.is_empty() {
        return None;
    }

    let (lat_sum, lon_sum) = results
        .records()
        .fold((0.0, 0.0), |(lat, lon), rec| {
            (lat + rec.latitude, lon + rec.longitude)
        });
    let n = results.len() as f64;

    Some(MapView {
        latitude: lat_sum / n,
        longitude: lon_sum / n,
        zoom: DEFAULT_ZOOM,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        aggregate::{aggregate, StationOutcome},
        error::AnalysisError,
        station::Station,
        utility::test_tools::approx_equal,
    };
    use chrono::NaiveDate;
    use metfor::JpKg;

    fn results() -> ResultSet {
        let time = NaiveDate::from_ymd_opt(2023, 10, 16)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        let strong = Diagnostics::new(JpKg(3000.0), JpKg(0.0))
            .with_index(DiagnosticIndex::K, 35.0)
            .with_index(DiagnosticIndex::LI, -6.0)
            .with_index(DiagnosticIndex::SI, -3.25);
        let stable = Diagnostics::new(JpKg(0.0), JpKg(-250.0))
            .with_index(DiagnosticIndex::K, -2.0)
            .with_index(DiagnosticIndex::LI, 21.7);

        let outcomes = vec![
            StationOutcome::Analyzed {
                station: Station::new("WIII", "Jakarta").with_lat_lon((-6.0, 106.0)),
                valid_time: None,
                reported_location: None,
                diagnostics: strong,
            },
            StationOutcome::Analyzed {
                station: Station::new("WAAA", "Makassar").with_lat_lon((-4.0, 120.0)),
                valid_time: None,
                reported_location: None,
                diagnostics: stable,
            },
            StationOutcome::Analyzed {
                station: Station::new("WION", "Ranai"),
                valid_time: None,
                reported_location: None,
                diagnostics: stable,
            },
            StationOutcome::Failed {
                station: Station::new("WIMM", "Medan"),
                error: AnalysisError::ProfileUnavailable,
            },
        ];

        aggregate(time, outcomes)
    }

    #[test]
    fn test_table() {
        let tbl = table(&results());

        assert_eq!(tbl.rows().len(), 2);
        assert_eq!(tbl.rows()[0].station, "WAAA");
        assert_eq!(tbl.rows()[0].showalter_index, None);
        assert_eq!(tbl.rows()[1].k_index, Some(35.0));

        let text = tbl.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("Code"));
        assert!(lines[1].starts_with("WAAA"));
        assert!(lines[1].ends_with("Stable"));
        assert!(lines[2].starts_with("WIII"));
        assert!(lines[2].contains("-3.2") || lines[2].contains("-3.3"));
        assert!(lines[2].ends_with("Strongly Unstable"));
        assert!(text.contains("Excluded:"));
        assert!(text.contains("WION   station has no geolocation (CAPE: 0"));
        assert!(text.contains("WIMM   no profile available"));
    }

    #[test]
    fn test_markers() {
        let markers = map_markers(&results());
        assert_eq!(markers.len(), 2);

        let jkt = &markers[1];
        assert_eq!(jkt.color, "red");
        assert_eq!(jkt.category, StabilityCategory::StronglyUnstable);
        assert_eq!((jkt.latitude, jkt.longitude), (-6.0, 106.0));
        assert!(jkt.popup.starts_with("Jakarta (WIII)\nStrongly Unstable"));
        assert!(jkt.popup.contains("CAPE: 3000"));
        assert!(jkt.popup.contains("KI: 35"));
        assert!(jkt.popup.contains("LI: -6.0"));
        assert!(jkt.popup.contains("CAPE: 3000 J/kg\n"));
        assert!(jkt.popup.contains("LI: -6.0 \u{00B0}C"));

        assert_eq!(markers[0].color, "green");
        assert!(markers[0].popup.contains("SI: -"));
    }

    #[test]
    fn test_legend() {
        let entries = legend();
        let colors: Vec<_> = entries.iter().map(|e| e.color).collect();
        assert_eq!(colors, vec!["green", "yellow", "orange", "red"]);
        assert_eq!(entries[0].label, "Stable");
        assert_eq!(entries[3].category, StabilityCategory::StronglyUnstable);
    }

    #[test]
    fn test_map_view() {
        let view = map_view(&results()).unwrap();
        assert!(approx_equal(view.latitude, -5.0, 1.0e-9));
        assert!(approx_equal(view.longitude, 113.0, 1.0e-9));
        assert_eq!(view.zoom, 5);

        let time = NaiveDate::from_ymd_opt(2023, 10, 16)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(map_view(&ResultSet::new(time)).is_none());
    }
}
