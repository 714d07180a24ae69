//! Station reference data.
//!
//! Stations are identified by their ICAO code. The table is static reference data: it is loaded
//! once, validated once, and never modified while a run is in progress.
use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::HashSet;

/// An upper air observing station.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Station {
    /// ICAO identifier, eg WIII.
    pub code: String,
    /// Human readable name.
    pub name: String,
    /// Latitude in degrees north.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude in degrees east.
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Station {
    /// Create a station with no known location.
    pub fn new<C: Into<String>, N: Into<String>>(code: C, name: N) -> Self {
        Station {
            code: code.into(),
            name: name.into(),
            latitude: None,
            longitude: None,
        }
    }

    /// Builder method to add a location.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sounding_stability::Station;
    ///
    /// let stn = Station::new("WIII", "Jakarta").with_lat_lon((-6.12, 106.65));
    /// assert_eq!(stn.location(), Some((-6.12, 106.65)));
    ///
    /// let stn = stn.with_lat_lon(None);
    /// assert!(stn.location().is_none());
    /// ```
    pub fn with_lat_lon<T>(mut self, coords: T) -> Self
    where
        Option<(f64, f64)>: From<T>,
    {
        let coords: Option<(f64, f64)> = Option::from(coords);
        self.latitude = coords.map(|(lat, _)| lat);
        self.longitude = coords.map(|(_, lon)| lon);
        self
    }

    /// Latitude and longitude, only if both are known.
    #[inline]
    pub fn location(&self) -> Option<(f64, f64)> {
        self.latitude
            .and_then(|lat| self.longitude.map(|lon| (lat, lon)))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.code.trim().is_empty() {
            return Err(ConfigError::InvalidStation(format!(
                "station '{}' has an empty code",
                self.name
            )));
        }

        if let Some(lat) = self.latitude {
            if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
                return Err(ConfigError::InvalidStation(format!(
                    "{}: latitude {} out of range",
                    self.code, lat
                )));
            }
        }

        if let Some(lon) = self.longitude {
            if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
                return Err(ConfigError::InvalidStation(format!(
                    "{}: longitude {} out of range",
                    self.code, lon
                )));
            }
        }

        Ok(())
    }
}

/// The validated list of stations processed in a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationTable {
    stations: Vec<Station>,
}

impl StationTable {
    /// Build a table, checking for empty or duplicate codes and out of range coordinates.
    pub fn new(stations: Vec<Station>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::with_capacity(stations.len());
        for stn in &stations {
            stn.validate()?;
            if !seen.insert(stn.code.as_str()) {
                return Err(ConfigError::InvalidStation(format!(
                    "duplicate station code {}",
                    stn.code
                )));
            }
        }

        Ok(StationTable { stations })
    }

    /// The stations in configuration order.
    #[inline]
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Look up a station by code.
    pub fn get(&self, code: &str) -> Option<&Station> {
        self.stations.iter().find(|stn| stn.code == code)
    }

    /// Number of stations in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// True if there are no stations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// The Indonesian radiosonde network.
    ///
    /// Locations are left empty, they are taken from the location reported with each sounding.
    pub fn indonesia() -> Self {
        let stations = INDONESIA
            .iter()
            .map(|&(code, name)| Station::new(code, name))
            .collect();

        StationTable { stations }
    }
}

const INDONESIA: &[(&str, &str)] = &[
    ("WITT", "Aceh"),
    ("WIMM", "Medan"),
    ("WIMG", "Padang"),
    ("WIBB", "Pekanbaru"),
    ("WION", "Ranai"),
    ("WIKK", "Pangkal Pinang"),
    ("WIPL", "Bengkulu"),
    ("WIII", "Jakarta"),
    ("WIIL", "Cilacap"),
    ("WRSJ", "Surabaya"),
    ("WRRR", "Denpasar"),
    ("WRLR", "Tarakan"),
    ("WRBB", "Banjarmasin"),
    ("WRLL", "Balikpapan"),
    ("WIOO", "Pontianak"),
    ("WRBI", "Pangkalan Bun"),
    ("WAAA", "Makassar"),
    ("WAML", "Palu"),
    ("WAMM", "Manado"),
    ("WRKC", "Maumere"),
    ("WRKK", "Kupang"),
    ("WAMT", "Ternate"),
    ("WAPP", "Ambon"),
    ("WAPI", "Saumlaki"),
    ("WABB", "Biak"),
    ("WASS", "Sorong"),
    ("WAJJ", "Jayapura"),
    ("WAJW", "Wamena"),
    ("WAKK", "Merauke"),
];
