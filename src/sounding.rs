//! Data type and methods to store an atmospheric sounding.

use crate::{
    error::{AnalysisError, Result},
    station::Station,
};
use chrono::NaiveDateTime;
use metfor::{Celsius, HectoPascal, Knots, Meters, WindSpdDir};
use optional::Optioned;

pub use self::data_row::DataRow;

/// All the variables stored in the sounding.
///
/// The upper air profile variables are stored in parallel vectors, ordered from the lowest level
/// (the surface) upward. If a profile lacks a certain variable, e.g. wind, that whole vector has
/// length 0 instead of being full of missing values.
#[derive(Clone, Debug, Default)]
pub struct Sounding {
    // Description of the source of the sounding.
    source: Option<String>,

    // Station as reported by the data provider, may carry a location.
    station: Option<Station>,

    // Valid time of sounding
    valid_time: Option<NaiveDateTime>,

    // Profiles
    pressure: Vec<Optioned<HectoPascal>>,
    height: Vec<Optioned<Meters>>,
    temperature: Vec<Optioned<Celsius>>,
    dew_point: Vec<Optioned<Celsius>>,
    wind: Vec<Optioned<WindSpdDir<Knots>>>,
}

macro_rules! make_profile_setter {
    ($(#[$attr:meta])* => $name:tt, $inner_type:ty, $p_var:ident) => {
        $(#[$attr])*
        pub fn $name(self, profile: Vec<Optioned<$inner_type>>) -> Self {
            Self {$p_var: profile, ..self}
        }
    };
}

impl Sounding {
    /// Create a new sounding with default values. This is a proxy for default with a clearer name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sounding_stability::Sounding;
    ///
    /// let snd = Sounding::new();
    /// assert!(snd.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Sounding::default()
    }

    /// Add a source description to this sounding.
    #[inline]
    pub fn with_source_description<S>(mut self, desc: S) -> Self
    where
        Option<String>: From<S>,
    {
        self.source = Option::from(desc);
        self
    }

    /// Retrieve a source description for this sounding.
    #[inline]
    pub fn source_description(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Builder function for the station as reported along with the data.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sounding_stability::{Sounding, Station};
    ///
    /// let stn = Station::new("WIII", "Jakarta").with_lat_lon((-6.12, 106.65));
    /// let snd = Sounding::new().with_station(stn);
    /// assert_eq!(snd.station().unwrap().code, "WIII");
    /// ```
    #[inline]
    pub fn with_station<T>(mut self, station: T) -> Self
    where
        Option<Station>: From<T>,
    {
        self.station = Option::from(station);
        self
    }

    /// The station as reported along with the data.
    #[inline]
    pub fn station(&self) -> Option<&Station> {
        self.station.as_ref()
    }

    /// Latitude and longitude reported along with the data.
    #[inline]
    pub fn reported_location(&self) -> Option<(f64, f64)> {
        self.station.as_ref().and_then(Station::location)
    }

    /// Builder method to set the valid time of the sounding.
    ///
    /// # Examples
    /// ```rust
    /// use sounding_stability::Sounding;
    /// use chrono::NaiveDate;
    ///
    /// let vtime = NaiveDate::from_ymd_opt(2023, 10, 16).unwrap().and_hms_opt(0, 0, 0).unwrap();
    /// let _snd = Sounding::new().with_valid_time(vtime);
    /// let _snd = Sounding::new().with_valid_time(Some(vtime));
    /// ```
    #[inline]
    pub fn with_valid_time<T>(mut self, valid_time: T) -> Self
    where
        Option<NaiveDateTime>: From<T>,
    {
        self.valid_time = Option::from(valid_time);
        self
    }

    /// Valid time of the sounding.
    #[inline]
    pub fn valid_time(&self) -> Option<NaiveDateTime> {
        self.valid_time
    }

    make_profile_setter!(
        /// Builder method for the pressure profile.
        ///
        /// # Examples
        /// ```rust
        /// use sounding_stability::Sounding;
        /// use metfor::HectoPascal;
        /// use optional::{some, Optioned};
        ///
        /// let data = vec![1000.0, 925.0, 850.0, 700.0, 500.0, 300.0, 250.0, 200.0];
        /// let pressure_data: Vec<Optioned<HectoPascal>> = data.into_iter()
        ///     .map(HectoPascal)
        ///     .map(some)
        ///     .collect();
        ///
        /// let snd = Sounding::new().with_pressure_profile(pressure_data);
        /// assert_eq!(snd.len(), 8);
        /// ```
        #[inline]
        => with_pressure_profile, HectoPascal, pressure
    );

    /// Get the pressure profile
    #[inline]
    pub fn pressure_profile(&self) -> &[Optioned<HectoPascal>] {
        &self.pressure
    }

    make_profile_setter!(
        /// Builder method for the geopotential height profile.
        #[inline]
        => with_height_profile, Meters, height
    );

    /// Get the geopotential height profile.
    #[inline]
    pub fn height_profile(&self) -> &[Optioned<Meters>] {
        &self.height
    }

    make_profile_setter!(
        /// Builder method for the temperature profile.
        #[inline]
        => with_temperature_profile, Celsius, temperature
    );

    /// Get the temperature profile.
    #[inline]
    pub fn temperature_profile(&self) -> &[Optioned<Celsius>] {
        &self.temperature
    }

    make_profile_setter!(
        /// Builder method for the dew point profile.
        #[inline]
        => with_dew_point_profile, Celsius, dew_point
    );

    /// Get the dew point profile.
    #[inline]
    pub fn dew_point_profile(&self) -> &[Optioned<Celsius>] {
        &self.dew_point
    }

    make_profile_setter!(
        /// Builder method for the wind profile.
        #[inline]
        => with_wind_profile, WindSpdDir<Knots>, wind
    );

    /// Get the wind profile.
    #[inline]
    pub fn wind_profile(&self) -> &[Optioned<WindSpdDir<Knots>>] {
        &self.wind
    }

    /// Number of levels in the sounding.
    #[inline]
    pub fn len(&self) -> usize {
        self.pressure.len()
    }

    /// True if there are no levels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pressure.is_empty()
    }

    /// Get a bottom up iterator over the data rows. The first value returned from the iterator is
    /// the lowest level.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use metfor::{HectoPascal, Celsius};
    /// use optional::some;
    /// use sounding_stability::Sounding;
    ///
    /// let pres: Vec<_> = vec![1000.0, 925.0, 850.0].into_iter()
    ///     .map(HectoPascal).map(some).collect();
    /// let temps: Vec<_> = vec![20.0, 18.0, 17.0].into_iter()
    ///     .map(Celsius).map(some).collect();
    ///
    /// let snd = Sounding::new()
    ///     .with_pressure_profile(pres)
    ///     .with_temperature_profile(temps);
    ///
    /// let mut iter = snd.bottom_up();
    ///
    /// let row = iter.next().unwrap();
    /// assert_eq!(row.pressure.unwrap(), HectoPascal(1000.0));
    /// assert_eq!(row.temperature.unwrap(), Celsius(20.0));
    /// assert!(row.wind.is_none()); // We never set wind profile.
    ///
    /// assert_eq!(iter.count(), 2);
    /// ```
    #[inline]
    pub fn bottom_up<'a>(&'a self) -> impl Iterator<Item = DataRow> + 'a {
        (0..self.len()).filter_map(move |idx| self.data_row(idx))
    }

    /// Get a row of data values from this sounding.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use metfor::{HectoPascal, Celsius};
    /// use sounding_stability::Sounding;
    /// # use sounding_stability::doctest::make_test_sounding;
    ///
    /// let snd = make_test_sounding();
    ///
    /// let row = snd.data_row(0).unwrap(); // This is the surface
    /// assert_eq!(row.pressure.unwrap(), HectoPascal(1000.0));
    /// assert_eq!(row.temperature.unwrap(), Celsius(28.0));
    ///
    /// assert!(snd.data_row(4).is_none()); // There weren't that many rows!
    /// ```
    #[inline]
    pub fn data_row(&self, idx: usize) -> Option<DataRow> {
        macro_rules! copy_to_result {
            ($result:ident, $profile:ident, $idx:ident) => {
                match self.$profile.get($idx) {
                    None => {}
                    Some(opt_val) => $result.$profile = *opt_val,
                }
            };
        }

        if idx >= self.pressure.len() {
            return None;
        }

        let mut result = DataRow::default();

        copy_to_result!(result, pressure, idx);
        copy_to_result!(result, height, idx);
        copy_to_result!(result, temperature, idx);
        copy_to_result!(result, dew_point, idx);
        copy_to_result!(result, wind, idx);

        Some(result)
    }

    /// Get the lowest level values in a `DataRow` format.
    #[inline]
    pub fn surface_as_data_row(&self) -> Option<DataRow> {
        self.data_row(0)
    }

    /// Check that this sounding can be analyzed.
    ///
    /// There must be at least two levels, every level must have a pressure and pressure must
    /// strictly decrease upward. Heights, where present, may not decrease. Dew points may not
    /// exceed temperatures, and the lowest level must have both a temperature and a dew point.
    pub fn validate(&self) -> Result<()> {
        use AnalysisError::MalformedProfile;

        if self.len() < 2 {
            return Err(MalformedProfile(format!(
                "{} levels, at least 2 required",
                self.len()
            )));
        }

        let n = self.len();
        if self.temperature.len() != n || self.dew_point.len() != n {
            return Err(MalformedProfile(
                "temperature and dew point profiles must match pressure".to_owned(),
            ));
        }
        if (!self.height.is_empty() && self.height.len() != n)
            || (!self.wind.is_empty() && self.wind.len() != n)
        {
            return Err(MalformedProfile("profile lengths differ".to_owned()));
        }

        let mut last_p: Option<HectoPascal> = None;
        let mut last_h: Option<Meters> = None;
        for row in self.bottom_up() {
            let p = row
                .pressure
                .into_option()
                .ok_or_else(|| MalformedProfile("level without pressure".to_owned()))?;

            if let Some(below) = last_p {
                if p >= below {
                    return Err(MalformedProfile(format!(
                        "pressure not decreasing at {:?}",
                        p
                    )));
                }
            }
            last_p = Some(p);

            if let Some(h) = row.height.into_option() {
                if let Some(below) = last_h {
                    if h < below {
                        return Err(MalformedProfile(format!(
                            "height decreases at {:?}",
                            p
                        )));
                    }
                }
                last_h = Some(h);
            }

            if let (Some(t), Some(dp)) =
                (row.temperature.into_option(), row.dew_point.into_option())
            {
                if dp > t {
                    return Err(MalformedProfile(format!(
                        "dew point above temperature at {:?}",
                        p
                    )));
                }
            }
        }

        let sfc = self.surface_as_data_row().ok_or(AnalysisError::NotEnoughData)?;
        if sfc.temperature.is_none() || sfc.dew_point.is_none() {
            return Err(MalformedProfile(
                "lowest level lacks temperature or dew point".to_owned(),
            ));
        }

        Ok(())
    }
}

// FIXME: only configure for test and doc tests, not possible as of 1.41
#[doc(hidden)]
pub mod doctest {
    use super::*;

    /// The four level sounding 1000/850/700/500 hPa used in examples.
    pub fn make_test_sounding() -> super::Sounding {
        use optional::some;

        let p = vec![1000.0, 850.0, 700.0, 500.0];
        let h = vec![110.0, 1500.0, 3150.0, 5850.0];
        let t = vec![28.0, 15.0, 5.0, -20.0];
        let dp = vec![24.0, 10.0, -5.0, -30.0];

        Sounding::new()
            .with_pressure_profile(p.into_iter().map(HectoPascal).map(some).collect())
            .with_height_profile(h.into_iter().map(Meters).map(some).collect())
            .with_temperature_profile(t.into_iter().map(Celsius).map(some).collect())
            .with_dew_point_profile(dp.into_iter().map(Celsius).map(some).collect())
    }
}


mod data_row;
