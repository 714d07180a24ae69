//! Functions for selecting the parcels used in the stability analysis.
use crate::{
    error::{AnalysisError, Result},
    interpolation::linear_interpolate_sounding,
    sounding::Sounding,
};
use metfor::{self, Celsius, HectoPascal, Kelvin};

/// Variables defining a parcel as used in parcel analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parcel {
    /// Temperature in C
    pub temperature: Celsius,
    /// Pressure in hPa
    pub pressure: HectoPascal,
    /// Dew point in C
    pub dew_point: Celsius,
}

impl Parcel {
    /// Get the potential temperature of the parcel
    #[inline]
    pub fn theta(&self) -> Kelvin {
        metfor::potential_temperature(self.pressure, self.temperature)
    }

    /// Get the mixing ratio of the parcel.
    #[inline]
    pub fn mixing_ratio(&self) -> Result<f64> {
        metfor::mixing_ratio(self.dew_point, self.pressure).ok_or(AnalysisError::InvalidInput)
    }

    /// The virtual temperature of the parcel.
    #[inline]
    pub fn virtual_temperature(&self) -> Result<Kelvin> {
        metfor::virtual_temperature(self.temperature, self.dew_point, self.pressure)
            .ok_or(AnalysisError::InvalidInput)
    }
}

/// Get a surface parcel, the lowest level of the sounding.
pub fn surface_parcel(snd: &Sounding) -> Result<Parcel> {
    let row = snd
        .surface_as_data_row()
        .ok_or(AnalysisError::NotEnoughData)?;

    row.pressure
        .into_option()
        .and_then(|pressure| {
            row.temperature.into_option().and_then(|temperature| {
                row.dew_point.into_option().map(|dew_point| Parcel {
                    temperature,
                    pressure,
                    dew_point,
                })
            })
        })
        .ok_or(AnalysisError::MissingValue)
}

/// Get the parcel with the environmental temperature and dew point at a given pressure level.
///
/// This is used for the 850 hPa parcel of the Showalter index. A level the sounding does not span
/// is reported as a `MissingStandardLevel`.
pub fn pressure_parcel(snd: &Sounding, pressure: HectoPascal) -> Result<Parcel> {
    let row = linear_interpolate_sounding(snd, pressure)
        .map_err(|_| AnalysisError::MissingStandardLevel(pressure))?;

    let temperature = row
        .temperature
        .into_option()
        .ok_or(AnalysisError::MissingStandardLevel(pressure))?;
    let dew_point = row
        .dew_point
        .into_option()
        .ok_or(AnalysisError::MissingStandardLevel(pressure))?;

    Ok(Parcel {
        temperature,
        pressure,
        dew_point,
    })
}
