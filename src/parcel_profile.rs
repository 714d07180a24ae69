//! Create a profile by lifting a parcel through a sounding.
use crate::{
    error::{AnalysisError, Result},
    parcel::{surface_parcel, Parcel},
    sounding::Sounding,
};
use metfor::{Celsius, HectoPascal};

use self::lift::Ascent;

/// The lifted parcel's state at every pressure level of the sounding it was lifted through.
///
/// The vectors are parallel to the sounding levels, bottom up.
#[derive(Debug, Clone)]
pub struct ParcelProfile {
    /// Pressure profile
    pub pressure: Vec<HectoPascal>,
    /// Parcel dry bulb temperature profile
    pub parcel_t: Vec<Celsius>,
    /// Parcel dew point profile, equal to the temperature above the LCL.
    pub parcel_dew_point: Vec<Celsius>,

    ascent: Ascent,
}

pub(crate) mod lift;

impl ParcelProfile {
    /// The parcel that was lifted.
    #[inline]
    pub fn parcel(&self) -> Parcel {
        self.ascent.parcel()
    }

    /// Pressure at the lifting condensation level.
    #[inline]
    pub fn lcl_pressure(&self) -> HectoPascal {
        self.ascent.lcl_pressure()
    }

    /// Temperature at the lifting condensation level.
    #[inline]
    pub fn lcl_temperature(&self) -> Celsius {
        self.ascent.lcl_temperature()
    }

    /// Parcel temperature at any pressure above the parcel's starting level, not just the
    /// sounding levels.
    pub fn temperature_at(&self, pressure: HectoPascal) -> Result<Celsius> {
        if pressure > self.parcel().pressure {
            return Err(AnalysisError::InvalidInput);
        }

        self.ascent.state_at(pressure).map(|(t, _)| t)
    }

    /// Number of levels in the profile.
    #[inline]
    pub fn len(&self) -> usize {
        self.pressure.len()
    }

    /// True if the profile has no levels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pressure.is_empty()
    }
}

/// Lift the lowest level of the sounding through every level of the sounding.
///
/// The sounding is validated first, a malformed sounding is reported as a `MalformedProfile`.
pub fn parcel_profile(snd: &Sounding) -> Result<ParcelProfile> {
    snd.validate()?;

    let parcel = surface_parcel(snd)?;
    lift_parcel(parcel, snd)
}

/// Lift a parcel through the levels of a sounding at and above the parcel's starting pressure.
pub fn lift_parcel(parcel: Parcel, snd: &Sounding) -> Result<ParcelProfile> {
    let ascent = Ascent::new(parcel)?;

    let pressure: Vec<HectoPascal> = snd
        .pressure_profile()
        .iter()
        .filter_map(|p| p.into_option())
        .filter(|&p| p <= parcel.pressure)
        .collect();

    if pressure.is_empty() {
        return Err(AnalysisError::NotEnoughData);
    }

    let (parcel_t, parcel_dew_point): (Vec<Celsius>, Vec<Celsius>) =
        ascent.trace(pressure.iter().cloned())?.into_iter().unzip();

    Ok(ParcelProfile {
        pressure,
        parcel_t,
        parcel_dew_point,
        ascent,
    })
}

/// Temperature of a parcel lifted to `target` without building a whole profile.
///
/// # Examples
///
/// ```rust
/// use metfor::{Celsius, HectoPascal};
/// use sounding_stability::{lifted_temperature, Parcel};
///
/// let pcl = Parcel {
///     pressure: HectoPascal(850.0),
///     temperature: Celsius(15.0),
///     dew_point: Celsius(10.0),
/// };
///
/// let t500 = lifted_temperature(pcl, HectoPascal(500.0)).unwrap();
/// assert!(t500 < Celsius(-5.0) && t500 > Celsius(-20.0));
/// ```
pub fn lifted_temperature(parcel: Parcel, target: HectoPascal) -> Result<Celsius> {
    if target > parcel.pressure {
        return Err(AnalysisError::InvalidInput);
    }

    Ascent::new(parcel)?.state_at(target).map(|(t, _)| t)
}
