//! Stability indexes computed from the environment at standard pressure levels.
//!
//! Values at 850, 700, and 500 hPa are interpolated linearly in pressure. A sounding that doesn't
//! span one of these levels, or lacks a value there, yields a `MissingStandardLevel` error for any
//! index that needs it.

use crate::{
    error::{AnalysisError, Result},
    interpolation::linear_interpolate_sounding,
    parcel::pressure_parcel,
    parcel_profile::{lifted_temperature, ParcelProfile},
    sounding::Sounding,
    utility::round_to,
};
use metfor::{Celsius, HectoPascal};

const P850: HectoPascal = HectoPascal(850.0);
const P700: HectoPascal = HectoPascal(700.0);
const P500: HectoPascal = HectoPascal(500.0);

// Environmental temperature and dew point at a standard level.
fn standard_level(snd: &Sounding, p: HectoPascal) -> Result<(Celsius, Option<Celsius>)> {
    let row =
        linear_interpolate_sounding(snd, p).map_err(|_| AnalysisError::MissingStandardLevel(p))?;

    let t = row
        .temperature
        .into_option()
        .ok_or(AnalysisError::MissingStandardLevel(p))?;

    Ok((t, row.dew_point.into_option()))
}

fn standard_temperature(snd: &Sounding, p: HectoPascal) -> Result<Celsius> {
    standard_level(snd, p).map(|(t, _)| t)
}

fn standard_dew_point(snd: &Sounding, p: HectoPascal) -> Result<(Celsius, Celsius)> {
    let (t, dp) = standard_level(snd, p)?;
    let dp = dp.ok_or(AnalysisError::MissingStandardLevel(p))?;

    Ok((t, dp))
}

/// The K-Index, rounded to a whole degree.
///
/// `K = (T850 - T500) + Td850 - (T700 - Td700)`
///
/// # Examples
///
/// ```rust
/// use sounding_stability::kindex;
/// # use sounding_stability::doctest::make_test_sounding;
///
/// let snd = make_test_sounding();
/// assert_eq!(kindex(&snd).unwrap(), 35.0);
/// ```
pub fn kindex(snd: &Sounding) -> Result<f64> {
    let (Celsius(t850), Celsius(dp850)) = standard_dew_point(snd, P850)?;
    let (Celsius(t700), Celsius(dp700)) = standard_dew_point(snd, P700)?;
    let Celsius(t500) = standard_temperature(snd, P500)?;

    Ok(round_to(t850 - t500 + dp850 - (t700 - dp700), 0))
}

/// The Lifted Index of the surface parcel, to one decimal place.
///
/// The difference between the environmental temperature at 500 hPa and the temperature of the
/// parcel lifted there, so negative values mean a buoyant parcel.
pub fn lifted_index(snd: &Sounding, profile: &ParcelProfile) -> Result<f64> {
    let Celsius(env_t) = standard_temperature(snd, P500)?;
    let Celsius(pcl_t) = profile
        .temperature_at(P500)
        .map_err(|_| AnalysisError::MissingStandardLevel(P500))?;

    Ok(round_to(env_t - pcl_t, 1))
}

/// The Showalter Index, to one decimal place.
///
/// Like the lifted index, but the parcel starts with the environmental temperature and dew point
/// at 850 hPa.
pub fn showalter_index(snd: &Sounding) -> Result<f64> {
    let parcel = pressure_parcel(snd, P850)?;
    let Celsius(env_t) = standard_temperature(snd, P500)?;
    let Celsius(pcl_t) = lifted_temperature(parcel, P500)?;

    Ok(round_to(env_t - pcl_t, 1))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{parcel_profile::parcel_profile, sounding::doctest::make_test_sounding};
    use crate::utility::test_tools::approx_equal;
    use optional::{none, some};

    #[test]
    fn test_kindex() {
        let snd = make_test_sounding();

        // (15 - -20) + 10 - (5 - -5)
        assert_eq!(kindex(&snd).unwrap(), 35.0);
    }

    #[test]
    fn test_kindex_interpolated() {
        // 850 hPa sits halfway between 900 and 800 hPa.
        let snd = make_test_sounding()
            .with_pressure_profile(
                vec![1000.0, 900.0, 800.0, 700.0, 500.0]
                    .into_iter()
                    .map(HectoPascal)
                    .map(some)
                    .collect(),
            )
            .with_height_profile(vec![])
            .with_temperature_profile(
                vec![28.0, 18.0, 12.0, 5.0, -20.0]
                    .into_iter()
                    .map(Celsius)
                    .map(some)
                    .collect(),
            )
            .with_dew_point_profile(
                vec![24.0, 12.0, 8.0, -5.0, -30.0]
                    .into_iter()
                    .map(Celsius)
                    .map(some)
                    .collect(),
            );

        // (15 - -20) + 10 - (5 - -5)
        assert_eq!(kindex(&snd).unwrap(), 35.0);
    }

    #[test]
    fn test_lifted_index() {
        let snd = make_test_sounding();
        let profile = parcel_profile(&snd).unwrap();

        let li = lifted_index(&snd, &profile).unwrap();
        assert!(approx_equal(li, -19.9, 1.0), "{}", li);
        assert_eq!(li, round_to(li, 1));
    }

    #[test]
    fn test_showalter_index() {
        let snd = make_test_sounding();

        let si = showalter_index(&snd).unwrap();
        assert!(approx_equal(si, -8.3, 1.0), "{}", si);
        assert_eq!(si, round_to(si, 1));
    }

    #[test]
    fn test_missing_500() {
        let snd = make_test_sounding().with_temperature_profile(vec![
            some(Celsius(28.0)),
            some(Celsius(15.0)),
            some(Celsius(5.0)),
            none(),
        ]);
        let profile = parcel_profile(&snd).unwrap();

        let missing_500 = Err(AnalysisError::MissingStandardLevel(P500));
        assert_eq!(kindex(&snd), missing_500);
        assert_eq!(lifted_index(&snd, &profile), missing_500);
        assert_eq!(showalter_index(&snd), missing_500);
    }

    #[test]
    fn test_sounding_too_shallow() {
        // Tops out at 600 hPa.
        let snd = make_test_sounding().with_pressure_profile(vec![
            some(HectoPascal(1000.0)),
            some(HectoPascal(850.0)),
            some(HectoPascal(700.0)),
            some(HectoPascal(600.0)),
        ]);
        let profile = parcel_profile(&snd).unwrap();

        assert!(kindex(&snd).is_err());
        assert_eq!(
            lifted_index(&snd, &profile),
            Err(AnalysisError::MissingStandardLevel(P500))
        );
        assert!(showalter_index(&snd).is_err());

        // Bottoms out above 850 hPa.
        let snd = make_test_sounding().with_pressure_profile(vec![
            some(HectoPascal(840.0)),
            some(HectoPascal(800.0)),
            some(HectoPascal(700.0)),
            some(HectoPascal(500.0)),
        ]);
        assert_eq!(
            showalter_index(&snd),
            Err(AnalysisError::MissingStandardLevel(P850))
        );
        assert_eq!(
            kindex(&snd),
            Err(AnalysisError::MissingStandardLevel(P850))
        );
    }
}
