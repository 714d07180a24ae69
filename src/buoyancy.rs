//! Integrate the buoyancy of a lifted parcel to get CAPE and CIN.
use crate::{
    error::{AnalysisError, Result},
    parcel_profile::ParcelProfile,
    sounding::Sounding,
    utility::round_to,
};
use itertools::{izip, Itertools};
use metfor::{self, Celsius, HectoPascal, JpKg, Kelvin, Quantity};

// Gas constant for dry air, J/kg/K
const RD: f64 = 287.04749;

/// Results of integrating the buoyancy of a parcel profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuoyancyAnalysis {
    cape: JpKg,
    cin: JpKg,
    lfc_pressure: Option<HectoPascal>,
    el_pressure: Option<HectoPascal>,
}

impl BuoyancyAnalysis {
    /// Convective available potential energy, never negative.
    #[inline]
    pub fn cape(&self) -> JpKg {
        self.cape
    }

    /// Convective inhibition, never positive.
    #[inline]
    pub fn cin(&self) -> JpKg {
        self.cin
    }

    /// Level of free convection, if the parcel has one.
    #[inline]
    pub fn lfc_pressure(&self) -> Option<HectoPascal> {
        self.lfc_pressure
    }

    /// Equilibrium level, if the parcel has an LFC.
    #[inline]
    pub fn el_pressure(&self) -> Option<HectoPascal> {
        self.el_pressure
    }
}

// A level in the buoyancy profile, pressure in hPa, height in m, buoyancy is dimensionless.
#[derive(Debug, Clone, Copy)]
struct Level {
    p: f64,
    h: f64,
    b: f64,
}

/// Compute CAPE, CIN, LFC and EL for a parcel profile lifted through `snd`.
///
/// The profile must have been lifted through the same sounding, its levels line up with the top
/// levels of the sounding.
pub fn buoyancy_analysis(snd: &Sounding, profile: &ParcelProfile) -> Result<BuoyancyAnalysis> {
    let levels = buoyancy_profile(snd, profile)?;
    let levels = insert_level(levels, profile.lcl_pressure().unpack());
    let levels = insert_crossings(levels);

    let lcl_p = profile.lcl_pressure().unpack();
    let lfc = find_lfc(&levels, lcl_p);

    let (cape, cin, lfc_pressure, el_pressure) = match lfc {
        Some(lfc) => {
            let el = find_el(&levels, lfc);
            let cape = integrate(&levels[lfc..=el], |b| b.max(0.0));
            let cin = integrate(&levels[..=lfc], |b| b.min(0.0));

            (
                cape,
                cin,
                Some(HectoPascal(levels[lfc].p)),
                Some(HectoPascal(levels[el].p)),
            )
        }
        None => (0.0, integrate(&levels, |b| b.min(0.0)), None, None),
    };

    Ok(BuoyancyAnalysis {
        cape: JpKg(round_to(cape.max(0.0), 0)),
        cin: JpKg(round_to(cin.min(0.0), 0)),
        lfc_pressure,
        el_pressure,
    })
}

// Pair up the parcel and environment, computing buoyancy and filling in missing heights. Levels
// without an environmental temperature are skipped.
fn buoyancy_profile(snd: &Sounding, profile: &ParcelProfile) -> Result<Vec<Level>> {
    let offset = snd
        .len()
        .checked_sub(profile.len())
        .ok_or(AnalysisError::InvalidInput)?;

    let env_p = &snd.pressure_profile()[offset..];
    let env_t = &snd.temperature_profile()[offset..];
    let env_dp = &snd.dew_point_profile()[offset..];
    let hgt = snd.height_profile();

    let mut levels: Vec<Level> = Vec::with_capacity(profile.len() + 8);
    let mut prev_tv: Option<f64> = None;

    for (i, env_p, env_t, env_dp, &p, &pcl_t, &pcl_dp) in izip!(
        0..,
        env_p,
        env_t,
        env_dp,
        &profile.pressure,
        &profile.parcel_t,
        &profile.parcel_dew_point
    ) {
        debug_assert_eq!(env_p.into_option(), Some(p));

        let env_t = match env_t.into_option() {
            Some(t) => t,
            None => continue,
        };

        let env_tv = virtual_temperature(env_t, env_dp.into_option(), p).unpack();
        let pcl_tv = virtual_temperature(pcl_t, Some(pcl_dp), p).unpack();
        let b = (pcl_tv - env_tv) / env_tv;

        let h = match (hgt.get(offset + i).and_then(|h| h.into_option()), levels.last()) {
            (Some(h), _) => h.unpack(),
            (None, Some(below)) => {
                let mean_tv = (prev_tv.unwrap_or(env_tv) + env_tv) / 2.0;
                below.h + RD * mean_tv / -metfor::g * (below.p / p.unpack()).ln()
            }
            (None, None) => 0.0,
        };

        prev_tv = Some(env_tv);
        levels.push(Level {
            p: p.unpack(),
            h,
            b,
        });
    }

    if levels.len() < 2 {
        return Err(AnalysisError::NotEnoughData);
    }

    Ok(levels)
}

// Virtual temperature, falling back to the dry bulb temperature without moisture.
fn virtual_temperature(t: Celsius, dp: Option<Celsius>, p: HectoPascal) -> Kelvin {
    dp.and_then(|dp| metfor::virtual_temperature(t, dp, p))
        .unwrap_or_else(|| Kelvin::from(t))
}

// Linearly interpolate between two levels in pressure.
fn interp_level(below: Level, above: Level, p: f64) -> Level {
    let frac = (p - below.p) / (above.p - below.p);

    Level {
        p,
        h: below.h + frac * (above.h - below.h),
        b: below.b + frac * (above.b - below.b),
    }
}

// Insert a level at pressure `p` if it falls strictly between two levels.
fn insert_level(mut levels: Vec<Level>, p: f64) -> Vec<Level> {
    let idx = levels
        .iter()
        .tuple_windows::<(_, _)>()
        .position(|(below, above)| below.p > p && above.p < p);

    if let Some(idx) = idx {
        let new_level = interp_level(levels[idx], levels[idx + 1], p);
        levels.insert(idx + 1, new_level);
    }

    levels
}

// Insert a zero buoyancy level everywhere the parcel and environment cross.
fn insert_crossings(levels: Vec<Level>) -> Vec<Level> {
    let mut result = Vec::with_capacity(levels.len() + 8);

    if let Some(&first) = levels.first() {
        result.push(first);
    }

    for (&below, &above) in levels.iter().tuple_windows::<(_, _)>() {
        if (below.b < 0.0 && above.b > 0.0) || (below.b > 0.0 && above.b < 0.0) {
            let frac = below.b / (below.b - above.b);
            let p = below.p + frac * (above.p - below.p);
            let mut crossing = interp_level(below, above, p);
            crossing.b = 0.0;
            result.push(crossing);
        }
        result.push(above);
    }

    result
}

// The lowest level at or above the LCL where buoyancy is non-negative and positive above it.
fn find_lfc(levels: &[Level], lcl_p: f64) -> Option<usize> {
    levels
        .iter()
        .tuple_windows::<(_, _)>()
        .position(|(lvl, above)| lvl.p <= lcl_p && lvl.b >= 0.0 && above.b > 0.0)
}

// The highest level above the LFC where a buoyant parcel becomes neutral or negative, or the top.
fn find_el(levels: &[Level], lfc: usize) -> usize {
    let top = levels.len() - 1;

    (lfc + 1..=top)
        .rev()
        .find(|&i| levels[i].b <= 0.0 && levels[i - 1].b > 0.0)
        .unwrap_or(top)
}

// g * integral of f(b) dz with the trapezoid rule.
fn integrate<F>(levels: &[Level], f: F) -> f64
where
    F: Fn(f64) -> f64,
{
    let sum = levels
        .iter()
        .tuple_windows::<(_, _)>()
        .fold(0.0, |acc, (below, above)| {
            let dz = above.h - below.h;
            acc + (f(below.b) + f(above.b)) * dz
        });

    sum / 2.0 * -metfor::g
}
