use crate::{
    error::{AnalysisError, Result},
    parcel::Parcel,
    utility::find_root,
};
use metfor::{self, Celsius, HectoPascal, Kelvin, Quantity};

// Gas constant for dry air, J/kg/K
const RD: f64 = 287.04749;
// Specific heat of dry air at constant pressure, J/kg/K
const CPD: f64 = 1004.6662;
// Latent heat of vaporization, J/kg
const LV: f64 = 2.50084e6;
// Ratio of molecular weights of water and dry air.
const EPSILON: f64 = 0.6219569;

// Tolerance on the LCL pressure, hPa.
const LCL_TOLERANCE: f64 = 0.01;
// Never search for the LCL above this level.
const LCL_SEARCH_TOP: HectoPascal = HectoPascal(100.0);
// Step used to lower the top of the LCL search until the dew point can be evaluated, hPa.
const LCL_TOP_STEP: f64 = 10.0;
// Largest pressure step when integrating along a moist adiabat, hPa.
const MAX_MOIST_STEP: f64 = 5.0;

/// The thermodynamic path of a lifted parcel.
///
/// Below the lifting condensation level the parcel conserves potential temperature and mixing
/// ratio. Above it the parcel is saturated and follows a pseudo-adiabat.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Ascent {
    parcel: Parcel,
    theta: Kelvin,
    mixing_ratio: f64,
    lcl_pressure: HectoPascal,
    lcl_temperature: Celsius,
}

impl Ascent {
    pub(crate) fn new(parcel: Parcel) -> Result<Self> {
        let theta = parcel.theta();
        let mixing_ratio = parcel.mixing_ratio()?;
        let (lcl_pressure, lcl_temperature) = find_lcl(&parcel, theta, mixing_ratio)?;

        Ok(Ascent {
            parcel,
            theta,
            mixing_ratio,
            lcl_pressure,
            lcl_temperature,
        })
    }

    #[inline]
    pub(crate) fn parcel(&self) -> Parcel {
        self.parcel
    }

    #[inline]
    pub(crate) fn lcl_pressure(&self) -> HectoPascal {
        self.lcl_pressure
    }

    #[inline]
    pub(crate) fn lcl_temperature(&self) -> Celsius {
        self.lcl_temperature
    }

    /// Temperature and dew point of the parcel at `tgt_p`, lifted directly from its start.
    pub(crate) fn state_at(&self, tgt_p: HectoPascal) -> Result<(Celsius, Celsius)> {
        if tgt_p >= self.lcl_pressure {
            self.dry_state(tgt_p)
        } else {
            let t = moist_ascent(self.lcl_pressure, self.lcl_temperature, tgt_p);
            Ok((t, t))
        }
    }

    /// Temperature and dew point at each pressure level, which must be ordered bottom up.
    ///
    /// The moist part of the ascent is integrated continuously from one level to the next rather
    /// than restarting at the LCL for every level.
    pub(crate) fn trace<I>(&self, pressures: I) -> Result<Vec<(Celsius, Celsius)>>
    where
        I: IntoIterator<Item = HectoPascal>,
    {
        let mut moist_p = self.lcl_pressure;
        let mut moist_t = self.lcl_temperature;

        pressures
            .into_iter()
            .map(|p| {
                if p >= self.lcl_pressure {
                    return self.dry_state(p);
                }

                if p > moist_p {
                    // Out of order, start over from the LCL.
                    moist_p = self.lcl_pressure;
                    moist_t = self.lcl_temperature;
                }

                moist_t = moist_ascent(moist_p, moist_t, p);
                moist_p = p;

                Ok((moist_t, moist_t))
            })
            .collect()
    }

    fn dry_state(&self, tgt_p: HectoPascal) -> Result<(Celsius, Celsius)> {
        // Exact at the starting level.
        if tgt_p == self.parcel.pressure {
            return Ok((self.parcel.temperature, self.parcel.dew_point));
        }

        let t = Celsius::from(metfor::temperature_from_pot_temp(self.theta, tgt_p));
        let dp = metfor::dew_point_from_p_and_mw(tgt_p, self.mixing_ratio)
            .ok_or(AnalysisError::InvalidInput)?;

        // The dew point can't exceed the temperature, rounding near the LCL.
        Ok((t, if dp > t { t } else { dp }))
    }
}

/// Find the lifting condensation level by bisection on pressure.
///
/// The LCL is where the dew point of a parcel conserving its mixing ratio meets the dry adiabat
/// through the parcel. A saturated parcel is already at its LCL.
fn find_lcl(parcel: &Parcel, theta: Kelvin, mw: f64) -> Result<(HectoPascal, Celsius)> {
    if parcel.dew_point >= parcel.temperature {
        return Ok((parcel.pressure, parcel.temperature));
    }

    if parcel.pressure <= LCL_SEARCH_TOP {
        return Err(AnalysisError::LclNotFound);
    }

    let spread = |p: f64| -> f64 {
        let p = HectoPascal(p);
        let t = Celsius::from(metfor::temperature_from_pot_temp(theta, p));
        match metfor::dew_point_from_p_and_mw(p, mw) {
            Some(dp) => (t - dp).unpack(),
            None => std::f64::NAN,
        }
    };

    // Very dry parcels leave the range of the vapor pressure formulas well below the search top.
    let bottom = parcel.pressure.unpack();
    let mut top = LCL_SEARCH_TOP.unpack();
    while !spread(top).is_finite() {
        top += LCL_TOP_STEP;
        if top >= bottom {
            return Err(AnalysisError::LclNotFound);
        }
    }

    let lcl_p = find_root(spread, top, bottom, LCL_TOLERANCE)
        .map(HectoPascal)
        .ok_or(AnalysisError::LclNotFound)?;

    let lcl_t = Celsius::from(metfor::temperature_from_pot_temp(theta, lcl_p));

    Ok((lcl_p, lcl_t))
}

/// Integrate along a pseudo-adiabat from (`p0`, `t0`) to `p1` with fourth order Runge-Kutta.
fn moist_ascent(p0: HectoPascal, t0: Celsius, p1: HectoPascal) -> Celsius {
    let (p0, p1) = (p0.unpack(), p1.unpack());
    let total = p1 - p0;
    if total == 0.0 {
        return t0;
    }

    let steps = (total.abs() / MAX_MOIST_STEP).ceil().max(1.0);
    let h = total / steps;

    let mut p = p0;
    let mut t = Kelvin::from(t0).unpack();
    for _ in 0..(steps as usize) {
        let k1 = moist_lapse(p, t);
        let k2 = moist_lapse(p + h / 2.0, t + h / 2.0 * k1);
        let k3 = moist_lapse(p + h / 2.0, t + h / 2.0 * k2);
        let k4 = moist_lapse(p + h, t + h * k3);

        t += h / 6.0 * (k1 + 2.0 * k2 + 2.0 * k3 + k4);
        p += h;
    }

    Celsius::from(Kelvin(t))
}

/// dT/dp (K/hPa) along a pseudo-adiabat at pressure `p` (hPa) and temperature `t` (K).
#[inline]
fn moist_lapse(p: f64, t: f64) -> f64 {
    // Too cold for the vapor pressure formulas means there is effectively no vapor left.
    let rs = metfor::mixing_ratio(Celsius::from(Kelvin(t)), HectoPascal(p)).unwrap_or(0.0);

    (RD * t + LV * rs) / (CPD + LV * LV * rs * EPSILON / (RD * t * t)) / p
}
