//! Data type and methods for building and describing the stability analysis of a sounding.
use crate::{
    buoyancy::buoyancy_analysis,
    classify::{classify, StabilityCategory},
    error::{AnalysisError, Result},
    indexes::{kindex, lifted_index, showalter_index},
    keys::DiagnosticIndex,
    parcel_profile::parcel_profile,
    sounding::Sounding,
};
use metfor::{HectoPascal, JpKg, Quantity};
use tracing::debug;

/// The diagnostics computed for one sounding.
///
/// CAPE and CIN are always available for a sounding that could be analyzed, the indexes that
/// need standard pressure levels may be missing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnostics {
    cape: JpKg,
    cin: JpKg,

    k_index: Option<f64>,
    lifted_index: Option<f64>,
    showalter_index: Option<f64>,

    lcl_pressure: Option<HectoPascal>,
    lfc_pressure: Option<HectoPascal>,
    el_pressure: Option<HectoPascal>,
}

impl Diagnostics {
    /// Create a new `Diagnostics` with only the energy values.
    pub fn new(cape: JpKg, cin: JpKg) -> Self {
        Diagnostics {
            cape,
            cin,
            k_index: None,
            lifted_index: None,
            showalter_index: None,
            lcl_pressure: None,
            lfc_pressure: None,
            el_pressure: None,
        }
    }

    /// Set a value in the diagnostics.
    ///
    /// Pressure levels are in hPa and energies in J/kg. CAPE is never negative and CIN is never
    /// positive, values on the wrong side of zero are clamped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use metfor::JpKg;
    /// use sounding_stability::{DiagnosticIndex, Diagnostics};
    ///
    /// let diag = Diagnostics::new(JpKg(3000.0), JpKg(0.0))
    ///     .with_index(DiagnosticIndex::K, 35.0)
    ///     .with_index(DiagnosticIndex::LI, -6.0);
    ///
    /// assert_eq!(diag.k_index(), Some(35.0));
    /// assert_eq!(diag.showalter_index(), None);
    /// ```
    pub fn with_index<T>(self, var: DiagnosticIndex, value: T) -> Self
    where
        Option<f64>: From<T>,
    {
        use self::DiagnosticIndex::*;

        let opt = Option::from(value);

        match var {
            CAPE => Diagnostics {
                cape: JpKg(opt.unwrap_or(0.0).max(0.0)),
                ..self
            },
            CIN => Diagnostics {
                cin: JpKg(opt.unwrap_or(0.0).min(0.0)),
                ..self
            },
            K => Diagnostics {
                k_index: opt,
                ..self
            },
            LI => Diagnostics {
                lifted_index: opt,
                ..self
            },
            SI => Diagnostics {
                showalter_index: opt,
                ..self
            },
            LCLPressure => Diagnostics {
                lcl_pressure: opt.map(HectoPascal),
                ..self
            },
            LFCPressure => Diagnostics {
                lfc_pressure: opt.map(HectoPascal),
                ..self
            },
            ELPressure => Diagnostics {
                el_pressure: opt.map(HectoPascal),
                ..self
            },
        }
    }

    /// Method to retrieve a value as a plain number.
    pub fn get(&self, var: DiagnosticIndex) -> Option<f64> {
        use self::DiagnosticIndex::*;

        match var {
            CAPE => Some(self.cape.unpack()),
            CIN => Some(self.cin.unpack()),
            K => self.k_index,
            LI => self.lifted_index,
            SI => self.showalter_index,
            LCLPressure => self.lcl_pressure.map(|p| p.unpack()),
            LFCPressure => self.lfc_pressure.map(|p| p.unpack()),
            ELPressure => self.el_pressure.map(|p| p.unpack()),
        }
    }

    /// Convective available potential energy of the surface parcel.
    #[inline]
    pub fn cape(&self) -> JpKg {
        self.cape
    }

    /// Convective inhibition of the surface parcel.
    #[inline]
    pub fn cin(&self) -> JpKg {
        self.cin
    }

    /// K-Index, if the sounding spans 850 to 500 hPa.
    #[inline]
    pub fn k_index(&self) -> Option<f64> {
        self.k_index
    }

    /// Lifted Index of the surface parcel.
    #[inline]
    pub fn lifted_index(&self) -> Option<f64> {
        self.lifted_index
    }

    /// Showalter Index.
    #[inline]
    pub fn showalter_index(&self) -> Option<f64> {
        self.showalter_index
    }

    /// Lifting condensation level of the surface parcel.
    #[inline]
    pub fn lcl_pressure(&self) -> Option<HectoPascal> {
        self.lcl_pressure
    }

    /// Level of free convection of the surface parcel.
    #[inline]
    pub fn lfc_pressure(&self) -> Option<HectoPascal> {
        self.lfc_pressure
    }

    /// Equilibrium level of the surface parcel.
    #[inline]
    pub fn el_pressure(&self) -> Option<HectoPascal> {
        self.el_pressure
    }

    /// Classify these diagnostics.
    pub fn category(&self) -> StabilityCategory {
        classify(
            self.cape,
            self.k_index,
            self.lifted_index,
            self.showalter_index,
        )
    }
}

/// Compute all the diagnostics for a sounding.
///
/// Fails for a malformed sounding. An index that needs a standard level the sounding doesn't have
/// is left missing.
///
/// # Examples
///
/// ```rust
/// use sounding_stability::{analyze_sounding, StabilityCategory};
/// # use sounding_stability::doctest::make_test_sounding;
///
/// let snd = make_test_sounding();
/// let diag = analyze_sounding(&snd).unwrap();
///
/// assert_eq!(diag.k_index(), Some(35.0));
/// assert!(diag.category() >= StabilityCategory::ModeratelyUnstable);
/// ```
pub fn analyze_sounding(snd: &Sounding) -> Result<Diagnostics> {
    let profile = parcel_profile(snd)?;
    let buoyancy = buoyancy_analysis(snd, &profile)?;

    let k_index = optional_index(kindex(snd), "K-Index")?;
    let lifted_index = optional_index(lifted_index(snd, &profile), "lifted index")?;
    let showalter_index = optional_index(showalter_index(snd), "Showalter index")?;

    Ok(Diagnostics {
        cape: buoyancy.cape(),
        cin: buoyancy.cin(),
        k_index,
        lifted_index,
        showalter_index,
        lcl_pressure: Some(profile.lcl_pressure()),
        lfc_pressure: buoyancy.lfc_pressure(),
        el_pressure: buoyancy.el_pressure(),
    })
}

// A missing standard level only makes the index missing, anything else is a real failure. The
// surface parcel has already been lifted, so an LCL failure here belongs to the 850 hPa parcel.
fn optional_index(result: Result<f64>, name: &str) -> Result<Option<f64>> {
    match result {
        Ok(val) => Ok(Some(val)),
        Err(AnalysisError::MissingStandardLevel(p)) => {
            debug!(index = name, level = p.unpack(), "standard level missing");
            Ok(None)
        }
        Err(AnalysisError::LclNotFound) => {
            debug!(index = name, "parcel could not be lifted");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
