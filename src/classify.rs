//! Map stability diagnostics to a discrete category.

use metfor::JpKg;
use std::fmt::Display;
use strum_macros::EnumIter;

/// Likelihood of deep convection, ordered from least to most unstable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum StabilityCategory {
    /// None of the instability criteria are met.
    Stable = 0,
    /// Some CAPE, a positive K-Index, and a negative Showalter Index.
    WeaklyUnstable = 1,
    /// CAPE over 1000 J/kg, K-Index over 20, and Lifted Index under -3.
    ModeratelyUnstable = 2,
    /// CAPE over 2500 J/kg, K-Index over 30, and Lifted Index under -5.
    StronglyUnstable = 3,
}

impl StabilityCategory {
    /// Display color for tables and maps.
    pub fn color(self) -> &'static str {
        use StabilityCategory::*;

        match self {
            Stable => "green",
            WeaklyUnstable => "yellow",
            ModeratelyUnstable => "orange",
            StronglyUnstable => "red",
        }
    }

    /// The label used in Indonesian language products.
    pub fn local_label(self) -> &'static str {
        use StabilityCategory::*;

        match self {
            Stable => "Stabil",
            WeaklyUnstable => "Labil Lemah",
            ModeratelyUnstable => "Labil Sedang",
            StronglyUnstable => "Labil Kuat",
        }
    }

    /// Human readable name.
    pub fn as_str(self) -> &'static str {
        use StabilityCategory::*;

        match self {
            Stable => "Stable",
            WeaklyUnstable => "Weakly Unstable",
            ModeratelyUnstable => "Moderately Unstable",
            StronglyUnstable => "Strongly Unstable",
        }
    }
}

impl From<u8> for StabilityCategory {
    fn from(val: u8) -> Self {
        use StabilityCategory::*;

        match val {
            0 => Stable,
            1 => WeaklyUnstable,
            2 => ModeratelyUnstable,
            _ => StronglyUnstable,
        }
    }
}

impl Display for StabilityCategory {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "{}", self.as_str())
    }
}

/// Classify a sounding from its diagnostics.
///
/// The tiers are checked from most to least unstable and the first match wins. All comparisons
/// are strict. A tier that needs a missing index can't match. Note the weakly unstable tier uses
/// the Showalter Index where the others use the Lifted Index.
///
/// # Examples
///
/// ```rust
/// use metfor::JpKg;
/// use sounding_stability::{classify, StabilityCategory};
///
/// let cat = classify(JpKg(3000.0), Some(35.0), Some(-6.0), None);
/// assert_eq!(cat, StabilityCategory::StronglyUnstable);
///
/// // Missing indexes never satisfy a tier.
/// let cat = classify(JpKg(3000.0), Some(35.0), None, None);
/// assert_eq!(cat, StabilityCategory::Stable);
/// ```
pub fn classify(
    cape: JpKg,
    k_index: Option<f64>,
    lifted_index: Option<f64>,
    showalter_index: Option<f64>,
) -> StabilityCategory {
    let JpKg(cape) = cape;
    let k_above = |threshold: f64| k_index.map(|k| k > threshold).unwrap_or(false);
    let li_below = |threshold: f64| lifted_index.map(|li| li < threshold).unwrap_or(false);
    let si_below = |threshold: f64| showalter_index.map(|si| si < threshold).unwrap_or(false);

    if cape > 2500.0 && k_above(30.0) && li_below(-5.0) {
        StabilityCategory::StronglyUnstable
    } else if cape > 1000.0 && k_above(20.0) && li_below(-3.0) {
        StabilityCategory::ModeratelyUnstable
    } else if cape > 100.0 && k_above(0.0) && si_below(0.0) {
        StabilityCategory::WeaklyUnstable
    } else {
        StabilityCategory::Stable
    }
}
