//! Enums used as keys for getting and setting values in an analysis.

use strum_macros::EnumIter;

/// The scalar diagnostics computed for each sounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum DiagnosticIndex {
    /// Convective Available Potential Energy, or CAPE. (J/kg)
    CAPE,
    /// Convective Inhibition, or CIN (J/kg)
    CIN,
    /// K-index
    K,
    /// Lifted Index
    LI,
    /// Showalter Index
    SI,
    /// Lifting Condensation Level, or LCL (hPa), pressure vertical coordinate.
    LCLPressure,
    /// Level of Free Convection (hPa), pressure vertical coordinate
    LFCPressure,
    /// Equilibrium Level (hPa), pressure vertical coordinate
    ELPressure,
}

impl DiagnosticIndex {
    /// Short label for tables and popups.
    pub fn label(self) -> &'static str {
        use self::DiagnosticIndex::*;

        match self {
            CAPE => "CAPE",
            CIN => "CIN",
            K => "KI",
            LI => "LI",
            SI => "SI",
            LCLPressure => "LCL",
            LFCPressure => "LFC",
            ELPressure => "EL",
        }
    }

    /// Units of the value.
    pub fn units(self) -> &'static str {
        use self::DiagnosticIndex::*;

        match self {
            CAPE | CIN => "J/kg",
            K | LI | SI => "\u{00B0}C",
            LCLPressure | LFCPressure | ELPressure => "hPa",
        }
    }

    /// Number of decimal places the value is reported with.
    pub fn precision(self) -> usize {
        use self::DiagnosticIndex::*;

        match self {
            LI | SI => 1,
            _ => 0,
        }
    }
}
