use super::*;
use metfor::Quantity;
use sounding_stability::{
    analyze_sounding, buoyancy_analysis, parcel_profile, DiagnosticIndex, Sounding,
    StabilityCategory,
};

// Energies are compared within this fraction of the expected value, or the absolute tolerance.
const ENERGY_FRACTION: f64 = 0.10;
const CAPE_TOL: f64 = 100.0;
const CIN_TOL: f64 = 30.0;
const PRESSURE_TOL: f64 = 20.0;

fn expected_value(expected: &HashMap<String, Option<f64>>, key: &str) -> Option<f64> {
    *expected.get(key).unwrap_or(&None)
}

fn check_energy(val: f64, target: f64, abs_tol: f64, key: &str) {
    let tol = f64::max(abs_tol, ENERGY_FRACTION * target.abs());
    assert!(approx_equal(val, target, tol), "{}: {} != {}", key, val, target);
}

fn check_pressure(val: Option<f64>, target: Option<f64>, key: &str) {
    match (val, target) {
        (Some(val), Some(target)) => assert!(
            approx_equal(val, target, PRESSURE_TOL),
            "{}: {} != {}",
            key,
            val,
            target
        ),
        (None, None) => {}
        (val, target) => panic!("{}: {:?} != {:?}", key, val, target),
    }
}

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn test_parcel_profile(snd: &Sounding, expected: &HashMap<String, Option<f64>>) {
    let profile = parcel_profile(snd).unwrap();

    let lcl = profile.lcl_pressure().unpack();
    let target = expected_value(expected, "lcl_pressure").unwrap();
    assert!(approx_equal(lcl, target, 2.0), "lcl: {} != {}", lcl, target);

    // Never supersaturated, and the parcel cools as it rises.
    for (t, dp) in profile.parcel_t.iter().zip(&profile.parcel_dew_point) {
        assert!(dp.unpack() <= t.unpack() + 1.0e-9);
    }
    for pair in profile.parcel_t.windows(2) {
        assert!(pair[1] < pair[0]);
    }
}

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn test_buoyancy(snd: &Sounding, expected: &HashMap<String, Option<f64>>) {
    let profile = parcel_profile(snd).unwrap();
    let anal = buoyancy_analysis(snd, &profile).unwrap();

    let cape = anal.cape().unpack();
    let cin = anal.cin().unpack();
    assert!(cape >= 0.0);
    assert!(cin <= 0.0);

    check_energy(cape, expected_value(expected, "cape").unwrap(), CAPE_TOL, "cape");
    check_energy(cin, expected_value(expected, "cin").unwrap(), CIN_TOL, "cin");

    check_pressure(
        anal.lfc_pressure().map(|p| p.unpack()),
        expected_value(expected, "lfc_pressure"),
        "lfc_pressure",
    );
    check_pressure(
        anal.el_pressure().map(|p| p.unpack()),
        expected_value(expected, "el_pressure"),
        "el_pressure",
    );
}

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn test_category(snd: &Sounding, expected: &HashMap<String, Option<f64>>) {
    let diag = analyze_sounding(snd).unwrap();

    let target = expected_value(expected, "category").unwrap() as u8;
    assert_eq!(diag.category(), StabilityCategory::from(target));

    // Missing indexes in the file are missing in the analysis too.
    for (key, idx) in [
        ("kindex", DiagnosticIndex::K),
        ("lifted_index", DiagnosticIndex::LI),
        ("showalter_index", DiagnosticIndex::SI),
    ]
    .iter()
    {
        assert_eq!(
            diag.get(*idx).is_some(),
            expected_value(expected, key).is_some(),
            "{}",
            key
        );
    }
}
