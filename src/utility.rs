//! Numerical helpers shared by the parcel and index calculations.

/// Bisection algorithm for finding the root of an equation given values bracketing a root.
///
/// Returns `None` if `low_val` and `high_val` do not bracket a root. Iteration stops once the
/// bracket is narrower than `tolerance`.
pub(crate) fn find_root<F>(f: F, mut low_val: f64, mut high_val: f64, tolerance: f64) -> Option<f64>
where
    F: Fn(f64) -> f64,
{
    const MAX_IT: usize = 100;

    debug_assert!(tolerance > 0.0);

    if low_val > high_val {
        ::std::mem::swap(&mut low_val, &mut high_val);
    }

    let mut f_low = f(low_val);
    let f_high = f(high_val);

    if f_low == 0.0 {
        return Some(low_val);
    }
    if f_high == 0.0 {
        return Some(high_val);
    }
    if f_low * f_high > 0.0 || !(f_low * f_high).is_finite() {
        return None;
    }

    let mut mid_val = (high_val - low_val) / 2.0 + low_val;
    for _ in 0..MAX_IT {
        let f_mid = f(mid_val);
        if f_mid == 0.0 {
            return Some(mid_val);
        }

        if f_mid * f_low > 0.0 {
            low_val = mid_val;
            f_low = f_mid;
        } else {
            high_val = mid_val;
        }

        mid_val = (high_val - low_val) / 2.0 + low_val;
        if (high_val - low_val).abs() < tolerance {
            break;
        }
    }

    Some(mid_val)
}

/// Round to a number of decimal places.
#[inline]
pub(crate) fn round_to(val: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    let rounded = (val * scale).round() / scale;

    // Don't report -0.0
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
