use super::*;
use sounding_stability::{Result, Sounding};

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn test_index<F: FnOnce(&Sounding) -> Result<f64>>(
    snd: &Sounding,
    expected: &HashMap<String, Option<f64>>,
    anal_func: F,
    index_key: &str,
    tol: f64,
) {
    if let Some(target) = expected.get(index_key) {
        let analysis = anal_func(snd);

        match target {
            Some(target_val) => {
                let val = analysis.unwrap();
                assert!(
                    approx_equal(val, *target_val, tol),
                    "{}: {} != {}",
                    index_key,
                    val,
                    target_val
                );
            }
            None => assert!(analysis.is_err(), "{}: {:?}", index_key, analysis),
        }
    }
}
