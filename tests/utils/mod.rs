use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use sounding_stability::{parse_sounding, Sounding};

pub mod analysis_tests;
pub mod index_tests;

/// Every key a test file must have in its expected values section.
#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub const EXPECTED_KEYS: [&str; 9] = [
    "cape",
    "cin",
    "lcl_pressure",
    "lfc_pressure",
    "el_pressure",
    "kindex",
    "lifted_index",
    "showalter_index",
    "category",
];

#[allow(unused_macros)] // False alarm
macro_rules! check_file_complete {
    ($test_name:ident, $fname:expr) => {
        #[test]
        fn $test_name() {
            let (snd, expected) = utils::load_test_file($fname);

            assert!(snd.validate().is_ok(), "Failed validation.");

            // Make sure all of these keys are in the hashmap
            for key in utils::EXPECTED_KEYS.iter() {
                assert!(expected.contains_key(*key), "{}", key);
            }

            // Make sure there are no extra keys in there being ignored.
            for key in expected.keys() {
                assert!(
                    utils::EXPECTED_KEYS.contains(&key.as_str()),
                    "extra key found: {}",
                    key
                );
            }
        }
    };
}

#[allow(unused_macros)] // False alarm
macro_rules! test_file {
    ($test_mod_name:ident, $fname:expr) => {
        mod $test_mod_name {

            use std::collections::HashMap;

            use sounding_stability::Sounding;
            use crate::utils;

            fn load_data() -> (Sounding, HashMap<String, Option<f64>>) {
                utils::load_test_file($fname)
            }

            mod analysis {
                use crate::utils::analysis_tests;
                use super::load_data;

                #[test]
                fn parcel_profile() {
                    let (snd, expected) = load_data();
                    analysis_tests::test_parcel_profile(&snd, &expected);
                }

                #[test]
                fn buoyancy() {
                    let (snd, expected) = load_data();
                    analysis_tests::test_buoyancy(&snd, &expected);
                }

                #[test]
                fn category() {
                    let (snd, expected) = load_data();
                    analysis_tests::test_category(&snd, &expected);
                }
            }

            mod indexes {
                use sounding_stability::{lifted_index, parcel_profile, Sounding};
                use crate::utils::index_tests;
                use super::load_data;

                #[test]
                fn test_kindex() {
                    let (snd, expected) = load_data();
                    index_tests::test_index(
                        &snd,
                        &expected,
                        sounding_stability::kindex,
                        "kindex",
                        0.5,
                    );
                }

                #[test]
                fn test_lifted_index() {
                    let (snd, expected) = load_data();
                    index_tests::test_index(
                        &snd,
                        &expected,
                        |snd: &Sounding| lifted_index(snd, &parcel_profile(snd)?),
                        "lifted_index",
                        0.5,
                    );
                }

                #[test]
                fn test_showalter_index() {
                    let (snd, expected) = load_data();
                    index_tests::test_index(
                        &snd,
                        &expected,
                        sounding_stability::showalter_index,
                        "showalter_index",
                        0.5,
                    );
                }
            }

        }
    };
}

pub fn load_test_file(fname: &str) -> (Sounding, HashMap<String, Option<f64>>) {
    let mut test_path = PathBuf::new();
    test_path.push("test_data");
    test_path.push(fname);
    load_test_csv_sounding(&test_path)
}

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn approx_equal(tgt: f64, guess: f64, tol: f64) -> bool {
    assert!(tol > 0.0);

    f64::abs(tgt - guess) <= tol
}

fn load_test_csv_sounding(location: &PathBuf) -> (Sounding, HashMap<String, Option<f64>>) {
    let contents = fs::read_to_string(location)
        .unwrap_or_else(|_| panic!("Error reading file: {:#?}", location));

    // The parser stops at the first ### line.
    let snd = parse_sounding(&contents)
        .unwrap_or_else(|err| panic!("Error parsing file {:#?}: {}", location, err));

    //
    // Expected values, an empty value means it should not be computable.
    //
    let mut expected = HashMap::new();
    for line in contents
        .lines()
        .skip_while(|line| !line.starts_with("### Expected ###"))
        .skip(1)
    {
        let tokens: Vec<&str> = line.split(',').map(str::trim).collect();
        if tokens.len() < 2 || tokens[0].is_empty() {
            continue;
        }

        let key = tokens[0].to_owned();
        let value = if tokens[1].is_empty() {
            None
        } else {
            Some(f64::from_str(tokens[1]).unwrap())
        };

        expected.insert(key, value);
    }

    (snd, expected)
}
