#![allow(dead_code)] // Not every bench uses every loader.
use sounding_stability::{parse_sounding, Sounding};
use std::{fs, path::PathBuf};

pub const TEST_FILES: [&str; 4] = ["tropical.csv", "stable.csv", "capped.csv", "saturated.csv"];

pub fn load_all_test_files() -> [Sounding; 4] {
    let snd1 = load_test_file(TEST_FILES[0]);
    let snd2 = load_test_file(TEST_FILES[1]);
    let snd3 = load_test_file(TEST_FILES[2]);
    let snd4 = load_test_file(TEST_FILES[3]);

    [snd1, snd2, snd3, snd4]
}

pub fn test_file_path(fname: &str) -> PathBuf {
    let mut test_path = PathBuf::new();
    test_path.push("test_data");
    test_path.push(fname);
    test_path
}

fn load_test_file(fname: &str) -> Sounding {
    let location = test_file_path(fname);

    let contents = fs::read_to_string(&location)
        .unwrap_or_else(|_| panic!("Error reading file: {:#?}", location));

    parse_sounding(&contents).expect("oops")
}
