//! Soundings stored as CSV files in a directory per observation time.
//!
//! Files live at `<root>/<YYYYMMDDHH>/<CODE>.csv`. Each data line has the columns
//!
//! `height (m), temperature (C), dew point (C), pressure (hPa), wind speed (kt), wind direction`
//!
//! from the lowest level up. Empty or unparseable values are missing. Lines starting with `#` are
//! comments, except `# name: <name>` and `# location: <lat>,<lon>` which describe the station.
//! A line starting with `###` ends the data.
use super::{FetchError, ProfileSource};
use crate::{sounding::Sounding, station::Station};
use chrono::NaiveDateTime;
use metfor::{Celsius, HectoPascal, Knots, Meters, WindSpdDir};
use optional::{none, some, Optioned};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::trace;

/// Reads soundings from a directory tree of CSV files.
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    root: PathBuf,
}

impl CsvDirectorySource {
    /// Create a source rooted at `root`.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        CsvDirectorySource {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The path where the sounding for a station and time is expected.
    pub fn path_for(&self, time: NaiveDateTime, code: &str) -> PathBuf {
        let mut path = self.root.clone();
        path.push(time.format("%Y%m%d%H").to_string());
        path.push(format!("{}.csv", code));
        path
    }
}

impl ProfileSource for CsvDirectorySource {
    fn fetch(&self, time: NaiveDateTime, station: &Station) -> Result<Sounding, FetchError> {
        let path = self.path_for(time, &station.code);
        trace!(path = %path.display(), "reading sounding");

        let contents = fs::read_to_string(&path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => FetchError::NotAvailable,
            ErrorKind::InvalidData => FetchError::Corrupt(format!("{}: {}", path.display(), err)),
            _ => FetchError::Transient(format!("{}: {}", path.display(), err)),
        })?;

        let snd = parse_sounding(&contents)?;

        // Fill in the station code even if the file didn't name the station.
        let reported = snd
            .station()
            .cloned()
            .unwrap_or_else(|| Station::new(station.code.clone(), station.name.clone()));
        let reported = Station {
            code: station.code.clone(),
            ..reported
        };

        Ok(snd
            .with_station(reported)
            .with_valid_time(time)
            .with_source_description(format!("{}", path.display())))
    }
}

/// Parse the text of a CSV sounding.
///
/// # Examples
///
/// ```rust
/// use sounding_stability::parse_sounding;
///
/// let text = "\
/// ## name: Jakarta
/// ## location: -6.12, 106.65
/// height,temperature,dewpoint,pressure,wspd,wdir
/// 110,28.0,24.0,1000,5,270
/// 1500,15.0,10.0,850,10,260
/// ";
///
/// let snd = parse_sounding(text).unwrap();
/// assert_eq!(snd.len(), 2);
/// assert_eq!(snd.reported_location(), Some((-6.12, 106.65)));
/// assert_eq!(snd.station().unwrap().name, "Jakarta");
/// ```
pub fn parse_sounding(text: &str) -> Result<Sounding, FetchError> {
    let mut height: Vec<Optioned<Meters>> = vec![];
    let mut temp: Vec<Optioned<Celsius>> = vec![];
    let mut dp: Vec<Optioned<Celsius>> = vec![];
    let mut press: Vec<Optioned<HectoPascal>> = vec![];
    let mut wind: Vec<Optioned<WindSpdDir<Knots>>> = vec![];

    let mut name: Option<String> = None;
    let mut location: Option<(f64, f64)> = None;

    for (line_num, line) in text.lines().enumerate() {
        let line = line.trim();

        if line.starts_with("###") {
            break;
        }

        if let Some(comment) = line.strip_prefix('#') {
            let comment = comment.trim();
            if let Some(val) = comment.strip_prefix("name:") {
                name = Some(val.trim().to_owned());
            } else if let Some(val) = comment.strip_prefix("location:") {
                location = Some(parse_location(val).ok_or_else(|| {
                    FetchError::Corrupt(format!("line {}: bad location '{}'", line_num + 1, val))
                })?);
            }
            continue;
        }

        let tokens: Vec<&str> = line.split(',').map(str::trim).collect();
        if tokens.len() < 4 {
            continue;
        }

        let vals: Vec<Option<f64>> = tokens.iter().map(|tok| parse_value(tok)).collect();
        let get = |idx: usize| vals.get(idx).cloned().flatten();

        // The column header, or a line of nothing.
        if vals.iter().all(Option::is_none) {
            continue;
        }

        let p = get(3).ok_or_else(|| {
            FetchError::Corrupt(format!("line {}: missing pressure", line_num + 1))
        })?;

        height.push(get(0).map(Meters).into());
        temp.push(get(1).map(Celsius).into());
        dp.push(get(2).map(Celsius).into());
        press.push(some(HectoPascal(p)));
        wind.push(match (get(4), get(5)) {
            (Some(spd), Some(dir)) => some(WindSpdDir {
                speed: Knots(spd),
                direction: dir,
            }),
            _ => none(),
        });
    }

    let mut snd = Sounding::new()
        .with_pressure_profile(press)
        .with_height_profile(height)
        .with_temperature_profile(temp)
        .with_dew_point_profile(dp)
        .with_wind_profile(wind);

    if name.is_some() || location.is_some() {
        let name = name.unwrap_or_default();
        snd = snd.with_station(Station::new("", name).with_lat_lon(location));
    }

    Ok(snd)
}

fn parse_value(token: &str) -> Option<f64> {
    f64::from_str(token).ok().filter(|val| val.is_finite())
}

fn parse_location(val: &str) -> Option<(f64, f64)> {
    let mut tokens = val.split(',').map(str::trim);
    let lat = tokens.next().and_then(parse_value)?;
    let lon = tokens.next().and_then(parse_value)?;

    if tokens.next().is_some() {
        return None;
    }

    Some((lat, lon))
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;

    const TEXT: &str = "\
# A comment
# name: Jakarta
# location: -6.12,106.65
height,temperature,dewpoint,pressure,wspd,wdir
110,28.0,24.0,1000,5,270
1500,15.0,10.0,850,,
,5.0,-5.0,700,20,250
5850,-20.0,,500,30,240
### Expected ###
cape,2078
";

    #[test]
    fn test_parse() {
        let snd = parse_sounding(TEXT).unwrap();

        assert_eq!(snd.len(), 4);
        assert!(snd.height_profile()[2].is_none());
        assert!(snd.dew_point_profile()[3].is_none());
        assert!(snd.wind_profile()[1].is_none());
        assert_eq!(snd.wind_profile()[0].unwrap().speed, Knots(5.0));
        assert_eq!(snd.pressure_profile()[3].unwrap(), HectoPascal(500.0));
        assert_eq!(snd.reported_location(), Some((-6.12, 106.65)));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_sounding("110,28.0,24.0,,5,270\n"),
            Err(FetchError::Corrupt(_))
        ));
        assert!(matches!(
            parse_sounding("# location: north\n110,28.0,24.0,1000,5,270\n"),
            Err(FetchError::Corrupt(_))
        ));

        // No station info at all is fine.
        let snd = parse_sounding("110,28.0,24.0,1000,5,270\n").unwrap();
        assert!(snd.station().is_none());
    }

    #[test]
    fn test_directory_source() {
        let dir = tempfile::tempdir().unwrap();
        let time = NaiveDate::from_ymd_opt(2023, 10, 16)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();

        let src = CsvDirectorySource::new(dir.path());
        let path = src.path_for(time, "WIII");
        assert!(path.ends_with("2023101612/WIII.csv"));

        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, TEXT).unwrap();

        let stn = Station::new("WIII", "Jakarta");
        let snd = src.fetch(time, &stn).unwrap();
        assert_eq!(snd.len(), 4);
        assert_eq!(snd.valid_time(), Some(time));
        assert_eq!(snd.station().unwrap().code, "WIII");
        assert_eq!(snd.reported_location(), Some((-6.12, 106.65)));
        assert_eq!(
            snd.source_description(),
            Some(path.display().to_string().as_str())
        );

        assert_eq!(
            src.fetch(time, &Station::new("WAAA", "Makassar")).unwrap_err(),
            FetchError::NotAvailable
        );
    }
}
