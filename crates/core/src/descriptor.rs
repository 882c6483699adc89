use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{LocationDescriptor, Rgb, TripDescriptor};
use crate::error::{Error, Result};

/// Which level of the archive a location-shaped descriptor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationLevel {
    Location,
    SubLocation,
}

#[derive(Deserialize)]
struct RawTrip {
    region: String,
    country: String,
    date_start: String,
    date_end: String,
    members: Vec<String>,
    rgb: Value,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

#[derive(Deserialize)]
struct RawLocation {
    location: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    zoom: Option<f64>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    sub_locations: bool,
}

/// Load and validate a trip descriptor.
pub fn load_trip(path: &Path) -> Result<TripDescriptor> {
    let raw: RawTrip = read_json(path)?;

    let date_start = parse_date(path, "date_start", &raw.date_start)?;
    let date_end = parse_date(path, "date_end", &raw.date_end)?;
    let rgb = parse_rgb(path, &raw.rgb)?;

    if raw.region.trim().is_empty() || raw.country.trim().is_empty() {
        return Err(invalid(path, "region and country must not be empty"));
    }
    if let Some(lat) = raw.latitude {
        check_latitude(path, lat)?;
    }
    if let Some(lon) = raw.longitude {
        check_longitude(path, lon)?;
    }

    Ok(TripDescriptor {
        region: raw.region,
        country: raw.country,
        date_start,
        date_end,
        members: raw.members.into_iter().collect::<BTreeSet<_>>(),
        rgb,
        latitude: raw.latitude,
        longitude: raw.longitude,
    })
}

/// Load and validate a location or sub-location descriptor.
pub fn load_location(path: &Path, level: LocationLevel) -> Result<LocationDescriptor> {
    let raw: RawLocation = read_json(path)?;

    if raw.location.trim().is_empty() {
        return Err(invalid(path, "location name must not be empty"));
    }
    check_latitude(path, raw.latitude)?;
    check_longitude(path, raw.longitude)?;
    if let Some(zoom) = raw.zoom {
        if !(zoom > 0.0) {
            return Err(invalid(path, &format!("zoom must be positive, got {zoom}")));
        }
    }
    if raw.sub_locations && level == LocationLevel::SubLocation {
        return Err(invalid(path, "sub-locations cannot contain sub-locations"));
    }
    let date = raw
        .date
        .as_deref()
        .map(|d| parse_date(path, "date", d))
        .transpose()?;

    Ok(LocationDescriptor {
        location: raw.location,
        latitude: raw.latitude,
        longitude: raw.longitude,
        zoom: raw.zoom,
        date,
        sub_locations: raw.sub_locations,
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::MissingMetadata(path.to_path_buf()))
        }
        Err(e) => return Err(invalid(path, &e.to_string())),
    };
    serde_json::from_str(&text).map_err(|e| invalid(path, &e.to_string()))
}

/// Parse a strict ISO `YYYY-MM-DD` date.
fn parse_date(path: &Path, field: &str, value: &str) -> Result<NaiveDate> {
    let well_formed = value.len() == 10
        && value
            .char_indices()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });
    let parsed = if well_formed {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
    } else {
        None
    };
    parsed.ok_or_else(|| Error::InvalidDate {
        path: path.to_path_buf(),
        message: format!("{field} {value:?} is not a YYYY-MM-DD date"),
    })
}

fn parse_rgb(path: &Path, value: &Value) -> Result<Rgb> {
    let color_error = |message: String| Error::InvalidColor {
        path: path.to_path_buf(),
        message,
    };

    let components = value
        .as_array()
        .ok_or_else(|| color_error(format!("expected an array of 3 integers, got {value}")))?;
    if components.len() != 3 {
        return Err(color_error(format!(
            "expected 3 components, got {}",
            components.len()
        )));
    }

    let mut channels = [0u8; 3];
    for (channel, component) in channels.iter_mut().zip(components) {
        let n = component
            .as_i64()
            .ok_or_else(|| color_error(format!("component {component} is not an integer")))?;
        *channel = u8::try_from(n)
            .map_err(|_| color_error(format!("component {n} is outside 0-255")))?;
    }

    Ok(Rgb(channels[0], channels[1], channels[2]))
}

fn check_latitude(path: &Path, lat: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(invalid(path, &format!("latitude {lat} is outside -90..90")));
    }
    Ok(())
}

fn check_longitude(path: &Path, lon: f64) -> Result<()> {
    if !(-180.0..=180.0).contains(&lon) {
        return Err(invalid(path, &format!("longitude {lon} is outside -180..180")));
    }
    Ok(())
}

fn invalid(path: &Path, message: &str) -> Error {
    Error::InvalidMetadata {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    const TRIP: &str = r#"{
        "region": "Catalonia",
        "country": "Spain",
        "date_start": "2022-01-01",
        "date_end": "2022-01-11",
        "members": ["person1", "person2", "person1"],
        "rgb": [10, 20, 30]
    }"#;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn trip_with(field: &str, value: &str) -> String {
        let mut json: serde_json::Value = serde_json::from_str(TRIP).unwrap();
        json[field] = serde_json::from_str(value).unwrap();
        json.to_string()
    }

    // ── load_trip ───────────────────────────────────────────────

    #[test]
    fn test_load_trip_valid() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(tmp.path(), "trip_data.json", TRIP);

        let trip = load_trip(&path).unwrap();
        assert_eq!(trip.region, "Catalonia");
        assert_eq!(trip.country, "Spain");
        assert_eq!(trip.date_start, NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
        assert_eq!(trip.date_end, NaiveDate::from_ymd_opt(2022, 1, 11).unwrap());
        assert_eq!(trip.rgb, Rgb(10, 20, 30));
        assert_eq!(trip.members.len(), 2);
        assert!(trip.latitude.is_none());
    }

    #[test]
    fn test_load_trip_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("trip_data.json");
        let err = load_trip(&path).unwrap_err();
        assert!(matches!(err, Error::MissingMetadata(p) if p == path));
    }

    #[test]
    fn test_load_trip_malformed_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(tmp.path(), "trip_data.json", "{ not json");
        assert!(matches!(load_trip(&path), Err(Error::InvalidMetadata { .. })));
    }

    #[test]
    fn test_load_trip_missing_required_field() {
        let tmp = tempfile::tempdir().unwrap();
        let mut json: serde_json::Value = serde_json::from_str(TRIP).unwrap();
        json.as_object_mut().unwrap().remove("members");
        let path = write(tmp.path(), "trip_data.json", &json.to_string());

        let err = load_trip(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidMetadata { .. }));
        assert!(err.to_string().contains("members"));
    }

    #[test]
    fn test_load_trip_invalid_date_format() {
        let tmp = tempfile::tempdir().unwrap();
        for bad in [r#""01/02/2022""#, r#""2022-1-5""#, r#""2022-02-30""#] {
            let path = write(tmp.path(), "trip_data.json", &trip_with("date_start", bad));
            assert!(
                matches!(load_trip(&path), Err(Error::InvalidDate { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_load_trip_invalid_colors() {
        let tmp = tempfile::tempdir().unwrap();
        for bad in ["[10, 20]", "[10, 20, 30, 40]", "[10, 20, 256]", "[-1, 0, 0]", "[1.5, 0, 0]", r#""red""#] {
            let path = write(tmp.path(), "trip_data.json", &trip_with("rgb", bad));
            assert!(
                matches!(load_trip(&path), Err(Error::InvalidColor { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_load_trip_color_bounds_inclusive() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(tmp.path(), "trip_data.json", &trip_with("rgb", "[0, 128, 255]"));
        assert_eq!(load_trip(&path).unwrap().rgb, Rgb(0, 128, 255));
    }

    #[test]
    fn test_load_trip_optional_coordinates() {
        let tmp = tempfile::tempdir().unwrap();
        let mut json: serde_json::Value = serde_json::from_str(TRIP).unwrap();
        json["latitude"] = 41.4.into();
        json["longitude"] = 2.1.into();
        let path = write(tmp.path(), "trip_data.json", &json.to_string());

        let trip = load_trip(&path).unwrap();
        assert_eq!(trip.latitude, Some(41.4));
        assert_eq!(trip.longitude, Some(2.1));
    }

    // ── load_location ───────────────────────────────────────────

    #[test]
    fn test_load_location_valid() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "location_data.json",
            r#"{"location": "Tibidabo", "date": "2022-01-02", "latitude": 41.41418, "longitude": 2.13413}"#,
        );

        let loc = load_location(&path, LocationLevel::Location).unwrap();
        assert_eq!(loc.location, "Tibidabo");
        assert_eq!(loc.date, NaiveDate::from_ymd_opt(2022, 1, 2));
        assert!(loc.zoom.is_none());
        assert!(!loc.sub_locations);
    }

    #[test]
    fn test_load_location_integer_coordinates() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "location_data.json",
            r#"{"location": "Null Island", "latitude": 0, "longitude": 0, "zoom": 9}"#,
        );
        let loc = load_location(&path, LocationLevel::Location).unwrap();
        assert_eq!(loc.latitude, 0.0);
        assert_eq!(loc.zoom, Some(9.0));
    }

    #[test]
    fn test_load_location_missing_latitude() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "location_data.json",
            r#"{"location": "Somewhere", "longitude": 2.0}"#,
        );
        let err = load_location(&path, LocationLevel::Location).unwrap_err();
        assert!(err.to_string().contains("latitude"));
    }

    #[test]
    fn test_load_location_out_of_range_coordinates() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "location_data.json",
            r#"{"location": "Nowhere", "latitude": 91.0, "longitude": 2.0}"#,
        );
        assert!(matches!(
            load_location(&path, LocationLevel::Location),
            Err(Error::InvalidMetadata { .. })
        ));
    }

    #[test]
    fn test_load_location_bad_date() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "location_data.json",
            r#"{"location": "X", "latitude": 1.0, "longitude": 2.0, "date": "yesterday"}"#,
        );
        assert!(matches!(
            load_location(&path, LocationLevel::Location),
            Err(Error::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_load_location_nonpositive_zoom() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "location_data.json",
            r#"{"location": "X", "latitude": 1.0, "longitude": 2.0, "zoom": 0}"#,
        );
        assert!(load_location(&path, LocationLevel::Location).is_err());
    }

    #[test]
    fn test_load_sub_location_rejects_marker() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "location_data.json",
            r#"{"location": "X", "latitude": 1.0, "longitude": 2.0, "sub_locations": true}"#,
        );
        assert!(load_location(&path, LocationLevel::Location).unwrap().sub_locations);
        assert!(matches!(
            load_location(&path, LocationLevel::SubLocation),
            Err(Error::InvalidMetadata { .. })
        ));
    }
}
