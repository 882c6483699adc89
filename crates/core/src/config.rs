use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_TRIP_DESCRIPTOR: &str = "trip_data.json";
pub const DEFAULT_LOCATION_DESCRIPTOR: &str = "location_data.json";

/// Marker size used for every location and sub-location on the maps.
pub const DEFAULT_POINT_SIZE: f64 = 4.0;

/// Settings for a catalog build. Every field has a default, so a config file
/// only needs to name the values it overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// File name of the descriptor inside each trip directory.
    pub trip_descriptor: String,
    /// File name of the descriptor inside each location and sub-location directory.
    pub location_descriptor: String,
    pub point_size: f64,
    /// Zoom applied to a sub-location group whose descriptor has none.
    /// `None` makes `zoom` mandatory on group locations.
    pub default_group_zoom: Option<f64>,
    /// Worker threads for building trips (0 = one per core).
    pub threads: usize,
    /// Whole-build deadline in seconds.
    pub timeout_secs: Option<u64>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            trip_descriptor: DEFAULT_TRIP_DESCRIPTOR.to_string(),
            location_descriptor: DEFAULT_LOCATION_DESCRIPTOR.to_string(),
            point_size: DEFAULT_POINT_SIZE,
            default_group_zoom: None,
            threads: 0,
            timeout_secs: None,
        }
    }
}

impl CatalogConfig {
    /// Load a JSON config file, filling unspecified fields with defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if let Some(message) = config.problem() {
            return Err(Error::Config {
                path: path.to_path_buf(),
                message: message.to_string(),
            });
        }
        Ok(config)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Reject values no build can use. Runs at the start of every build, so
    /// configs assembled in code or from CLI flags are checked too.
    pub fn validate(&self) -> Result<()> {
        match self.problem() {
            Some(message) => Err(Error::InvalidConfig(message.to_string())),
            None => Ok(()),
        }
    }

    fn problem(&self) -> Option<&'static str> {
        if self.trip_descriptor.is_empty() || self.location_descriptor.is_empty() {
            return Some("descriptor file names must not be empty");
        }
        if self.trip_descriptor == self.location_descriptor {
            return Some("trip and location descriptors must have different names");
        }
        if !(self.point_size > 0.0 && self.point_size.is_finite()) {
            return Some("point_size must be positive");
        }
        if matches!(self.default_group_zoom, Some(z) if !(z > 0.0 && z.is_finite())) {
            return Some("default_group_zoom must be positive");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_match_archive_layout() {
        let config = CatalogConfig::default();
        assert_eq!(config.trip_descriptor, "trip_data.json");
        assert_eq!(config.location_descriptor, "location_data.json");
        assert_eq!(config.point_size, 4.0);
        assert!(config.default_group_zoom.is_none());
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_from_file_partial_overrides() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{"default_group_zoom": 12.5, "timeout_secs": 30}"#).unwrap();

        let config = CatalogConfig::from_file(&path).unwrap();
        assert_eq!(config.default_group_zoom, Some(12.5));
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.trip_descriptor, DEFAULT_TRIP_DESCRIPTOR);
    }

    #[test]
    fn test_from_file_rejects_unknown_field() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{"zoom": 3}"#).unwrap();

        let err = CatalogConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_from_file_rejects_same_descriptor_names() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(
            &path,
            r#"{"trip_descriptor": "meta.json", "location_descriptor": "meta.json"}"#,
        )
        .unwrap();

        assert!(CatalogConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_validate_rejects_negative_group_zoom() {
        let config = CatalogConfig {
            default_group_zoom: Some(-5.0),
            ..CatalogConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_nonpositive_point_size() {
        for point_size in [0.0, -1.0, f64::NAN] {
            let config = CatalogConfig {
                point_size,
                ..CatalogConfig::default()
            };
            assert!(config.validate().is_err(), "{point_size} should be rejected");
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(CatalogConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_file_missing() {
        let err = CatalogConfig::from_file(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(err.to_string().contains("invalid config"));
    }
}
