use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::domain::LocationKind;
use crate::error::{Error, Result};

/// Where a label must be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum LabelScope {
    Trips,
    Locations { trip: String },
    SubLocations { trip: String, location: String },
}

impl fmt::Display for LabelScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelScope::Trips => write!(f, "trips"),
            LabelScope::Locations { trip } => write!(f, "locations of trip {trip:?}"),
            LabelScope::SubLocations { trip, location } => {
                write!(f, "sub-locations of {trip:?}/{location:?}")
            }
        }
    }
}

/// Bijective label <-> directory id mapping for one scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabelMap {
    by_label: BTreeMap<String, String>,
    by_dir: BTreeMap<String, String>,
}

impl LabelMap {
    /// Insert a pair, failing if the label is already taken. Directory ids
    /// come from one listing, so they are unique within a scope.
    pub(crate) fn insert(&mut self, scope: &LabelScope, label: &str, dir: &str) -> Result<()> {
        if let Some(first) = self.by_label.get(label) {
            return Err(Error::DuplicateLabel {
                scope: scope.clone(),
                label: label.to_string(),
                first: first.clone(),
                second: dir.to_string(),
            });
        }
        self.by_label.insert(label.to_string(), dir.to_string());
        self.by_dir.insert(dir.to_string(), label.to_string());
        Ok(())
    }

    pub fn dir(&self, label: &str) -> Option<&str> {
        self.by_label.get(label).map(String::as_str)
    }

    pub fn label(&self, dir: &str) -> Option<&str> {
        self.by_dir.get(dir).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }
}

/// Label lookups at every level of a catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabelIndex {
    trips: LabelMap,
    /// trip id -> location names
    locations: BTreeMap<String, LabelMap>,
    /// trip id -> location id -> sub-location names
    sub_locations: BTreeMap<String, BTreeMap<String, LabelMap>>,
}

impl LabelIndex {
    pub fn build(catalog: &Catalog) -> Result<Self> {
        let mut index = Self::default();

        for trip in catalog.trips() {
            index
                .trips
                .insert(&LabelScope::Trips, &trip.label_text, &trip.id)?;

            let location_scope = LabelScope::Locations {
                trip: trip.id.clone(),
            };
            let locations = index.locations.entry(trip.id.clone()).or_default();
            for location in &trip.locations {
                locations.insert(&location_scope, &location.name, &location.id)?;

                if let LocationKind::Group { sub_locations, .. } = &location.kind {
                    let sub_scope = LabelScope::SubLocations {
                        trip: trip.id.clone(),
                        location: location.id.clone(),
                    };
                    let subs = index
                        .sub_locations
                        .entry(trip.id.clone())
                        .or_default()
                        .entry(location.id.clone())
                        .or_default();
                    for sub in sub_locations {
                        subs.insert(&sub_scope, &sub.name, &sub.id)?;
                    }
                }
            }
        }

        Ok(index)
    }

    pub fn trips(&self) -> &LabelMap {
        &self.trips
    }

    pub fn trip_dir(&self, label: &str) -> Option<&str> {
        self.trips.dir(label)
    }

    pub fn trip_label(&self, trip_id: &str) -> Option<&str> {
        self.trips.label(trip_id)
    }

    pub fn locations(&self, trip_id: &str) -> Option<&LabelMap> {
        self.locations.get(trip_id)
    }

    pub fn location_dir(&self, trip_id: &str, name: &str) -> Option<&str> {
        self.locations.get(trip_id)?.dir(name)
    }

    pub fn location_name(&self, trip_id: &str, location_id: &str) -> Option<&str> {
        self.locations.get(trip_id)?.label(location_id)
    }

    /// Only group locations have a sub-location scope.
    pub fn sub_locations(&self, trip_id: &str, location_id: &str) -> Option<&LabelMap> {
        self.sub_locations.get(trip_id)?.get(location_id)
    }

    pub fn sub_location_dir(&self, trip_id: &str, location_id: &str, name: &str) -> Option<&str> {
        self.sub_locations(trip_id, location_id)?.dir(name)
    }

    pub fn sub_location_name(
        &self,
        trip_id: &str,
        location_id: &str,
        sub_location_id: &str,
    ) -> Option<&str> {
        self.sub_locations(trip_id, location_id)?
            .label(sub_location_id)
    }
}
