pub mod builder;
pub mod tables;

use std::path::PathBuf;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::domain::*;
use crate::error::Result;
use tables::{LocationRow, SubLocationRow, SubLocationsTable, TripRow};

/// Immutable in-memory catalog of a trip archive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    #[serde(skip)]
    root: PathBuf,
    trips: Vec<Trip>,
}

impl Catalog {
    pub(crate) fn new(root: PathBuf, trips: Vec<Trip>) -> Self {
        Self { root, trips }
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn trip(&self, id: &str) -> Option<&Trip> {
        self.trips.iter().find(|t| t.id == id)
    }

    /// Trip directory names in build order.
    pub fn trip_ids(&self) -> Vec<&str> {
        self.trips.iter().map(|t| t.id.as_str()).collect()
    }

    pub fn media_count(&self) -> usize {
        self.trips.iter().map(Trip::media_count).sum()
    }

    // ── Tables ───────────────────────────────────────────────────────

    pub fn trips_table(&self) -> Vec<TripRow> {
        self.trips.iter().map(TripRow::from).collect()
    }

    pub fn locations_table(&self, trip_id: &str) -> Option<Vec<LocationRow>> {
        let trip = self.trip(trip_id)?;
        Some(trip.locations.iter().map(LocationRow::from).collect())
    }

    /// `None` unless the location exists and is split into sub-locations.
    pub fn sub_locations_table(
        &self,
        trip_id: &str,
        location_id: &str,
    ) -> Option<SubLocationsTable> {
        let location = self.trip(trip_id)?.location(location_id)?;
        match &location.kind {
            LocationKind::Leaf(_) => None,
            LocationKind::Group {
                default_zoom,
                sub_locations,
            } => Some(SubLocationsTable {
                zoom: *default_zoom,
                rows: sub_locations.iter().map(SubLocationRow::from).collect(),
            }),
        }
    }

    // ── Media ────────────────────────────────────────────────────────

    /// Media of a leaf location, or of one sub-location of a group location.
    pub fn media(
        &self,
        trip_id: &str,
        location_id: &str,
        sub_location_id: Option<&str>,
    ) -> Option<&MediaGroup> {
        let location = self.trip(trip_id)?.location(location_id)?;
        match (&location.kind, sub_location_id) {
            (LocationKind::Leaf(media), None) => Some(media),
            (LocationKind::Group { .. }, Some(sub_id)) => {
                Some(&location.sub_location(sub_id)?.media)
            }
            _ => None,
        }
    }

    /// Absolute paths of the media returned by [`Catalog::media`].
    pub fn media_paths(
        &self,
        trip_id: &str,
        location_id: &str,
        sub_location_id: Option<&str>,
    ) -> Option<Vec<PathBuf>> {
        let media = self.media(trip_id, location_id, sub_location_id)?;
        let mut dir = self.root.join(trip_id).join(location_id);
        if let Some(sub_id) = sub_location_id {
            dir.push(sub_id);
        }
        Some(media.files.iter().map(|f| dir.join(&f.name)).collect())
    }

    /// SHA-256 of the catalog's JSON form. Equal archives give equal fingerprints.
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(format!("{:x}", Sha256::digest(&bytes)))
    }
}
