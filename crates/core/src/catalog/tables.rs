//! Flat per-level tables consumed by map renderers.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Location, LocationKind, SubLocation, Trip};

/// One row per trip, for the world map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRow {
    pub trip_id: String,
    pub label_text: String,
    pub region: String,
    pub country: String,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub days_spent: i64,
    pub time_spent_scale: f64,
    pub rgb: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub members: Vec<String>,
    pub locations: usize,
    pub media: usize,
}

impl From<&Trip> for TripRow {
    fn from(trip: &Trip) -> Self {
        let d = &trip.descriptor;
        Self {
            trip_id: trip.id.clone(),
            label_text: trip.label_text.clone(),
            region: d.region.clone(),
            country: d.country.clone(),
            date_start: d.date_start,
            date_end: d.date_end,
            days_spent: trip.days_spent,
            time_spent_scale: trip.time_spent_scale,
            rgb: trip.rgb_css.clone(),
            latitude: d.latitude,
            longitude: d.longitude,
            members: d.members.iter().cloned().collect(),
            locations: trip.locations.len(),
            media: trip.media_count(),
        }
    }
}

/// One row per location of a trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRow {
    pub location_id: String,
    pub location: String,
    pub date: Option<NaiveDate>,
    pub latitude: f64,
    pub longitude: f64,
    pub rgb: String,
    pub point_size: f64,
    pub zoom: Option<f64>,
    /// Zero for locations that hold media directly.
    pub sub_locations: usize,
    pub media: usize,
}

impl From<&Location> for LocationRow {
    fn from(location: &Location) -> Self {
        let sub_locations = match &location.kind {
            LocationKind::Leaf(_) => 0,
            LocationKind::Group { sub_locations, .. } => sub_locations.len(),
        };
        Self {
            location_id: location.id.clone(),
            location: location.name.clone(),
            date: location.date,
            latitude: location.latitude,
            longitude: location.longitude,
            rgb: location.style.rgb_css.clone(),
            point_size: location.style.point_size,
            zoom: location.zoom,
            sub_locations,
            media: location.media_count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubLocationRow {
    pub sub_location_id: String,
    pub location: String,
    pub date: Option<NaiveDate>,
    pub latitude: f64,
    pub longitude: f64,
    pub rgb: String,
    pub point_size: f64,
    pub media: usize,
}

impl From<&SubLocation> for SubLocationRow {
    fn from(sub: &SubLocation) -> Self {
        Self {
            sub_location_id: sub.id.clone(),
            location: sub.name.clone(),
            date: sub.date,
            latitude: sub.latitude,
            longitude: sub.longitude,
            rgb: sub.style.rgb_css.clone(),
            point_size: sub.style.point_size,
            media: sub.media.len(),
        }
    }
}

/// Sub-locations of one group location, with the zoom for its map view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubLocationsTable {
    pub zoom: f64,
    pub rows: Vec<SubLocationRow>,
}
