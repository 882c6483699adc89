pub mod locations;
pub mod media;
pub mod members;
pub mod trips;

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tripmap_core::config::CatalogConfig;
use tripmap_core::domain::{Location, Trip};
use tripmap_core::{BuildProgress, TripArchive};

/// Build the archive, showing a progress bar on stderr.
pub fn open_archive(root: &Path, config: &CatalogConfig) -> Result<TripArchive> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );
    pb.set_message("Reading archive...");

    let archive = TripArchive::open_with_progress(
        root,
        config,
        Some(&mut |progress| match progress {
            BuildProgress::TripsDiscovered { count } => {
                pb.set_length(count as u64);
                pb.set_position(0);
            }
            BuildProgress::TripBuilt { trip_id, .. } => {
                pb.inc(1);
                pb.set_message(trip_id);
            }
            BuildProgress::Complete { trips, media } => {
                pb.finish_and_clear();
                tracing::info!(trips, media, "archive loaded");
            }
        }),
    );
    pb.finish_and_clear();

    archive.with_context(|| format!("failed to catalog {}", root.display()))
}

/// Resolve a trip by its label.
pub(crate) fn find_trip<'a>(archive: &'a TripArchive, label: &str) -> Result<&'a Trip> {
    archive
        .trip_by_label(label)
        .ok_or_else(|| anyhow!("no trip labelled {label:?}; run `tripmap trips` to list them"))
}

/// Resolve a location of `trip` by its display name.
pub(crate) fn find_location<'a>(
    archive: &TripArchive,
    trip: &'a Trip,
    name: &str,
) -> Result<&'a Location> {
    archive
        .labels
        .location_dir(&trip.id, name)
        .and_then(|id| trip.location(id))
        .ok_or_else(|| anyhow!("trip {:?} has no location named {name:?}", trip.label_text))
}
