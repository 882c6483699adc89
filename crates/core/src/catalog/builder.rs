use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::Datelike;
use rayon::prelude::*;
use tracing::{debug, info, info_span};

use super::Catalog;
use crate::config::CatalogConfig;
use crate::descriptor::{self, LocationLevel};
use crate::domain::*;
use crate::error::{Error, Result};
use crate::labels::{LabelMap, LabelScope};
use crate::scanner::{self, Entry};
use crate::BuildProgress;

/// Walks an archive root and assembles a [`Catalog`].
///
/// Trips, the locations of one trip and the sub-locations of one group are
/// all built in parallel, and the results are merged in directory order. Any
/// invalid node fails the build.
pub struct CatalogBuilder<'a> {
    root: PathBuf,
    config: &'a CatalogConfig,
}

#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Instant,
    budget: Duration,
}

impl Deadline {
    fn check(deadline: Option<Deadline>) -> Result<()> {
        match deadline {
            Some(d) if Instant::now() >= d.at => Err(Error::BuildTimedOut(d.budget)),
            _ => Ok(()),
        }
    }
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(root: &Path, config: &'a CatalogConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
        }
    }

    pub fn build(&self, mut progress: Option<&mut dyn FnMut(BuildProgress)>) -> Result<Catalog> {
        let _span = info_span!("build_catalog", root = %self.root.display()).entered();
        self.config.validate()?;
        let started = Instant::now();
        // A budget too large to add to `now` is treated as no deadline.
        let deadline = self.config.timeout().and_then(|budget| {
            started
                .checked_add(budget)
                .map(|at| Deadline { at, budget })
        });

        let listing = scanner::scan_directory(&self.root, &self.config.trip_descriptor)?;
        if let Some(path) = listing.descriptor {
            return Err(Error::UnexpectedEntry(path));
        }
        if let Some(file) = listing.files.first() {
            return Err(Error::UnexpectedEntry(file.path.clone()));
        }

        if let Some(ref mut cb) = progress {
            cb(BuildProgress::TripsDiscovered {
                count: listing.dirs.len(),
            });
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .build()?;

        // Collect every result before looking at errors so the reported
        // failure is the first one in directory order.
        let results: Vec<Result<Trip>> = pool.install(|| {
            listing
                .dirs
                .par_iter()
                .map(|entry| self.build_trip(entry, deadline))
                .collect()
        });
        Deadline::check(deadline)?;
        let trips = results.into_iter().collect::<Result<Vec<_>>>()?;

        let mut labels = LabelMap::default();
        for trip in &trips {
            labels.insert(&LabelScope::Trips, &trip.label_text, &trip.id)?;
        }

        let media: usize = trips.iter().map(Trip::media_count).sum();
        if let Some(ref mut cb) = progress {
            for trip in &trips {
                cb(BuildProgress::TripBuilt {
                    trip_id: trip.id.clone(),
                    locations: trip.locations.len(),
                    media: trip.media_count(),
                });
            }
            cb(BuildProgress::Complete {
                trips: trips.len(),
                media,
            });
        }

        info!(
            trips = trips.len(),
            media,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "catalog built"
        );
        Ok(Catalog::new(self.root.clone(), trips))
    }

    fn build_trip(&self, entry: &Entry, deadline: Option<Deadline>) -> Result<Trip> {
        Deadline::check(deadline)?;

        let listing = scanner::scan_directory(&entry.path, &self.config.trip_descriptor)?;
        let descriptor_path = listing
            .descriptor
            .ok_or_else(|| Error::MissingMetadata(entry.path.join(&self.config.trip_descriptor)))?;
        let descriptor = descriptor::load_trip(&descriptor_path)?;
        if let Some(file) = listing.files.first() {
            return Err(Error::UnexpectedEntry(file.path.clone()));
        }

        if descriptor.date_end <= descriptor.date_start {
            return Err(Error::InvalidDate {
                path: descriptor_path,
                message: format!(
                    "date_end {} must be after date_start {}",
                    descriptor.date_end, descriptor.date_start
                ),
            });
        }
        let days_spent = (descriptor.date_end - descriptor.date_start).num_days();
        let time_spent_scale = time_spent_scale(days_spent);
        let label_text = trip_label(&descriptor);
        let rgb_css = descriptor.rgb.css();

        let style = MarkerStyle {
            rgb_css: rgb_css.clone(),
            point_size: self.config.point_size,
        };

        let results: Vec<Result<Location>> = listing
            .dirs
            .par_iter()
            .map(|loc| self.build_location(&entry.name, loc, &style, deadline))
            .collect();
        let locations = results.into_iter().collect::<Result<Vec<_>>>()?;

        let scope = LabelScope::Locations {
            trip: entry.name.clone(),
        };
        let mut names = LabelMap::default();
        for location in &locations {
            names.insert(&scope, &location.name, &location.id)?;
        }

        debug!(trip = %entry.name, locations = locations.len(), "built trip");
        Ok(Trip {
            id: entry.name.clone(),
            descriptor,
            label_text,
            days_spent,
            time_spent_scale,
            rgb_css,
            locations,
        })
    }

    fn build_location(
        &self,
        trip_id: &str,
        entry: &Entry,
        style: &MarkerStyle,
        deadline: Option<Deadline>,
    ) -> Result<Location> {
        Deadline::check(deadline)?;

        let listing = scanner::scan_directory(&entry.path, &self.config.location_descriptor)?;
        let descriptor_path = listing.descriptor.ok_or_else(|| {
            Error::MissingMetadata(entry.path.join(&self.config.location_descriptor))
        })?;
        let descriptor = descriptor::load_location(&descriptor_path, LocationLevel::Location)?;

        let kind = if descriptor.sub_locations {
            if let Some(file) = listing.files.first() {
                return Err(ambiguous(
                    &entry.path,
                    format!("marked as having sub-locations but holds file {:?}", file.name),
                ));
            }
            if listing.dirs.is_empty() {
                return Err(ambiguous(
                    &entry.path,
                    "marked as having sub-locations but has none".to_string(),
                ));
            }

            let default_zoom = descriptor
                .zoom
                .or(self.config.default_group_zoom)
                .ok_or_else(|| Error::InvalidMetadata {
                    path: descriptor_path.clone(),
                    message: "zoom is required on a location with sub-locations".to_string(),
                })?;

            let results: Vec<Result<SubLocation>> = listing
                .dirs
                .par_iter()
                .map(|sub| self.build_sub_location(sub, style, deadline))
                .collect();
            let sub_locations = results.into_iter().collect::<Result<Vec<_>>>()?;

            let scope = LabelScope::SubLocations {
                trip: trip_id.to_string(),
                location: entry.name.clone(),
            };
            let mut names = LabelMap::default();
            for sub in &sub_locations {
                names.insert(&scope, &sub.name, &sub.id)?;
            }

            LocationKind::Group {
                default_zoom,
                sub_locations,
            }
        } else {
            if let Some(dir) = listing.dirs.first() {
                return Err(ambiguous(
                    &entry.path,
                    format!(
                        "holds directory {:?} but is not marked as having sub-locations",
                        dir.name
                    ),
                ));
            }
            if listing.files.is_empty() {
                return Err(ambiguous(
                    &entry.path,
                    "holds neither media files nor sub-locations".to_string(),
                ));
            }
            LocationKind::Leaf(MediaGroup::from_names(
                listing.files.into_iter().map(|f| f.name),
            ))
        };

        let location = Location {
            id: entry.name.clone(),
            name: descriptor.location,
            latitude: descriptor.latitude,
            longitude: descriptor.longitude,
            zoom: descriptor.zoom,
            date: descriptor.date,
            style: style.clone(),
            kind,
        };
        debug!(location = %entry.path.display(), media = location.media_count(), "built location");
        Ok(location)
    }

    fn build_sub_location(
        &self,
        entry: &Entry,
        style: &MarkerStyle,
        deadline: Option<Deadline>,
    ) -> Result<SubLocation> {
        Deadline::check(deadline)?;

        let listing = scanner::scan_directory(&entry.path, &self.config.location_descriptor)?;
        let descriptor_path = listing.descriptor.ok_or_else(|| {
            Error::MissingMetadata(entry.path.join(&self.config.location_descriptor))
        })?;
        let descriptor = descriptor::load_location(&descriptor_path, LocationLevel::SubLocation)?;

        if let Some(dir) = listing.dirs.first() {
            return Err(ambiguous(
                &entry.path,
                format!("sub-locations cannot contain directories, found {:?}", dir.name),
            ));
        }
        if listing.files.is_empty() {
            return Err(ambiguous(&entry.path, "holds no media files".to_string()));
        }

        Ok(SubLocation {
            id: entry.name.clone(),
            name: descriptor.location,
            latitude: descriptor.latitude,
            longitude: descriptor.longitude,
            date: descriptor.date,
            style: style.clone(),
            media: MediaGroup::from_names(listing.files.into_iter().map(|f| f.name)),
        })
    }
}

/// `"{region}, {country} ({year})"`
pub fn trip_label(descriptor: &TripDescriptor) -> String {
    format!(
        "{}, {} ({})",
        descriptor.region,
        descriptor.country,
        descriptor.date_start.year()
    )
}

/// Marker size scale for a trip: `log10(days) + 1`.
pub fn time_spent_scale(days: i64) -> f64 {
    (days as f64).log10() + 1.0
}

fn ambiguous(path: &Path, reason: String) -> Error {
    Error::AmbiguousLocationKind {
        path: path.to_path_buf(),
        reason,
    }
}
