pub mod catalog;
pub mod config;
pub mod descriptor;
pub mod domain;
pub mod error;
pub mod labels;
pub mod membership;
pub mod scanner;

use std::path::Path;

use serde::Serialize;

use catalog::builder::CatalogBuilder;
use catalog::Catalog;
use config::CatalogConfig;
use error::Result;
use labels::LabelIndex;
use membership::Membership;

/// Progress events emitted while building a catalog.
pub enum BuildProgress {
    /// The archive root was listed.
    TripsDiscovered { count: usize },
    /// A trip subtree was built and merged (reported in catalog order).
    TripBuilt {
        trip_id: String,
        locations: usize,
        media: usize,
    },
    /// Build completed.
    Complete { trips: usize, media: usize },
}

/// The main entry point: a built catalog with its label lookups and
/// membership encoding, all derived from one snapshot of the archive.
#[derive(Debug, Clone, Serialize)]
pub struct TripArchive {
    pub catalog: Catalog,
    pub labels: LabelIndex,
    pub membership: Membership,
}

impl TripArchive {
    /// Build everything from the archive at `root`.
    pub fn open(root: &Path, config: &CatalogConfig) -> Result<Self> {
        Self::open_with_progress(root, config, None)
    }

    /// Like [`TripArchive::open`], calling `progress_cb` as the build advances.
    pub fn open_with_progress(
        root: &Path,
        config: &CatalogConfig,
        progress_cb: Option<&mut dyn FnMut(BuildProgress)>,
    ) -> Result<Self> {
        let catalog = CatalogBuilder::new(root, config).build(progress_cb)?;
        let labels = LabelIndex::build(&catalog)?;
        let membership = Membership::encode(catalog.trips());
        Ok(Self {
            catalog,
            labels,
            membership,
        })
    }

    /// Resolve a trip label (as shown to users) to its trip.
    pub fn trip_by_label(&self, label: &str) -> Option<&domain::Trip> {
        self.catalog.trip(self.labels.trip_dir(label)?)
    }
}
