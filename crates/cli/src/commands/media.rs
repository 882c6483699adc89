use anyhow::{anyhow, Result};
use tripmap_core::domain::LocationKind;
use tripmap_core::TripArchive;

use super::{find_location, find_trip};

pub fn run(
    archive: &TripArchive,
    trip_label: &str,
    location_name: &str,
    sub_location_name: Option<&str>,
) -> Result<()> {
    let trip = find_trip(archive, trip_label)?;
    let location = find_location(archive, trip, location_name)?;

    let sub_id = match (&location.kind, sub_location_name) {
        (LocationKind::Leaf(_), None) => None,
        (LocationKind::Leaf(_), Some(_)) => {
            return Err(anyhow!("location {location_name:?} has no sub-locations"))
        }
        (LocationKind::Group { .. }, None) => {
            return Err(anyhow!(
                "location {location_name:?} is split into sub-locations; name one of them"
            ))
        }
        (LocationKind::Group { .. }, Some(name)) => Some(
            archive
                .labels
                .sub_location_dir(&trip.id, &location.id, name)
                .ok_or_else(|| anyhow!("location {location_name:?} has no sub-location {name:?}"))?,
        ),
    };

    let paths = archive
        .catalog
        .media_paths(&trip.id, &location.id, sub_id)
        .unwrap_or_default();
    for path in paths {
        println!("{}", path.display());
    }
    Ok(())
}
