use anyhow::{bail, Result};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use tripmap_core::TripArchive;

use super::{find_location, find_trip};

pub fn run(archive: &TripArchive, trip_label: &str, location: Option<&str>) -> Result<()> {
    let trip = find_trip(archive, trip_label)?;

    match location {
        None => list_locations(archive, &trip.id),
        Some(name) => {
            let location = find_location(archive, trip, name)?;
            list_sub_locations(archive, &trip.id, &location.id, name)
        }
    }
}

fn coordinates(lat: f64, lon: f64) -> String {
    format!("{lat:.5}, {lon:.5}")
}

fn list_locations(archive: &TripArchive, trip_id: &str) -> Result<()> {
    let rows = archive.catalog.locations_table(trip_id).unwrap_or_default();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Location"),
        Cell::new("Date"),
        Cell::new("Coordinates"),
        Cell::new("Zoom"),
        Cell::new("Sub-locations"),
        Cell::new("Media"),
    ]);

    for row in &rows {
        table.add_row(vec![
            Cell::new(&row.location),
            Cell::new(row.date.map(|d| d.to_string()).unwrap_or_default()),
            Cell::new(coordinates(row.latitude, row.longitude)),
            Cell::new(row.zoom.map(|z| z.to_string()).unwrap_or_default()),
            Cell::new(if row.sub_locations > 0 {
                row.sub_locations.to_string()
            } else {
                String::new()
            }),
            Cell::new(row.media),
        ]);
    }

    println!("{table}");
    Ok(())
}

fn list_sub_locations(
    archive: &TripArchive,
    trip_id: &str,
    location_id: &str,
    name: &str,
) -> Result<()> {
    let Some(sub_table) = archive.catalog.sub_locations_table(trip_id, location_id) else {
        bail!("location {name:?} holds media directly and has no sub-locations");
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Sub-location"),
        Cell::new("Date"),
        Cell::new("Coordinates"),
        Cell::new("Media"),
    ]);

    for row in &sub_table.rows {
        table.add_row(vec![
            Cell::new(&row.location),
            Cell::new(row.date.map(|d| d.to_string()).unwrap_or_default()),
            Cell::new(coordinates(row.latitude, row.longitude)),
            Cell::new(row.media),
        ]);
    }

    println!("  {name} (zoom {})", sub_table.zoom);
    println!("{table}");
    Ok(())
}
