use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use tripmap_core::TripArchive;

pub fn run(archive: &TripArchive, person: Option<&str>) -> Result<()> {
    match person {
        Some(person) => list_trips_of(archive, person),
        None => show_matrix(archive),
    }
}

fn list_trips_of(archive: &TripArchive, person: &str) -> Result<()> {
    let trip_ids = archive.membership.trips_attended_by(person);
    if trip_ids.is_empty() {
        println!("{person} attended no trips.");
        return Ok(());
    }
    for id in trip_ids {
        let label = archive.labels.trip_label(id).unwrap_or(id);
        println!("{label}");
    }
    Ok(())
}

fn show_matrix(archive: &TripArchive) -> Result<()> {
    let membership = &archive.membership;
    if membership.participants().is_empty() {
        println!("No participants recorded.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("Trip")];
    header.extend(membership.participants().iter().map(Cell::new));
    table.set_header(header);

    for row in membership.rows() {
        let label = archive
            .labels
            .trip_label(&row.trip_id)
            .unwrap_or(row.trip_id.as_str());
        let mut cells = vec![Cell::new(label)];
        cells.extend(row.attended.iter().map(|&attended| {
            Cell::new(if attended { "x" } else { "" }).set_alignment(CellAlignment::Center)
        }));
        table.add_row(cells);
    }

    println!("{table}");
    Ok(())
}
