use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use tripmap_core::TripArchive;

pub fn run(archive: &TripArchive, json: bool) -> Result<()> {
    let rows = archive.catalog.trips_table();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No trips found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Trip"),
        Cell::new("From"),
        Cell::new("To"),
        Cell::new("Days"),
        Cell::new("Scale"),
        Cell::new("Color"),
        Cell::new("Locations"),
        Cell::new("Media"),
        Cell::new("Members"),
    ]);

    for row in &rows {
        table.add_row(vec![
            Cell::new(&row.label_text),
            Cell::new(row.date_start),
            Cell::new(row.date_end),
            Cell::new(row.days_spent),
            Cell::new(format!("{:.2}", row.time_spent_scale)),
            Cell::new(&row.rgb),
            Cell::new(row.locations),
            Cell::new(row.media),
            Cell::new(row.members.join(", ")),
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} trips, {} media files",
        rows.len(),
        archive.catalog.media_count()
    );
    Ok(())
}
