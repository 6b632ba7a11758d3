use super::{RunConfig, open_and_bootstrap};
use crate::error::Result;
use crate::types::StoredPoint;

/// Example 1: store the configured places as points and read them back.
///
/// The table and its geometry column are created only if missing, so the
/// walkthrough can be repeated against the same file; every repeat appends
/// another copy of the places.
pub fn build_point_catalog(config: &RunConfig) -> Result<Vec<StoredPoint>> {
    let mut db = open_and_bootstrap(config)?;
    let column = &config.catalog_column;

    println!("Creating table: {}", column.table);
    db.create_points_table(&column.table)?;

    println!("Adding geometry column to table: {}", column.table);
    db.add_geometry_column(column)?;

    println!("Adding some tourist places in Brazil...");
    let inserted = db.insert_points(column, config.places, |point| {
        println!("Adding {}: {}", point.name, point.wkt);
    })?;
    println!("Committed {inserted} places");

    let stored = db.list_points(column)?;
    println!("Table {} now holds:", column.table);
    for point in &stored {
        println!(
            "  {} {}: ({}, {})",
            point.id,
            point.name.as_deref().unwrap_or("<unnamed>"),
            point.x,
            point.y
        );
    }

    db.close()?;
    println!("{} Done.", config.example);
    Ok(stored)
}
