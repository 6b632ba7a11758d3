use super::{RunConfig, open_and_bootstrap};
use crate::error::Result;
use crate::types::Containment;

/// The region found (or not) for one probe point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionReport {
    pub name: &'static str,
    pub containment: Containment,
}

/// Example 2: import the configured shapefile and look up each probe point.
pub fn lookup_regions(config: &RunConfig) -> Result<Vec<RegionReport>> {
    let db = open_and_bootstrap(config)?;
    let import = &config.shapefile;

    println!("Importing shapefile: {}", import.path);
    match db.import_shapefile(import)? {
        Some(rows) => println!("Imported {rows} rows into {}", import.target.table),
        None => println!("Table {} already present, reusing it", import.target.table),
    }

    println!("Checking which region holds each of the following points:");
    let mut reports = Vec::with_capacity(config.probes.len());
    for point in config.probes {
        let containment = db.locate(&import.target, point, config.probe_srid)?;
        println!("{} ---> {containment}", point.name);
        reports.push(RegionReport {
            name: point.name,
            containment,
        });
    }

    db.close()?;
    println!("{} Done.", config.example);
    Ok(reports)
}
