//! The two walkthroughs and the configuration that selects between them.
//!
//! Each run opens its own `SpatialDb`, bootstraps the spatial metadata, does
//! its work and closes the database. Any error returns early, and dropping
//! the `SpatialDb` on the way out releases the connection together with the
//! extension's cache.

mod point_catalog;
mod region_lookup;

use std::fmt;

use log::info;

use crate::error::{Result, SpatialError};
use crate::fixtures::{
    BRAZIL_TOURIST_PLACES, DEFAULT_SHAPEFILE_PATH, REGION_PROBES, WGS84_SRID,
    brazil_states_import, points_column,
};
use crate::spatialite::{ConnectionOptions, DEFAULT_EXTENSION_PATH, SpatialDb, sqlite_version};
use crate::types::{DatabaseTarget, GeometryColumn, NamedPoint, SecurityPolicy, ShapefileImport};

pub use point_catalog::build_point_catalog;
pub use region_lookup::{RegionReport, lookup_regions};

/// Which walkthrough to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Example {
    /// Example 1: create a point table and insert tourist places.
    PointCatalog,
    /// Example 2: import a shapefile and look up which region holds each point.
    RegionLookup,
}

impl Example {
    pub fn id(self) -> u8 {
        match self {
            Self::PointCatalog => 1,
            Self::RegionLookup => 2,
        }
    }

    /// `ImportSHP` is only available under the relaxed policy.
    fn security(self) -> SecurityPolicy {
        match self {
            Self::PointCatalog => SecurityPolicy::Strict,
            Self::RegionLookup => SecurityPolicy::Relaxed,
        }
    }
}

impl TryFrom<u8> for Example {
    type Error = SpatialError;

    fn try_from(id: u8) -> Result<Self> {
        match id {
            1 => Ok(Self::PointCatalog),
            2 => Ok(Self::RegionLookup),
            other => Err(SpatialError::UnknownExample(other)),
        }
    }
}

impl fmt::Display for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Example {}", self.id())
    }
}

/// Everything a run needs, fixed before the database is touched.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub example: Example,
    pub target: DatabaseTarget,
    pub extension_path: String,
    /// Column the point catalog is written to.
    pub catalog_column: GeometryColumn,
    pub places: &'static [NamedPoint],
    pub shapefile: ShapefileImport,
    pub probes: &'static [NamedPoint],
    /// SRID the probe points are parsed under.
    pub probe_srid: i32,
}

impl RunConfig {
    /// Configuration with the bundled sample data.
    pub fn new(example: Example, target: DatabaseTarget) -> Self {
        Self {
            example,
            target,
            extension_path: DEFAULT_EXTENSION_PATH.to_string(),
            catalog_column: points_column(),
            places: BRAZIL_TOURIST_PLACES,
            shapefile: brazil_states_import(DEFAULT_SHAPEFILE_PATH, None),
            probes: REGION_PROBES,
            probe_srid: WGS84_SRID,
        }
    }

    fn connection_options(&self) -> ConnectionOptions {
        ConnectionOptions {
            extension_path: self.extension_path.clone(),
            security: self.example.security(),
        }
    }
}

/// Run the selected walkthrough to completion.
pub fn run(config: &RunConfig) -> Result<()> {
    info!("running {} against {}", config.example, config.target);
    match config.example {
        Example::PointCatalog => build_point_catalog(config).map(|_| ()),
        Example::RegionLookup => lookup_regions(config).map(|_| ()),
    }
}

fn open_and_bootstrap(config: &RunConfig) -> Result<SpatialDb> {
    println!("Opening database: {}", config.target);
    let db = SpatialDb::open(&config.target, &config.connection_options())?;

    println!("SQLite version: {}", sqlite_version());
    println!("SpatiaLite version: {}", db.spatialite_version()?);

    if !db.is_initialized()? {
        println!("Initializing SpatiaLite...");
        db.initialize()?;
    }
    Ok(db)
}
