//! SpatiaLite walkthroughs built on top of rusqlite.
//!
//! ## Overview
//!
//! - `SpatialDb` is a SQLite connection with the SpatiaLite extension loaded.
//!   It owns the extension's per-connection cache, so closing or dropping it
//!   releases both.
//! - `GeometryColumn` describes a column registered with `AddGeometryColumn`.
//! - `NamedPoint` pairs a display name with a WKT point literal.
//! - `walkthrough::run` executes one of the two examples described by a
//!   `RunConfig`.
//!
//! `SpatialDb::open` accepts either a file path or an in-memory target, plus
//! `ConnectionOptions` naming the extension library and the security policy.
//! Functions that touch the filesystem, such as `ImportSHP`, exist only on
//! connections opened with `SecurityPolicy::Relaxed`.
//!
//! ## Short usage
//!
//! ```no_run
//! use rusqlite_spatialite::fixtures::{BRAZIL_TOURIST_PLACES, points_column};
//! use rusqlite_spatialite::{ConnectionOptions, DatabaseTarget, SpatialDb};
//!
//! let mut db = SpatialDb::open(&DatabaseTarget::InMemory, &ConnectionOptions::default())?;
//! db.initialize()?;
//!
//! let column = points_column();
//! db.create_points_table(&column.table)?;
//! db.add_geometry_column(&column)?;
//! db.insert_points(&column, BRAZIL_TOURIST_PLACES, |_| {})?;
//!
//! for point in db.list_points(&column)? {
//!     println!("{:?}: ({}, {})", point.name, point.x, point.y);
//! }
//! db.close()?;
//! # Ok::<(), rusqlite_spatialite::SpatialError>(())
//! ```
//!
//! ## Containment queries
//!
//! ```no_run
//! use rusqlite_spatialite::fixtures::{REGION_PROBES, WGS84_SRID, brazil_states_import};
//! use rusqlite_spatialite::{ConnectionOptions, DatabaseTarget, SecurityPolicy, SpatialDb};
//!
//! let options = ConnectionOptions {
//!     security: SecurityPolicy::Relaxed,
//!     ..ConnectionOptions::default()
//! };
//! let db = SpatialDb::open(&DatabaseTarget::InMemory, &options)?;
//! db.initialize()?;
//!
//! let import = brazil_states_import("shp/BR_UF_2022", None);
//! db.import_shapefile(&import)?;
//! for point in REGION_PROBES {
//!     let region = db.locate(&import.target, point, WGS84_SRID)?;
//!     println!("{} ---> {region}", point.name);
//! }
//! # Ok::<(), rusqlite_spatialite::SpatialError>(())
//! ```
mod conversions;
mod error;
mod spatialite;
mod spatialite_sql;
mod types;

pub mod fixtures;
pub mod walkthrough;

pub use error::{Result, SpatialError};
pub use spatialite::{ConnectionOptions, DEFAULT_EXTENSION_PATH, SpatialDb, sqlite_version};
pub use types::{
    Containment, DatabaseTarget, GeometryColumn, NamedPoint, RegionTable, SecurityPolicy,
    ShapefileImport, StoredPoint,
};

// Re-export types used in public fields to keep the public API stable.
pub use wkb::reader::{Dimension, GeometryType};
