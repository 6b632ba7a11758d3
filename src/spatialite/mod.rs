//! SpatiaLite-enabled connection surface backed by rusqlite.
//!
//! `SpatialDb` owns the connection and, through the loaded extension, its
//! per-connection SpatiaLite cache. The two are released together when the
//! value is closed or dropped.

mod connection;
mod metadata;
mod points;
mod regions;

pub use connection::{ConnectionOptions, DEFAULT_EXTENSION_PATH, SpatialDb, sqlite_version};
