use std::fmt;
use std::path::PathBuf;

use wkb::reader::{Dimension, GeometryType};

/// Where the database lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatabaseTarget {
    /// A file opened read-write, created if absent.
    File(PathBuf),
    /// A private, transient in-memory database.
    InMemory,
}

impl DatabaseTarget {
    /// `None` selects an in-memory database.
    pub fn from_db_name(db_name: Option<PathBuf>) -> Self {
        match db_name {
            Some(path) => Self::File(path),
            None => Self::InMemory,
        }
    }
}

impl fmt::Display for DatabaseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::InMemory => f.write_str(":memory:"),
        }
    }
}

/// How strictly SpatiaLite gates functions that touch the filesystem
/// (`ImportSHP`, `ExportSHP`, ...).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SecurityPolicy {
    #[default]
    Strict,
    Relaxed,
}

/// A geometry column as registered with SpatiaLite.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometryColumn {
    pub table: String,
    pub column: String,
    pub srid: i32,
    pub geometry_type: GeometryType,
    pub dimension: Dimension,
}

/// A display name paired with a WKT point literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NamedPoint {
    pub name: &'static str,
    pub wkt: &'static str,
}

/// A row of the point catalog read back from the database.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredPoint {
    pub id: i64,
    pub name: Option<String>,
    pub x: f64,
    pub y: f64,
}

/// A table of named regions that containment queries run against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionTable {
    pub table: String,
    /// Attribute reported for a matching region.
    pub name_column: String,
    pub geometry_column: String,
}

/// Where to import a shapefile from and how.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapefileImport {
    /// Path without the `.shp` extension, as `ImportSHP` expects it.
    pub path: String,
    pub charset: String,
    /// When set, the extended `ImportSHP` form is used to tag geometries.
    pub srid: Option<i32>,
    /// Table `ImportSHP` creates, and the columns queried afterwards.
    pub target: RegionTable,
}

/// Outcome of a single containment query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Containment {
    Found(String),
    NotFound,
}

impl fmt::Display for Containment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(region) => f.write_str(region),
            Self::NotFound => f.write_str("Not found"),
        }
    }
}
