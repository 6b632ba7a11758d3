use std::error::Error;
use std::fmt;

use crate::types::DatabaseTarget;

/// Crate error type for SpatiaLite walkthrough operations.
///
/// Variants follow the order in which a run can fail: opening the database,
/// loading the extension, bootstrapping metadata, creating tables, writing
/// rows, importing and finally querying.
#[derive(Debug)]
pub enum SpatialError {
    /// Wraps errors returned by `rusqlite` outside of a more specific step.
    Sql(rusqlite::Error),
    /// Wraps errors returned by the `wkb` crate while decoding query results.
    Wkb(wkb::error::WkbError),
    /// The database file (or in-memory store) could not be opened or created.
    Open {
        target: DatabaseTarget,
        source: rusqlite::Error,
    },
    /// The SpatiaLite shared library could not be loaded into the connection.
    ExtensionLoad {
        path: String,
        source: rusqlite::Error,
    },
    /// Checking the catalog for `spatial_ref_sys` failed.
    MetadataCheck(rusqlite::Error),
    /// `InitSpatialMetaData` failed or reported failure.
    MetadataInit(String),
    /// Creating a table failed.
    CreateTable {
        table: String,
        source: rusqlite::Error,
    },
    /// Registering a geometry column failed or conflicts with an existing one.
    GeometryColumn { table: String, message: String },
    /// Beginning or committing a transaction failed.
    Transaction(rusqlite::Error),
    /// Inserting a named point failed.
    Insert {
        name: String,
        source: rusqlite::Error,
    },
    /// `ImportSHP` failed or reported failure.
    Import { path: String, message: String },
    /// A containment query could not be prepared or executed.
    Query {
        name: String,
        source: rusqlite::Error,
    },
    /// Closing the connection failed.
    Close(rusqlite::Error),
    /// A fixture literal is not valid WKT for the expected geometry.
    InvalidWkt { name: String, message: String },
    /// A geometry type code read from `geometry_columns` is not supported.
    UnsupportedGeometryType(i64),
    /// The requested example id does not exist.
    UnknownExample(u8),
}

impl fmt::Display for SpatialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sql(err) => write!(f, "{err}"),
            Self::Wkb(err) => write!(f, "{err}"),
            Self::Open { target, source } => {
                write!(f, "error opening database {target}: {source}")
            }
            Self::ExtensionLoad { path, source } => {
                write!(f, "error loading SpatiaLite extension '{path}': {source}")
            }
            Self::MetadataCheck(err) => {
                write!(f, "error checking if spatial_ref_sys table exists: {err}")
            }
            Self::MetadataInit(message) => {
                write!(f, "error initializing SpatiaLite metadata: {message}")
            }
            Self::CreateTable { table, source } => {
                write!(f, "error creating table {table}: {source}")
            }
            Self::GeometryColumn { table, message } => {
                write!(f, "error adding geometry column to {table}: {message}")
            }
            Self::Transaction(err) => write!(f, "transaction error: {err}"),
            Self::Insert { name, source } => write!(f, "error adding {name}: {source}"),
            Self::Import { path, message } => {
                write!(f, "error importing shapefile {path}: {message}")
            }
            Self::Query { name, source } => {
                write!(f, "error querying region for {name}: {source}")
            }
            Self::Close(err) => write!(f, "error closing database: {err}"),
            Self::InvalidWkt { name, message } => {
                write!(f, "invalid WKT for {name}: {message}")
            }
            Self::UnsupportedGeometryType(code) => {
                write!(f, "unsupported geometry type code: {code}")
            }
            Self::UnknownExample(id) => write!(f, "unknown example ID: {id}"),
        }
    }
}

impl Error for SpatialError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sql(err)
            | Self::MetadataCheck(err)
            | Self::Transaction(err)
            | Self::Close(err) => Some(err),
            Self::Open { source, .. }
            | Self::ExtensionLoad { source, .. }
            | Self::CreateTable { source, .. }
            | Self::Insert { source, .. }
            | Self::Query { source, .. } => Some(source),
            Self::Wkb(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for SpatialError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Sql(err)
    }
}

impl From<wkb::error::WkbError> for SpatialError {
    fn from(err: wkb::error::WkbError) -> Self {
        Self::Wkb(err)
    }
}

pub type Result<T> = std::result::Result<T, SpatialError>;

#[cfg(test)]
mod tests {
    use super::SpatialError;
    use crate::types::DatabaseTarget;
    use std::error::Error;

    #[test]
    fn open_error_names_the_target_and_keeps_the_source() {
        let err = SpatialError::Open {
            target: DatabaseTarget::File("/nowhere/db.sqlite".into()),
            source: rusqlite::Error::InvalidQuery,
        };
        let message = err.to_string();
        assert!(message.contains("/nowhere/db.sqlite"));
        assert!(err.source().is_some());
    }

    #[test]
    fn unknown_example_has_no_source() {
        let err = SpatialError::UnknownExample(3);
        assert_eq!(err.to_string(), "unknown example ID: 3");
        assert!(err.source().is_none());
    }
}
