use log::{debug, info};
use rusqlite::OptionalExtension;

use super::SpatialDb;
use crate::conversions::{dimension_to_str, geometry_type_from_code, geometry_type_to_str};
use crate::error::{Result, SpatialError};
use crate::spatialite_sql::{
    SQL_ADD_GEOMETRY_COLUMN, SQL_INIT_SPATIAL_METADATA, SQL_SELECT_GEOMETRY_COLUMN_META,
    SQL_SPATIAL_METADATA_EXISTS, SQL_TABLE_EXISTS,
};
use crate::types::GeometryColumn;

impl SpatialDb {
    /// Whether the reserved `spatial_ref_sys` table exists.
    pub fn is_initialized(&self) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare(SQL_SPATIAL_METADATA_EXISTS)
            .map_err(SpatialError::MetadataCheck)?;
        stmt.exists([]).map_err(SpatialError::MetadataCheck)
    }

    /// Create SpatiaLite's metadata tables unless they already exist.
    ///
    /// Returns `true` when the metadata was created by this call. Running it
    /// against an initialized database is a no-op, so `spatial_ref_sys` is
    /// never populated twice.
    pub fn initialize(&self) -> Result<bool> {
        if self.is_initialized()? {
            debug!("spatial metadata already present in {}", self.target());
            return Ok(false);
        }

        let created: i64 = self
            .conn
            .query_row(SQL_INIT_SPATIAL_METADATA, [], |row| row.get(0))
            .map_err(|err| SpatialError::MetadataInit(err.to_string()))?;
        if created != 1 {
            return Err(SpatialError::MetadataInit(
                "InitSpatialMetaData reported failure".to_string(),
            ));
        }

        info!("initialized spatial metadata in {}", self.target());
        Ok(true)
    }

    pub fn table_exists(&self, table: &str) -> Result<bool> {
        let exists = self
            .conn
            .query_row(SQL_TABLE_EXISTS, [table], |row| row.get(0))?;
        Ok(exists)
    }

    /// Look up how `table.column` is registered in `geometry_columns`.
    pub fn describe_geometry_column(
        &self,
        table: &str,
        column: &str,
    ) -> Result<Option<GeometryColumn>> {
        let meta: Option<(i64, i32)> = self
            .conn
            .query_row(SQL_SELECT_GEOMETRY_COLUMN_META, [table, column], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .optional()?;

        let Some((code, srid)) = meta else {
            return Ok(None);
        };
        let (geometry_type, dimension) = geometry_type_from_code(code)?;

        Ok(Some(GeometryColumn {
            table: table.to_string(),
            column: column.to_string(),
            srid,
            geometry_type,
            dimension,
        }))
    }

    /// Register a geometry column with `AddGeometryColumn`.
    ///
    /// The table must already exist. A column that is already registered with
    /// the same SRID, type and dimension is left alone; any other existing
    /// registration is an error.
    pub fn add_geometry_column(&self, column: &GeometryColumn) -> Result<()> {
        if let Some(existing) = self.describe_geometry_column(&column.table, &column.column)? {
            if existing == *column {
                debug!(
                    "geometry column {}.{} already registered",
                    column.table, column.column
                );
                return Ok(());
            }
            return Err(SpatialError::GeometryColumn {
                table: column.table.clone(),
                message: format!(
                    "{} is already registered as {} {} (SRID {})",
                    column.column,
                    geometry_type_to_str(existing.geometry_type),
                    dimension_to_str(existing.dimension),
                    existing.srid
                ),
            });
        }

        let added: i64 = self
            .conn
            .query_row(
                SQL_ADD_GEOMETRY_COLUMN,
                rusqlite::params![
                    column.table,
                    column.column,
                    column.srid,
                    geometry_type_to_str(column.geometry_type),
                    dimension_to_str(column.dimension),
                ],
                |row| row.get(0),
            )
            .map_err(|err| SpatialError::GeometryColumn {
                table: column.table.clone(),
                message: err.to_string(),
            })?;
        if added != 1 {
            return Err(SpatialError::GeometryColumn {
                table: column.table.clone(),
                message: format!("AddGeometryColumn rejected {}", column.column),
            });
        }

        info!(
            "registered {}.{} as {} {} (SRID {})",
            column.table,
            column.column,
            geometry_type_to_str(column.geometry_type),
            dimension_to_str(column.dimension),
            column.srid
        );
        Ok(())
    }
}
