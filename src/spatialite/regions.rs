use log::{debug, info};
use rusqlite::{OptionalExtension, params};

use super::SpatialDb;
use crate::error::{Result, SpatialError};
use crate::spatialite_sql::{
    SQL_IMPORT_SHP, SQL_IMPORT_SHP_WITH_SRID, sql_select_containing_region,
};
use crate::types::{Containment, NamedPoint, RegionTable, ShapefileImport};

impl SpatialDb {
    /// Import a shapefile with `ImportSHP`, letting SpatiaLite create the table.
    ///
    /// Returns the number of imported rows, or `None` when the target table
    /// already exists and the import was skipped. `ImportSHP` is only
    /// registered when the connection was opened with a relaxed security
    /// policy; under the strict policy this fails with an `Import` error.
    pub fn import_shapefile(&self, import: &ShapefileImport) -> Result<Option<i64>> {
        let table = &import.target.table;
        if self.table_exists(table)? {
            info!("table {table} already exists, skipping import of {}", import.path);
            return Ok(None);
        }

        let import_error = |message: String| SpatialError::Import {
            path: import.path.clone(),
            message,
        };

        let imported: Option<i64> = match import.srid {
            Some(srid) => {
                debug!("ImportSHP({}, {table}, {}, {srid})", import.path, import.charset);
                self.conn.query_row(
                    SQL_IMPORT_SHP_WITH_SRID,
                    params![import.path, table, import.charset, srid],
                    |row| row.get(0),
                )
            }
            None => {
                debug!("ImportSHP({}, {table}, {})", import.path, import.charset);
                self.conn.query_row(
                    SQL_IMPORT_SHP,
                    params![import.path, table, import.charset],
                    |row| row.get(0),
                )
            }
        }
        .map_err(|err| import_error(err.to_string()))?;

        let rows =
            imported.ok_or_else(|| import_error("ImportSHP reported failure".to_string()))?;
        if !self.table_exists(table)? {
            return Err(import_error(format!("ImportSHP did not create {table}")));
        }
        info!("imported {rows} rows from {} into {table}", import.path);
        Ok(Some(rows))
    }

    /// Find the region whose geometry contains `point` (parsed under `srid`).
    ///
    /// A query that matches nothing is `Containment::NotFound`, not an error.
    pub fn locate(
        &self,
        regions: &RegionTable,
        point: &NamedPoint,
        srid: i32,
    ) -> Result<Containment> {
        let query_error = |source| SpatialError::Query {
            name: point.name.to_string(),
            source,
        };

        let sql = sql_select_containing_region(
            &regions.table,
            &regions.name_column,
            &regions.geometry_column,
        );
        let mut stmt = self.conn.prepare_cached(&sql).map_err(query_error)?;
        let region: Option<Option<String>> = stmt
            .query_row(params![point.wkt, srid], |row| row.get(0))
            .optional()
            .map_err(query_error)?;

        Ok(match region {
            Some(name) => Containment::Found(name.unwrap_or_default()),
            None => Containment::NotFound,
        })
    }
}
