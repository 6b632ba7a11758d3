// cf. https://www.gaia-gis.it/gaia-sins/spatialite-sql-latest.html

pub(crate) const SQL_SPATIAL_METADATA_EXISTS: &str =
    "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'spatial_ref_sys'";

// The argument 1 makes InitSpatialMetaData run inside a single transaction.
pub(crate) const SQL_INIT_SPATIAL_METADATA: &str = "SELECT InitSpatialMetaData(1)";

pub(crate) const SQL_SPATIALITE_VERSION: &str = "SELECT spatialite_version()";

pub(crate) const SQL_TABLE_EXISTS: &str =
    "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE)";

// AddGeometryColumn(table, column, srid, geometry_type, dimension)
//   srid: 4326 = WGS84
//   geometry_type: POINT, LINESTRING, POLYGON, MULTIPOINT, MULTILINESTRING, ...
//   dimension: XY, XYZ, XYM or XYZM
pub(crate) const SQL_ADD_GEOMETRY_COLUMN: &str = "SELECT AddGeometryColumn(?1, ?2, ?3, ?4, ?5)";

// SpatiaLite stores table and column names lower-cased in geometry_columns.
pub(crate) const SQL_SELECT_GEOMETRY_COLUMN_META: &str = "
SELECT geometry_type, srid
FROM geometry_columns
WHERE f_table_name = lower(?1) AND f_geometry_column = lower(?2)
";

pub(crate) const SQL_IMPORT_SHP: &str = "SELECT ImportSHP(?1, ?2, ?3)";

pub(crate) const SQL_IMPORT_SHP_WITH_SRID: &str = "SELECT ImportSHP(?1, ?2, ?3, ?4)";

pub(crate) fn sql_create_points_table(table: &str) -> String {
    format!(
        r#"CREATE TABLE IF NOT EXISTS "{table}" (id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL, name TEXT)"#
    )
}

pub(crate) fn sql_insert_point(table: &str, geometry_column: &str) -> String {
    format!(r#"INSERT INTO "{table}" (name, "{geometry_column}") VALUES (?1, GeomFromText(?2, ?3))"#)
}

pub(crate) fn sql_select_points(table: &str, geometry_column: &str) -> String {
    format!(r#"SELECT id, name, AsBinary("{geometry_column}") FROM "{table}" ORDER BY id"#)
}

pub(crate) fn sql_select_containing_region(
    table: &str,
    name_column: &str,
    geometry_column: &str,
) -> String {
    format!(
        r#"SELECT "{name_column}" FROM "{table}" WHERE ST_Within(GeomFromText(?1, ?2), "{geometry_column}") = 1 LIMIT 1"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_identifiers_in_generated_sql() {
        assert_eq!(
            sql_insert_point("points", "geom"),
            r#"INSERT INTO "points" (name, "geom") VALUES (?1, GeomFromText(?2, ?3))"#
        );
        assert_eq!(
            sql_select_containing_region("location", "NM_UF", "geometry"),
            r#"SELECT "NM_UF" FROM "location" WHERE ST_Within(GeomFromText(?1, ?2), "geometry") = 1 LIMIT 1"#
        );
    }

    #[test]
    fn points_table_creation_is_idempotent() -> crate::Result<()> {
        let conn = rusqlite::Connection::open_in_memory()?;
        conn.execute_batch(&sql_create_points_table("points"))?;
        conn.execute_batch(&sql_create_points_table("points"))?;
        let exists: bool = conn.query_row(SQL_TABLE_EXISTS, ["POINTS"], |row| row.get(0))?;
        assert!(exists);
        Ok(())
    }
}
