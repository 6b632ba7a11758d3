use geo_traits::{CoordTrait, GeometryTrait, PointTrait};
use log::{debug, warn};
use rusqlite::{DropBehavior, params};
use std::str::FromStr;
use wkb::reader::Wkb;
use wkt::Wkt;

use super::SpatialDb;
use crate::error::{Result, SpatialError};
use crate::spatialite_sql::{sql_create_points_table, sql_insert_point, sql_select_points};
use crate::types::{GeometryColumn, NamedPoint, StoredPoint};

impl NamedPoint {
    /// Parse the WKT literal and return its `(x, y)` coordinates.
    ///
    /// `GeomFromText` turns malformed input into `NULL` rather than an error,
    /// so literals are checked here before they reach the database.
    pub fn coordinates(&self) -> Result<(f64, f64)> {
        let invalid = |message: String| SpatialError::InvalidWkt {
            name: self.name.to_string(),
            message,
        };

        let wkt = Wkt::<f64>::from_str(self.wkt).map_err(|err| invalid(err.to_string()))?;
        match wkt.as_type() {
            geo_traits::GeometryType::Point(point) => point
                .coord()
                .map(|coord| coord.x_y())
                .ok_or_else(|| invalid("empty point".to_string())),
            _ => Err(invalid(format!("expected a POINT, got {}", self.wkt))),
        }
    }
}

impl SpatialDb {
    /// Create the point catalog table (`id` + `name`) unless it exists.
    pub fn create_points_table(&self, table: &str) -> Result<()> {
        self.conn
            .execute_batch(&sql_create_points_table(table))
            .map_err(|source| SpatialError::CreateTable {
                table: table.to_string(),
                source,
            })
    }

    /// Insert `points` into `column` inside a single transaction.
    ///
    /// `on_insert` is called before each row is written. If any insert fails
    /// the transaction is rolled back, so either every point is stored or
    /// none is.
    pub fn insert_points<F>(
        &mut self,
        column: &GeometryColumn,
        points: &[NamedPoint],
        mut on_insert: F,
    ) -> Result<usize>
    where
        F: FnMut(&NamedPoint),
    {
        for point in points {
            point.coordinates()?;
        }

        let sql = sql_insert_point(&column.table, &column.column);
        let mut tx = self.conn.transaction().map_err(SpatialError::Transaction)?;
        tx.set_drop_behavior(DropBehavior::Rollback);

        for point in points {
            on_insert(point);
            let inserted = tx.execute(&sql, params![point.name, point.wkt, column.srid]);
            if let Err(source) = inserted {
                tx.rollback().map_err(SpatialError::Transaction)?;
                return Err(SpatialError::Insert {
                    name: point.name.to_string(),
                    source,
                });
            }
        }

        tx.commit().map_err(SpatialError::Transaction)?;
        debug!("inserted {} points into {}", points.len(), column.table);
        Ok(points.len())
    }

    /// Read the catalog back in `id` order, decoding each geometry from WKB.
    ///
    /// Rows whose geometry is `NULL` or not a point are skipped.
    pub fn list_points(&self, column: &GeometryColumn) -> Result<Vec<StoredPoint>> {
        let mut stmt = self
            .conn
            .prepare(&sql_select_points(&column.table, &column.column))?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<Vec<u8>>>(2)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut points = Vec::with_capacity(rows.len());
        for (id, name, blob) in rows {
            let xy = match blob {
                Some(blob) => point_xy_from_wkb(&blob)?,
                None => None,
            };
            match xy {
                Some((x, y)) => points.push(StoredPoint { id, name, x, y }),
                None => warn!("row {id} of {} has no point geometry", column.table),
            }
        }
        Ok(points)
    }
}

pub(crate) fn point_xy_from_wkb(buf: &[u8]) -> Result<Option<(f64, f64)>> {
    let wkb = Wkb::try_new(buf)?;
    match wkb.as_type() {
        geo_traits::GeometryType::Point(point) => Ok(point.coord().map(|coord| coord.x_y())),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::point_xy_from_wkb;
    use crate::error::SpatialError;
    use crate::fixtures::{BRAZIL_TOURIST_PLACES, points_column};
    use crate::spatialite::test_support::open_in_memory;
    use crate::types::{NamedPoint, SecurityPolicy};
    use geo_types::{LineString, Point};

    fn wkb_from_geometry<G: geo_traits::GeometryTrait<T = f64>>(
        geometry: G,
    ) -> crate::Result<Vec<u8>> {
        let mut wkb = Vec::new();
        wkb::writer::write_geometry(&mut wkb, &geometry, &Default::default())?;
        Ok(wkb)
    }

    #[test]
    fn parses_fixture_coordinates() -> crate::Result<()> {
        let rio = BRAZIL_TOURIST_PLACES[0];
        assert_eq!(rio.coordinates()?, (-43.1729, -22.9068));
        Ok(())
    }

    #[test]
    fn rejects_malformed_and_non_point_wkt() {
        let broken = NamedPoint {
            name: "Broken",
            wkt: "POINT(-43.1729",
        };
        assert!(matches!(
            broken.coordinates(),
            Err(SpatialError::InvalidWkt { .. })
        ));

        let line = NamedPoint {
            name: "Line",
            wkt: "LINESTRING(0 0, 1 1)",
        };
        match line.coordinates() {
            Err(SpatialError::InvalidWkt { name, message }) => {
                assert_eq!(name, "Line");
                assert!(message.contains("expected a POINT"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn decodes_points_from_wkb() -> crate::Result<()> {
        let blob = wkb_from_geometry(Point::new(-54.5854, -25.5165))?;
        assert_eq!(point_xy_from_wkb(&blob)?, Some((-54.5854, -25.5165)));

        let line: LineString<f64> = LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]);
        let blob = wkb_from_geometry(line)?;
        assert_eq!(point_xy_from_wkb(&blob)?, None);
        Ok(())
    }

    #[test]
    #[ignore = "requires mod_spatialite"]
    fn inserts_and_lists_points_in_order() -> crate::Result<()> {
        let mut db = open_in_memory(SecurityPolicy::Strict)?;
        let column = points_column();
        db.initialize()?;
        db.create_points_table(&column.table)?;
        db.add_geometry_column(&column)?;

        let mut seen = Vec::new();
        let inserted = db.insert_points(&column, BRAZIL_TOURIST_PLACES, |point| {
            seen.push(point.name)
        })?;
        assert_eq!(inserted, 3);
        assert_eq!(
            seen,
            vec!["Rio de Janeiro", "Foz do Iguaçu", "Fernando de Noronha"]
        );

        let stored = db.list_points(&column)?;
        assert_eq!(stored.len(), 3);
        for (stored, fixture) in stored.iter().zip(BRAZIL_TOURIST_PLACES) {
            assert_eq!(stored.name.as_deref(), Some(fixture.name));
            assert_eq!((stored.x, stored.y), fixture.coordinates()?);
        }

        let srids: Vec<i64> = db
            .connection()
            .prepare("SELECT ST_SRID(geom) FROM points ORDER BY id")?
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<_, _>>()?;
        assert_eq!(srids, vec![4326, 4326, 4326]);
        Ok(())
    }

    #[test]
    #[ignore = "requires mod_spatialite"]
    fn failed_insert_rolls_back_the_whole_batch() -> crate::Result<()> {
        let mut db = open_in_memory(SecurityPolicy::Strict)?;
        let column = points_column();
        db.initialize()?;
        db.create_points_table(&column.table)?;
        db.add_geometry_column(&column)?;

        db.connection().execute_batch(
            "CREATE TRIGGER reject_foz BEFORE INSERT ON points
             WHEN NEW.name = 'Foz do Iguaçu'
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )?;

        let mut calls = 0;
        let err = db
            .insert_points(&column, BRAZIL_TOURIST_PLACES, |_| calls += 1)
            .expect_err("second insert should fail");
        match err {
            SpatialError::Insert { name, .. } => assert_eq!(name, "Foz do Iguaçu"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(calls, 2);

        assert!(db.list_points(&column)?.is_empty());
        assert!(db.connection().is_autocommit());
        Ok(())
    }
}
