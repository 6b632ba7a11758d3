//! Sample data driving the walkthroughs.
//!
//! Runners take these tables as arguments, so callers (and tests) can swap in
//! their own points, columns or shapefiles.

use wkb::reader::{Dimension, GeometryType};

use crate::types::{GeometryColumn, NamedPoint, RegionTable, ShapefileImport};

/// WGS84 longitude/latitude.
pub const WGS84_SRID: i32 = 4326;

/// Tourist places in Brazil stored by the point catalog walkthrough.
pub const BRAZIL_TOURIST_PLACES: &[NamedPoint] = &[
    NamedPoint {
        name: "Rio de Janeiro",
        wkt: "POINT(-43.1729 -22.9068)",
    },
    NamedPoint {
        name: "Foz do Iguaçu",
        wkt: "POINT(-54.5854 -25.5165)",
    },
    NamedPoint {
        name: "Fernando de Noronha",
        wkt: "POINT(-32.423786 -3.853808)",
    },
];

/// Points looked up against the imported state boundaries. The last two lie
/// outside Brazil.
pub const REGION_PROBES: &[NamedPoint] = &[
    NamedPoint {
        name: "Rio de Janeiro",
        wkt: "POINT(-43.1729 -22.9068)",
    },
    NamedPoint {
        name: "Foz do Iguaçu",
        wkt: "POINT(-54.5854 -25.5165)",
    },
    NamedPoint {
        name: "Fernando de Noronha",
        wkt: "POINT(-32.423786 -3.853808)",
    },
    NamedPoint {
        name: "Null Island",
        wkt: "POINT(0 0)",
    },
    NamedPoint {
        name: "New York",
        wkt: "POINT(-74.0060 40.7128)",
    },
];

/// IBGE state boundaries, relative to the working directory.
pub const DEFAULT_SHAPEFILE_PATH: &str = "../shp/BR_UF_2022";

pub const DEFAULT_SHAPEFILE_CHARSET: &str = "UTF-8";

/// `points.geom`: WGS84 2D points.
pub fn points_column() -> GeometryColumn {
    GeometryColumn {
        table: "points".to_string(),
        column: "geom".to_string(),
        srid: WGS84_SRID,
        geometry_type: GeometryType::Point,
        dimension: Dimension::Xy,
    }
}

/// Import of the state boundaries into `location`, with the state name in `NM_UF`.
pub fn brazil_states_import(path: impl Into<String>, srid: Option<i32>) -> ShapefileImport {
    ShapefileImport {
        path: path.into(),
        charset: DEFAULT_SHAPEFILE_CHARSET.to_string(),
        srid,
        target: RegionTable {
            table: "location".to_string(),
            name_column: "NM_UF".to_string(),
            // ImportSHP's default geometry column name.
            geometry_column: "geometry".to_string(),
        },
    }
}
