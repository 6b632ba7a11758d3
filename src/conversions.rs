use crate::error::SpatialError;
use wkb::reader::{Dimension, GeometryType};

#[inline]
pub(crate) fn geometry_type_to_str(geometry_type: GeometryType) -> &'static str {
    match geometry_type {
        GeometryType::Point => "POINT",
        GeometryType::LineString => "LINESTRING",
        GeometryType::Polygon => "POLYGON",
        GeometryType::MultiPoint => "MULTIPOINT",
        GeometryType::MultiLineString => "MULTILINESTRING",
        GeometryType::MultiPolygon => "MULTIPOLYGON",
        GeometryType::GeometryCollection => "GEOMETRYCOLLECTION",
        // SpatiaLite's catch-all column type.
        _ => "GEOMETRY",
    }
}

#[inline]
pub(crate) fn dimension_to_str(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Xy => "XY",
        Dimension::Xyz => "XYZ",
        Dimension::Xym => "XYM",
        Dimension::Xyzm => "XYZM",
    }
}

/// Decode the integer `geometry_type` stored in SpatiaLite's `geometry_columns`.
///
/// The last digits select the geometry class (1..7) and the thousands select
/// the dimension: 0 = XY, 1 = XYZ, 2 = XYM, 3 = XYZM. `0` (any geometry) has
/// no single class and is rejected.
#[inline]
pub(crate) fn geometry_type_from_code(
    code: i64,
) -> Result<(GeometryType, Dimension), SpatialError> {
    let geometry_type = match code % 1000 {
        1 => GeometryType::Point,
        2 => GeometryType::LineString,
        3 => GeometryType::Polygon,
        4 => GeometryType::MultiPoint,
        5 => GeometryType::MultiLineString,
        6 => GeometryType::MultiPolygon,
        7 => GeometryType::GeometryCollection,
        _ => return Err(SpatialError::UnsupportedGeometryType(code)),
    };
    let dimension = match code / 1000 {
        0 => Dimension::Xy,
        1 => Dimension::Xyz,
        2 => Dimension::Xym,
        3 => Dimension::Xyzm,
        _ => return Err(SpatialError::UnsupportedGeometryType(code)),
    };
    Ok((geometry_type, dimension))
}
