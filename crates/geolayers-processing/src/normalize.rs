//! Geometry normalization before storage.
//!
//! Storage keeps 2D geometries only. Coordinates beyond the second (elevation,
//! measure) are dropped here; the database additionally applies `ST_Force2D`
//! and assigns SRID 4326 on insert.

use geojson::{Geometry, Value};

use crate::error::ConversionError;

type Position = Vec<f64>;

fn position_2d(position: &[f64]) -> Result<Position, ConversionError> {
    match position {
        [x, y, ..] => Ok(vec![*x, *y]),
        _ => Err(ConversionError::InvalidGeometry(format!(
            "position needs at least two coordinates, got {}",
            position.len()
        ))),
    }
}

fn positions_2d(positions: &[Position]) -> Result<Vec<Position>, ConversionError> {
    positions.iter().map(|p| position_2d(p)).collect()
}

fn rings_2d(rings: &[Vec<Position>]) -> Result<Vec<Vec<Position>>, ConversionError> {
    rings.iter().map(|ring| positions_2d(ring)).collect()
}

/// True when the geometry has no position anywhere, including collections
/// without members.
pub fn is_empty_geometry(geometry: &Geometry) -> bool {
    match &geometry.value {
        Value::Point(position) => position.is_empty(),
        Value::MultiPoint(positions) | Value::LineString(positions) => positions.is_empty(),
        Value::MultiLineString(lines) | Value::Polygon(lines) => {
            lines.iter().all(|line| line.is_empty())
        }
        Value::MultiPolygon(polygons) => polygons.iter().flatten().all(|ring| ring.is_empty()),
        Value::GeometryCollection(geometries) => geometries.iter().all(is_empty_geometry),
    }
}

/// Return a copy of `geometry` with every position truncated to two dimensions.
///
/// The bounding box and foreign members are not carried over.
pub fn force_2d(geometry: &Geometry) -> Result<Geometry, ConversionError> {
    let value = match &geometry.value {
        Value::Point(position) => Value::Point(position_2d(position)?),
        Value::MultiPoint(positions) => Value::MultiPoint(positions_2d(positions)?),
        Value::LineString(positions) => Value::LineString(positions_2d(positions)?),
        Value::MultiLineString(lines) => Value::MultiLineString(rings_2d(lines)?),
        Value::Polygon(rings) => Value::Polygon(rings_2d(rings)?),
        Value::MultiPolygon(polygons) => Value::MultiPolygon(
            polygons
                .iter()
                .map(|rings| rings_2d(rings))
                .collect::<Result<_, _>>()?,
        ),
        Value::GeometryCollection(geometries) => Value::GeometryCollection(
            geometries.iter().map(force_2d).collect::<Result<_, _>>()?,
        ),
    };
    Ok(Geometry::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_z() {
        let geometry = Geometry::new(Value::LineString(vec![
            vec![10.0, 59.0, 120.0],
            vec![10.5, 59.5, 130.0],
        ]));
        let flat = force_2d(&geometry).unwrap();
        assert_eq!(
            flat.value,
            Value::LineString(vec![vec![10.0, 59.0], vec![10.5, 59.5]])
        );
    }

    #[test]
    fn test_keeps_2d_unchanged() {
        let geometry = Geometry::new(Value::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 0.0],
        ]]));
        assert_eq!(force_2d(&geometry).unwrap(), geometry);
    }

    #[test]
    fn test_collection_is_recursive() {
        let geometry = Geometry::new(Value::GeometryCollection(vec![
            Geometry::new(Value::Point(vec![1.0, 2.0, 3.0])),
            Geometry::new(Value::MultiPoint(vec![vec![4.0, 5.0, 6.0, 7.0]])),
        ]));
        let flat = force_2d(&geometry).unwrap();
        assert_eq!(
            flat.value,
            Value::GeometryCollection(vec![
                Geometry::new(Value::Point(vec![1.0, 2.0])),
                Geometry::new(Value::MultiPoint(vec![vec![4.0, 5.0]])),
            ])
        );
    }

    #[test]
    fn test_empty_geometries() {
        let empty = [
            Value::Point(vec![]),
            Value::LineString(vec![]),
            Value::Polygon(vec![vec![]]),
            Value::MultiPolygon(vec![vec![], vec![vec![]]]),
            Value::GeometryCollection(vec![]),
            Value::GeometryCollection(vec![Geometry::new(Value::MultiPoint(vec![]))]),
        ];
        for value in empty {
            assert!(is_empty_geometry(&Geometry::new(value.clone())), "{:?}", value);
        }

        let collection = Geometry::new(Value::GeometryCollection(vec![
            Geometry::new(Value::LineString(vec![])),
            Geometry::new(Value::Point(vec![1.0, 2.0])),
        ]));
        assert!(!is_empty_geometry(&collection));
        assert!(!is_empty_geometry(&Geometry::new(Value::Point(vec![1.0]))));
    }

    #[test]
    fn test_rejects_one_dimensional_position() {
        let geometry = Geometry::new(Value::Point(vec![1.0]));
        let err = force_2d(&geometry).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidGeometry(_)));
    }
}
