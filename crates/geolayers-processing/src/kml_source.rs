//! KML documents
//!
//! The XML is read with `quick-xml` into a small element tree, then every
//! `Placemark` in the document becomes one feature:
//!
//! - `Point`, `LineString` and `Polygon` map to the GeoJSON geometry of the same name
//! - `LinearRing` maps to a single-ring Polygon
//! - `gx:Track` maps to a LineString through its `gx:coord` entries
//! - `MultiGeometry` / `gx:MultiTrack` contribute all their children
//!
//! A placemark with exactly one geometry keeps it; several become a
//! GeometryCollection; none leaves the feature without geometry. Geometries
//! without coordinates are left out.

use geojson::{Geometry, Value};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::ConversionError;
use crate::extract::{ExtractedFeatures, FeatureGeometry};
use crate::normalize::is_empty_geometry;

type Position = Vec<f64>;

#[derive(Debug, Default)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn named(raw: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(raw).into_owned(),
            ..Self::default()
        }
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }
}

pub fn extract(text: &str) -> Result<ExtractedFeatures, ConversionError> {
    let root = parse_tree(text)?;

    let mut placemarks = Vec::new();
    collect_placemarks(&root, &mut placemarks);

    Ok(ExtractedFeatures::Features(
        placemarks.into_iter().map(placemark_geometry).collect(),
    ))
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), ConversionError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    } else {
        return Err(ConversionError::Xml(
            "document has more than one root element".to_string(),
        ));
    }
    Ok(())
}

fn parse_tree(text: &str) -> Result<Element, ConversionError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            ConversionError::Xml(format!("at position {}: {}", reader.buffer_position(), e))
        })?;
        match event {
            Event::Start(start) => stack.push(Element::named(start.local_name().as_ref())),
            Event::Empty(empty) => {
                attach(&mut stack, &mut root, Element::named(empty.local_name().as_ref()))?
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| {
                    ConversionError::Xml("unexpected closing tag".to_string())
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(content) => {
                if let Some(current) = stack.last_mut() {
                    let content = content
                        .unescape()
                        .map_err(|e| ConversionError::Xml(e.to_string()))?;
                    current.text.push_str(&content);
                }
            }
            Event::CData(content) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&content.into_inner()));
                }
            }
            Event::Eof => break,
            // declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ConversionError::Xml(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }

    root.ok_or_else(|| ConversionError::Xml("document has no root element".to_string()))
}

fn collect_placemarks<'a>(element: &'a Element, out: &mut Vec<&'a Element>) {
    if element.name == "Placemark" {
        out.push(element);
        return;
    }
    for child in &element.children {
        collect_placemarks(child, out);
    }
}

fn placemark_geometry(placemark: &Element) -> FeatureGeometry {
    let mut geometries = Vec::new();
    if let Err(e) = collect_geometries(placemark, &mut geometries) {
        return FeatureGeometry::Invalid(e.to_string());
    }

    match geometries.len() {
        0 => FeatureGeometry::Missing,
        1 => match geometries.pop() {
            Some(geometry) => FeatureGeometry::Present(geometry),
            None => FeatureGeometry::Missing,
        },
        _ => FeatureGeometry::Present(Geometry::new(Value::GeometryCollection(geometries))),
    }
}

fn collect_geometries(parent: &Element, out: &mut Vec<Geometry>) -> Result<(), ConversionError> {
    for child in &parent.children {
        let value = match child.name.as_str() {
            "Point" => Value::Point(coordinates_of(child)?.into_iter().next().unwrap_or_default()),
            "LineString" => Value::LineString(coordinates_of(child)?),
            "LinearRing" => Value::Polygon(vec![close_ring(coordinates_of(child)?)]),
            "Polygon" => Value::Polygon(polygon_rings(child)?),
            "Track" => Value::LineString(track_positions(child)?),
            "MultiGeometry" | "MultiTrack" => {
                collect_geometries(child, out)?;
                continue;
            }
            _ => continue,
        };
        let geometry = Geometry::new(value);
        // no coordinates at all
        if !is_empty_geometry(&geometry) {
            out.push(geometry);
        }
    }
    Ok(())
}

fn coordinates_of(element: &Element) -> Result<Vec<Position>, ConversionError> {
    let text = element
        .child("coordinates")
        .map(|c| c.text.as_str())
        .unwrap_or_default();
    parse_coordinates(text)
}

/// Parse a KML coordinate list: whitespace separated `lon,lat[,alt]` tuples.
///
/// Whitespace around commas is tolerated. A token continues the previous tuple
/// when it starts with a comma, or when that tuple ends with a comma and does
/// not yet hold both longitude and latitude.
fn parse_coordinates(text: &str) -> Result<Vec<Position>, ConversionError> {
    fn value_count(tuple: &str) -> usize {
        tuple.split(',').filter(|part| !part.is_empty()).count()
    }

    let mut tuples: Vec<String> = Vec::new();
    for token in text.split_whitespace() {
        match tuples.last_mut() {
            Some(last)
                if token.starts_with(',') || (last.ends_with(',') && value_count(last) < 2) =>
            {
                last.push_str(token)
            }
            _ => tuples.push(token.to_string()),
        }
    }

    tuples
        .iter()
        .map(|tuple| {
            let position = tuple
                .split(',')
                .filter(|part| !part.is_empty())
                .map(str::parse::<f64>)
                .collect::<Result<Position, _>>()
                .map_err(|e| {
                    ConversionError::InvalidGeometry(format!("bad coordinate '{}': {}", tuple, e))
                })?;
            if position.len() < 2 {
                return Err(ConversionError::InvalidGeometry(format!(
                    "coordinate '{}' needs longitude and latitude",
                    tuple
                )));
            }
            Ok(position)
        })
        .collect()
}

fn close_ring(mut ring: Vec<Position>) -> Vec<Position> {
    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if first != last {
            let first = first.clone();
            ring.push(first);
        }
    }
    ring
}

fn boundary_rings(polygon: &Element, boundary: &str) -> Result<Vec<Vec<Position>>, ConversionError> {
    polygon
        .children_named(boundary)
        .flat_map(|b| b.children_named("LinearRing"))
        .map(|ring| coordinates_of(ring).map(close_ring))
        .collect()
}

fn polygon_rings(polygon: &Element) -> Result<Vec<Vec<Position>>, ConversionError> {
    let mut rings = boundary_rings(polygon, "outerBoundaryIs")?;
    if rings.first().map_or(true, |outer| outer.is_empty()) {
        return Ok(Vec::new());
    }
    rings.truncate(1);
    rings.extend(boundary_rings(polygon, "innerBoundaryIs")?);
    Ok(rings)
}

fn track_positions(track: &Element) -> Result<Vec<Position>, ConversionError> {
    track
        .children_named("coord")
        .map(|coord| {
            let position = coord
                .text
                .split_whitespace()
                .map(str::parse::<f64>)
                .collect::<Result<Position, _>>()
                .map_err(|e| {
                    ConversionError::InvalidGeometry(format!(
                        "bad track coordinate '{}': {}",
                        coord.text, e
                    ))
                })?;
            if position.len() < 2 {
                return Err(ConversionError::InvalidGeometry(format!(
                    "track coordinate '{}' needs longitude and latitude",
                    coord.text
                )));
            }
            Ok(position)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2" xmlns:gx="http://www.google.com/kml/ext/2.2">
  <Document>
    <name>Sample</name>
    <Placemark>
      <name>Summit</name>
      <Point><coordinates>10.75,59.91,120</coordinates></Point>
    </Placemark>
    <Folder>
      <Placemark>
        <name>Trail</name>
        <LineString>
          <coordinates>
            10.0,59.0,0 10.1,59.1,0
            10.2, 59.2
          </coordinates>
        </LineString>
      </Placemark>
      <Placemark>
        <name>Just a label</name>
        <description><![CDATA[<b>no geometry</b>]]></description>
      </Placemark>
    </Folder>
    <Placemark>
      <Polygon>
        <outerBoundaryIs><LinearRing><coordinates>0,0 4,0 4,4 0,4 0,0</coordinates></LinearRing></outerBoundaryIs>
        <innerBoundaryIs><LinearRing><coordinates>1,1 2,1 2,2 1,1</coordinates></LinearRing></innerBoundaryIs>
      </Polygon>
    </Placemark>
  </Document>
</kml>"#;

    fn features(text: &str) -> Vec<FeatureGeometry> {
        match extract(text).unwrap() {
            ExtractedFeatures::Features(features) => features,
            ExtractedFeatures::NoFeatureList => panic!("KML always yields a feature list"),
        }
    }

    #[test]
    fn test_placemarks_become_features() {
        let features = features(SAMPLE);
        assert_eq!(features.len(), 4);

        assert_eq!(
            features[0],
            FeatureGeometry::Present(Geometry::new(Value::Point(vec![10.75, 59.91, 120.0])))
        );
        assert_eq!(
            features[1],
            FeatureGeometry::Present(Geometry::new(Value::LineString(vec![
                vec![10.0, 59.0, 0.0],
                vec![10.1, 59.1, 0.0],
                vec![10.2, 59.2],
            ])))
        );
        assert_eq!(features[2], FeatureGeometry::Missing);

        let FeatureGeometry::Present(polygon) = &features[3] else {
            panic!("expected polygon");
        };
        let Value::Polygon(rings) = &polygon.value else {
            panic!("expected polygon");
        };
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0].len(), 5);
        assert_eq!(rings[1].len(), 4);
    }

    #[test]
    fn test_multigeometry_and_track() {
        let text = r#"<kml xmlns:gx="http://www.google.com/kml/ext/2.2"><Document>
            <Placemark>
              <MultiGeometry>
                <Point><coordinates>1,2</coordinates></Point>
                <LinearRing><coordinates>0,0 1,0 1,1</coordinates></LinearRing>
              </MultiGeometry>
            </Placemark>
            <Placemark>
              <MultiGeometry><Point><coordinates>5,6</coordinates></Point></MultiGeometry>
            </Placemark>
            <Placemark>
              <gx:Track>
                <when>2020-05-01T10:00:00Z</when>
                <gx:coord>10.0 59.0 12</gx:coord>
                <gx:coord>10.1 59.1 14</gx:coord>
              </gx:Track>
            </Placemark>
        </Document></kml>"#;
        let features = features(text);
        assert_eq!(features.len(), 3);

        let FeatureGeometry::Present(collection) = &features[0] else {
            panic!("expected geometry");
        };
        let Value::GeometryCollection(members) = &collection.value else {
            panic!("expected collection");
        };
        assert_eq!(members.len(), 2);
        // open ring is closed
        assert_eq!(
            members[1].value,
            Value::Polygon(vec![vec![
                vec![0.0, 0.0],
                vec![1.0, 0.0],
                vec![1.0, 1.0],
                vec![0.0, 0.0]
            ]])
        );

        assert_eq!(
            features[1],
            FeatureGeometry::Present(Geometry::new(Value::Point(vec![5.0, 6.0])))
        );
        assert_eq!(
            features[2],
            FeatureGeometry::Present(Geometry::new(Value::LineString(vec![
                vec![10.0, 59.0, 12.0],
                vec![10.1, 59.1, 14.0],
            ])))
        );
    }

    #[test]
    fn test_bad_coordinates_fail_only_that_feature() {
        let text = r#"<kml><Document>
            <Placemark><Point><coordinates>abc,def</coordinates></Point></Placemark>
            <Placemark><Point><coordinates>1,2</coordinates></Point></Placemark>
        </Document></kml>"#;
        let features = features(text);
        assert!(matches!(features[0], FeatureGeometry::Invalid(_)));
        assert!(matches!(features[1], FeatureGeometry::Present(_)));
    }

    #[test]
    fn test_empty_document_has_no_features() {
        assert!(features("<kml><Document><name>empty</name></Document></kml>").is_empty());
    }

    #[test]
    fn test_malformed_xml() {
        assert!(matches!(
            extract("<kml><Document></kml>"),
            Err(ConversionError::Xml(_))
        ));
        assert!(matches!(
            extract("<kml><Document>"),
            Err(ConversionError::Xml(_))
        ));
        assert!(matches!(
            extract("this is not xml"),
            Err(ConversionError::Xml(_))
        ));
    }

    #[test]
    fn test_parse_coordinates_tolerates_spacing() {
        let positions = parse_coordinates(" 1,2,3\n\t4 , 5 ").unwrap();
        assert_eq!(positions, vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0]]);
        assert!(parse_coordinates("7").is_err());
        assert_eq!(parse_coordinates("1, 2").unwrap(), vec![vec![1.0, 2.0]]);
    }

    #[test]
    fn test_trailing_comma_does_not_merge_tuples() {
        let positions = parse_coordinates("1,2,0, 3,4,0").unwrap();
        assert_eq!(positions, vec![vec![1.0, 2.0, 0.0], vec![3.0, 4.0, 0.0]]);
    }

    #[test]
    fn test_geometries_without_coordinates_are_missing() {
        let text = r#"<kml><Document>
            <Placemark><Point><coordinates/></Point></Placemark>
            <Placemark><LineString><coordinates></coordinates></LineString></Placemark>
            <Placemark><Polygon><outerBoundaryIs><LinearRing><coordinates/></LinearRing></outerBoundaryIs></Polygon></Placemark>
            <Placemark><Polygon></Polygon></Placemark>
            <Placemark>
              <MultiGeometry>
                <Point><coordinates/></Point>
                <Point><coordinates>1,2</coordinates></Point>
              </MultiGeometry>
            </Placemark>
        </Document></kml>"#;
        let features = features(text);
        assert_eq!(features.len(), 5);
        assert!(features[..4].iter().all(|f| *f == FeatureGeometry::Missing));
        assert_eq!(
            features[4],
            FeatureGeometry::Present(Geometry::new(Value::Point(vec![1.0, 2.0])))
        );
    }
}
