//! Sample upload documents.

pub const SQUARE_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "name": "square" },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[10.0, 59.0], [10.1, 59.0], [10.1, 59.1], [10.0, 59.1], [10.0, 59.0]]]
      }
    }
  ]
}"#;

pub const POINT_3D_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    { "type": "Feature", "properties": {}, "geometry": { "type": "Point", "coordinates": [10.75, 59.91, 120.5] } }
  ]
}"#;

pub const EMPTY_GEOJSON: &str = r#"{"type":"FeatureCollection","features":[]}"#;

/// Three placemarks with geometry and one without.
pub const TRIP_KML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>Trip</name>
    <Placemark>
      <name>Start</name>
      <Point><coordinates>10.70,59.90,15</coordinates></Point>
    </Placemark>
    <Placemark>
      <name>Route</name>
      <LineString><coordinates>10.70,59.90 10.72,59.92 10.75,59.91</coordinates></LineString>
    </Placemark>
    <Folder>
      <Placemark>
        <name>Park</name>
        <Polygon>
          <outerBoundaryIs>
            <LinearRing><coordinates>10.71,59.91 10.72,59.91 10.72,59.92 10.71,59.92 10.71,59.91</coordinates></LinearRing>
          </outerBoundaryIs>
        </Polygon>
      </Placemark>
    </Folder>
    <Placemark>
      <name>Note without geometry</name>
    </Placemark>
  </Document>
</kml>"#;

/// GeoJSON with `count` point features.
pub fn points_geojson(count: usize) -> String {
    let features: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{"type":"Feature","properties":{{}},"geometry":{{"type":"Point","coordinates":[{}.0,{}.5]}}}}"#,
                i % 180,
                i % 90
            )
        })
        .collect();
    format!(
        r#"{{"type":"FeatureCollection","features":[{}]}}"#,
        features.join(",")
    )
}
