//! End-to-end tests against PostGIS.
//!
//! Run with: `cargo test -p geolayers-api --test postgis_test -- --ignored`
//! Requires Docker for testcontainers (postgis/postgis image).

mod helpers;

use helpers::fixtures;
use helpers::{setup_postgis_app, upload_form};
use serde_json::Value;
use std::future::IntoFuture;

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_polygon_round_trip() {
    let app = setup_postgis_app(&[]).await;
    let client = app.client();

    let response = client
        .post("/upload")
        .multipart(upload_form(&[("a.geojson", fixtures::SQUARE_GEOJSON)]))
        .await;
    assert_eq!(response.status_code(), 200);

    let data: Value = client.get("/data").await.json();
    let features = data["features"].as_array().expect("features");
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["properties"]["name"], "a.geojson");
    assert_eq!(features[0]["geometry"]["type"], "Polygon");

    let srid: i32 = sqlx::query_scalar("SELECT ST_SRID(geometry) FROM geo_data LIMIT 1")
        .fetch_one(app.pool())
        .await
        .expect("srid");
    assert_eq!(srid, 4326);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_kml_and_z_drop() {
    let app = setup_postgis_app(&[]).await;
    let client = app.client();

    client
        .post("/upload")
        .multipart(upload_form(&[
            ("trip.kml", fixtures::TRIP_KML),
            ("peak.geojson", fixtures::POINT_3D_GEOJSON),
        ]))
        .await;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM geo_data WHERE name = 'trip.kml'")
        .fetch_one(app.pool())
        .await
        .expect("count");
    assert_eq!(count, 3);

    let dims: Vec<i16> = sqlx::query_scalar("SELECT ST_NDims(geometry) FROM geo_data")
        .fetch_all(app.pool())
        .await
        .expect("dims");
    assert!(dims.iter().all(|d| *d == 2));

    let layers: Value = client.get("/layers").await.json();
    let peak = &layers["peak.geojson"]["features"][0]["geometry"]["coordinates"];
    assert_eq!(peak.as_array().expect("coordinates").len(), 2);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_concurrent_uploads_are_all_stored() {
    let app = setup_postgis_app(&[]).await;
    let client = app.client();

    let first = fixtures::points_geojson(150);
    let second = fixtures::points_geojson(120);

    let (a, b) = tokio::join!(
        client
            .post("/upload")
            .multipart(upload_form(&[("first.geojson", first.as_str())]))
            .into_future(),
        client
            .post("/upload")
            .multipart(upload_form(&[("second.geojson", second.as_str())]))
            .into_future(),
    );
    assert_eq!(a.status_code(), 200);
    assert_eq!(b.status_code(), 200);

    let sources: Value = client.get("/sources").await.json();
    assert_eq!(
        sources,
        serde_json::json!([
            { "name": "first.geojson", "feature_count": 150 },
            { "name": "second.geojson", "feature_count": 120 }
        ])
    );
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_atomic_mode_commits_whole_file() {
    let app = setup_postgis_app(&[("INGEST_ATOMIC_FILES", "true")]).await;
    let client = app.client();

    let response = client
        .post("/upload")
        .multipart(upload_form(&[("trip.kml", fixtures::TRIP_KML)]))
        .await;
    let body: Value = response.json();
    assert_eq!(body["files"][0]["status"], "processed");
    assert_eq!(body["files"][0]["saved"], 3);

    let data: Value = client.get("/data").await.json();
    assert_eq!(data["features"].as_array().expect("features").len(), 3);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_readiness_with_database() {
    let app = setup_postgis_app(&[]).await;
    let response = app.client().get("/health/ready").await;
    assert_eq!(response.status_code(), 200);
}
