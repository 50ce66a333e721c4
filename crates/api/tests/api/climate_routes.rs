use crate::helpers::{spawn_app, MockClimateAccess};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use climate_api::{
    DateRange, Error, InvalidDate, Precipitation, TemperatureObservation, TemperatureRequest,
    TemperatureSummary,
};
use std::sync::Arc;
use time::macros::date;

/// Static api segments must not fall through to the `{start}` capture
#[tokio::test]
async fn precipitation_route_is_not_treated_as_a_date() {
    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_precipitation()
        .times(1)
        .returning(|| Ok(mock_precipitation()));
    climate_data.expect_temperature_summary().times(0);

    let test_app = spawn_app(Arc::new(climate_data)).await;
    let (status, json) = test_app.get_json("/api/v1.0/precipitation").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["Date"], "2017-08-23");
    assert_eq!(json[0]["Prcp"], 0.5);
    assert!(json[1]["Prcp"].is_null());
}

#[tokio::test]
async fn stations_returns_identifiers() {
    let mut climate_data = MockClimateAccess::new();
    climate_data.expect_stations().times(1).returning(|| {
        Ok(vec![
            String::from("USC00511918"),
            String::from("USC00513117"),
        ])
    });
    climate_data.expect_temperature_summary().times(0);

    let test_app = spawn_app(Arc::new(climate_data)).await;
    let (status, json) = test_app.get_json("/api/v1.0/stations").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!(["USC00511918", "USC00513117"]));
}

#[tokio::test]
async fn tobs_returns_date_and_temperature() {
    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_most_active_station_temperatures()
        .times(1)
        .returning(|| {
            Ok(vec![TemperatureObservation {
                date: String::from("2017-08-18"),
                tobs: 79.0,
            }])
        });
    climate_data.expect_temperature_summary().times(0);

    let test_app = spawn_app(Arc::new(climate_data)).await;
    let (status, json) = test_app.get_json("/api/v1.0/tobs").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!([{ "Date": "2017-08-18", "Tobs": 79.0 }]));
}

#[tokio::test]
async fn start_route_requests_open_ended_summary() {
    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_temperature_summary()
        .withf(|req: &TemperatureRequest| req.start == "2017-08-23" && req.end.is_none())
        .times(1)
        .returning(|_| Ok(mock_summary()));

    let test_app = spawn_app(Arc::new(climate_data)).await;
    let (status, json) = test_app.get_json("/api/v1.0/2017-08-23").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        serde_json::json!([{
            "Date": "2017-08-23",
            "T-Min": 76.0,
            "T-Avg": 80.25,
            "T-Max": 82.0
        }])
    );
}

#[tokio::test]
async fn start_end_route_requests_bounded_summary() {
    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_temperature_summary()
        .withf(|req: &TemperatureRequest| {
            req.start == "2017-08-01" && req.end.as_deref() == Some("2017-08-23")
        })
        .times(1)
        .returning(|_| Ok(mock_summary()));

    let test_app = spawn_app(Arc::new(climate_data)).await;
    let (status, json) = test_app.get_json("/api/v1.0/2017-08-01/2017-08-23").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn invalid_date_is_a_not_found_error_object() {
    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_temperature_summary()
        .times(1)
        .returning(|req| {
            Err(Error::InvalidDate(InvalidDate::End {
                end: req.end.clone().unwrap_or_default(),
                first: String::from("2010-01-01"),
                last: String::from("2017-08-23"),
            }))
        });

    let test_app = spawn_app(Arc::new(climate_data)).await;
    let (status, json) = test_app.get_json("/api/v1.0/2016-01-01/2018-01-01").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let message = json["error"].as_str().unwrap();
    assert!(message.starts_with("end date 2018-01-01"));
    assert!(message.contains("2010-01-01"));
    assert!(message.contains("2017-08-23"));
}

#[tokio::test]
async fn empty_dataset_is_a_not_found_error_object() {
    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_temperature_summary()
        .times(1)
        .returning(|_| Err(Error::NoObservations));

    let test_app = spawn_app(Arc::new(climate_data)).await;
    let (status, json) = test_app.get_json("/api/v1.0/2017-08-23").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "no observations are available");
}

#[tokio::test]
async fn data_source_failure_is_a_generic_server_error() {
    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_stations()
        .times(1)
        .returning(|| Err(Error::Query(sqlx::Error::PoolTimedOut)));

    let test_app = spawn_app(Arc::new(climate_data)).await;
    let (status, body) = test_app.get("/api/v1.0/stations").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.contains("pool"));
}

#[tokio::test]
async fn root_lists_routes_with_dataset_range() {
    let mut climate_data = MockClimateAccess::new();
    climate_data.expect_date_range().times(1).returning(|| {
        Ok(Some(DateRange::new(
            date!(2010 - 01 - 01),
            date!(2017 - 08 - 23),
        )))
    });

    let test_app = spawn_app(Arc::new(climate_data)).await;
    let (status, html) = test_app.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Available Routes:"));
    assert!(html.contains("/api/v1.0/precipitation"));
    assert!(html.contains("/api/v1.0/yyyy-mm-dd/yyyy-mm-dd"));
    assert!(html.contains("Data available between 2010-01-01 to 2017-08-23"));
}

#[tokio::test]
async fn health_reports_unavailable_dataset() {
    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_health_check()
        .times(1)
        .returning(|| Err(Error::Query(sqlx::Error::PoolClosed)));

    let test_app = spawn_app(Arc::new(climate_data)).await;
    let (status, json) = test_app.get_json("/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["status"], "unavailable");
}

#[tokio::test]
async fn docs_serve_the_api_reference() {
    let test_app = spawn_app(Arc::new(MockClimateAccess::new())).await;
    let (status, html) = test_app.get("/docs").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.to_lowercase().contains("<html"));
    assert!(html.contains("/api/v1.0/precipitation"));
}

#[tokio::test]
async fn cross_origin_reads_are_allowed() {
    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_stations()
        .times(1)
        .returning(|| Ok(vec![String::from("USC00519281")]));

    let test_app = spawn_app(Arc::new(climate_data)).await;
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1.0/stations")
        .header(header::ORIGIN, "https://example.com")
        .body(Body::empty())
        .unwrap();
    let response = test_app.send(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], br#"["USC00519281"]"#);
}

#[tokio::test]
async fn preflight_allows_get_only() {
    let test_app = spawn_app(Arc::new(MockClimateAccess::new())).await;
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1.0/tobs")
        .header(header::ORIGIN, "https://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();
    let response = test_app.send(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let allowed = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap();
    assert!(allowed.contains("GET"));
    assert!(!allowed.contains("POST"));
}

fn mock_precipitation() -> Vec<Precipitation> {
    vec![
        Precipitation {
            date: String::from("2017-08-23"),
            prcp: Some(0.5),
        },
        Precipitation {
            date: String::from("2017-08-23"),
            prcp: None,
        },
    ]
}

fn mock_summary() -> Vec<TemperatureSummary> {
    vec![TemperatureSummary {
        date: String::from("2017-08-23"),
        t_min: 76.0,
        t_avg: 80.25,
        t_max: 82.0,
    }]
}
