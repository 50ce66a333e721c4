use crate::{
    db, health_check, index_handler, precipitation, routes, stations, temperature_between,
    temperature_from, tobs, ClimateAccess, ClimateData,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{header::ACCEPT, Method};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub climate_db: Arc<dyn ClimateData>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::climate::precipitation::precipitation,
        routes::climate::stations::stations,
        routes::climate::tobs::tobs,
        routes::climate::temperature::temperature_from,
        routes::climate::temperature::temperature_between,
        routes::health::health_check,
    ),
    components(
        schemas(
                db::Precipitation,
                db::TemperatureObservation,
                db::TemperatureSummary,
                routes::ErrorResponse,
                routes::health::HealthResponse,
        )
    ),
    tags(
        (name = "climate observation api", description = "a read-only RESTful api over daily station precipitation and temperature observations")
    )
)]
struct ApiDoc;

pub async fn build_app_state(database_url: &str) -> Result<AppState, anyhow::Error> {
    let climate_db = Arc::new(
        ClimateAccess::connect(database_url)
            .await
            .map_err(|e| anyhow!("error opening climate dataset: {}", e))?,
    );

    Ok(AppState { climate_db })
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT])
        .allow_origin(Any);

    // static segments win over the `{start}` capture, so precipitation,
    // stations and tobs never reach the temperature handlers
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_check))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(temperature_from))
        .route("/api/v1.0/{start}/{end}", get(temperature_between))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default()
        .to_owned();
    info!(target: "http_request", "new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, {} code: {}, time: {}", path, response.status().as_str(), response_time);

    response
}
