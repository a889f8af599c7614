use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Result;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use opentelemetry::metrics::{Counter, MeterProvider};
use opentelemetry::KeyValue;
use opentelemetry_prometheus::exporter;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use prometheus::{Encoder, Registry, TextEncoder};
use serde::{Deserialize, Serialize};
use zephyr_core::{
    aqi_category, assess_combined_risk, build_report, catalog, compute_aqi, compute_pollen_index, pollen_advice,
    AqiResult, ForecastHour, Location, LocationError, PollenResult, ReadingSet,
};
use zephyr_fetch::{clamp_forecast_hour, CachedFetcher, FetchError};

pub struct AppState {
    ready: AtomicBool,
    registry: Registry,
    #[allow(dead_code)]
    provider: SdkMeterProvider,
    requests_total: Counter<u64>,
    fetch_errors_total: Counter<u64>,
    fetcher: Arc<CachedFetcher>,
    default_hour: ForecastHour,
}

pub fn build_app(fetcher: Arc<CachedFetcher>, default_hour: ForecastHour) -> Result<(Router, Arc<AppState>)> {
    // Prometheus exporter via OpenTelemetry
    let registry = Registry::new();
    let reader = exporter()
        .with_registry(registry.clone())
        .build()
        .map_err(|e| anyhow::anyhow!("prometheus exporter: {e}"))?;
    let provider = SdkMeterProvider::builder().with_reader(reader).build();
    let meter = provider.meter("zephyr-api");

    let requests_total = meter
        .u64_counter("zephyr_requests_total")
        .with_description("Total HTTP requests served")
        .init();
    let fetch_errors_total = meter
        .u64_counter("zephyr_fetch_errors_total")
        .with_description("Requests that failed to obtain forecast data")
        .init();

    let state = Arc::new(AppState {
        ready: AtomicBool::new(false),
        registry,
        provider,
        requests_total,
        fetch_errors_total,
        fetcher,
        default_hour: clamp_forecast_hour(default_hour as i64),
    });

    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/api/v1/catalog", get(metric_catalog))
        .route("/api/v1/aqi", get(aqi))
        .route("/api/v1/pollen", get(pollen))
        .route("/api/v1/risk", get(risk))
        .route("/api/v1/report", get(report))
        .with_state(Arc::clone(&state));

    Ok((router, state))
}

pub fn set_ready(state: &Arc<AppState>, is_ready: bool) {
    state.ready.store(is_ready, Ordering::Relaxed);
}

/// Error body `{"error": "..."}`
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Upstream(FetchError),
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::InvalidLocation(_) | FetchError::InvalidForecastHour(_) => {
                ApiError::BadRequest(err.to_string())
            }
            other => ApiError::Upstream(other),
        }
    }
}

impl From<LocationError> for ApiError {
    fn from(err: LocationError) -> Self {
        ApiError::from(FetchError::from(err))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Upstream(err) => {
                tracing::warn!(error = %err, "forecast fetch failed");
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForecastParams {
    lat: Option<f64>,
    lng: Option<f64>,
    forecast_hour: Option<i64>,
}

async fn readings_for(
    state: &AppState,
    route: &'static str,
    params: Result<Query<ForecastParams>, QueryRejection>,
) -> Result<ReadingSet, ApiError> {
    state.requests_total.add(1, &[KeyValue::new("route", route)]);

    let Query(params) = params?;
    let (Some(lat), Some(lng)) = (params.lat, params.lng) else {
        return Err(ApiError::BadRequest("lat and lng are required".to_string()));
    };
    let location = Location::new(lat, lng)?;
    let hour = params
        .forecast_hour
        .map(clamp_forecast_hour)
        .unwrap_or(state.default_hour);

    state
        .fetcher
        .fetch_readings(location, hour)
        .await
        .map_err(|e| {
            state.fetch_errors_total.add(1, &[KeyValue::new("route", route)]);
            ApiError::from(e)
        })
}

async fn healthz(State(state): State<Arc<AppState>>) -> StatusCode {
    state.requests_total.add(1, &[KeyValue::new("route", "healthz")]);
    StatusCode::OK
}

async fn readyz(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.ready.load(Ordering::Relaxed) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn metrics(
    State(state): State<Arc<AppState>>,
) -> (
    [(axum::http::header::HeaderName, axum::http::HeaderValue); 1],
    String,
) {
    let encoder = TextEncoder::new();
    let metric_families = state.registry.gather();
    let mut buf = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buf) {
        tracing::warn!(error=?e, "failed to encode metrics");
    }
    let body = String::from_utf8(buf).unwrap_or_default();
    let header = (
        header::CONTENT_TYPE,
        axum::http::HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    ([header], body)
}

async fn metric_catalog(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.requests_total.add(1, &[KeyValue::new("route", "catalog")]);
    Json(catalog())
}

#[derive(Serialize)]
struct AqiResponse {
    #[serde(flatten)]
    result: AqiResult,
    category: &'static str,
}

async fn aqi(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ForecastParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let readings = readings_for(&state, "aqi", params).await?;
    let result = compute_aqi(&readings);
    let category = aqi_category(result.aqi);
    Ok(Json(AqiResponse { result, category }))
}

#[derive(Serialize)]
struct PollenResponse {
    #[serde(flatten)]
    result: PollenResult,
    advice: &'static str,
}

async fn pollen(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ForecastParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let readings = readings_for(&state, "pollen", params).await?;
    let result = compute_pollen_index(&readings);
    let advice = pollen_advice(result.index);
    Ok(Json(PollenResponse { result, advice }))
}

async fn risk(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ForecastParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let readings = readings_for(&state, "risk", params).await?;
    Ok(Json(assess_combined_risk(&readings)))
}

async fn report(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ForecastParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let readings = readings_for(&state, "report", params).await?;
    Ok(Json(build_report(&readings)))
}
