use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use std::sync::Arc;
use tower::ServiceExt;
use zephyr_core::{Location, MetricId, Reading};
use zephyr_fetch::{CachedFetcher, FetchCache, FixtureProvider};

fn reading(metric: MetricId, value: f64, hour: u8) -> Reading {
    Reading {
        metric_type: metric,
        value,
        forecast_hour: hour,
        location: Location { lat: 44.43, lng: 26.1 },
    }
}

fn fixture() -> Vec<Reading> {
    vec![
        reading(MetricId::Pm25, 1.0e-8, 1),
        reading(MetricId::No2, 120.0, 1),
        reading(MetricId::Temperature, 308.15, 1),
        reading(MetricId::Uv, 0.05, 1),
        reading(MetricId::SurfacePressure, 101_325.0, 1),
        reading(MetricId::BirchPollen, 120.0, 1),
        reading(MetricId::GrassPollen, 0.2, 1),
        reading(MetricId::Pm25, 4.0e-8, 6),
    ]
}

fn app_with(provider: Arc<FixtureProvider>) -> Router {
    let fetcher = Arc::new(CachedFetcher::new(provider, FetchCache::default()));
    let (app, _state) = zephyr_api::build_app(fetcher, 1).unwrap();
    app
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let res = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn health_and_readiness() {
    let fetcher = Arc::new(CachedFetcher::new(
        Arc::new(FixtureProvider::new(fixture())),
        FetchCache::default(),
    ));
    let (app, state) = zephyr_api::build_app(fetcher, 1).unwrap();

    let res = app
        .clone()
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .clone()
        .oneshot(Request::builder().uri("/readyz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    zephyr_api::set_ready(&state, true);
    let res = app
        .clone()
        .oneshot(Request::builder().uri("/readyz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn aqi_endpoint() {
    let app = app_with(Arc::new(FixtureProvider::new(fixture())));

    let (status, json) = get_json(&app, "/api/v1/aqi?lat=44.43&lng=26.1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["aqi"], 105);
    assert_eq!(json["mainPollutant"], "Nitrogen Dioxide (NO₂)");
    assert_eq!(json["unit"], "ppb");
    assert_eq!(json["category"], "Unhealthy for Sensitive Groups");
}

#[tokio::test]
async fn forecast_hour_selects_slice() {
    let app = app_with(Arc::new(FixtureProvider::new(fixture())));

    let (status, json) = get_json(&app, "/api/v1/aqi?lat=44.43&lng=26.1&forecastHour=6").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["aqi"], 112);
    assert_eq!(json["mainPollutant"], "PM2.5");

    // an hour with no data renders the sentinel
    let (status, json) = get_json(&app, "/api/v1/aqi?lat=44.43&lng=26.1&forecastHour=40").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["aqi"], 0);
    assert_eq!(json["mainPollutant"], "Unknown");
}

#[tokio::test]
async fn pollen_endpoint() {
    let app = app_with(Arc::new(FixtureProvider::new(fixture())));

    let (status, json) = get_json(&app, "/api/v1/pollen?lat=44.43&lng=26.1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["dominantPollen"], "Birch");
    // birch medium (2) + grass low (1) out of 6
    assert_eq!(json["index"], 5);
    assert_eq!(json["level"], "Medium");
    assert!(json["advice"].as_str().unwrap().starts_with("Moderate"));
}

#[tokio::test]
async fn risk_and_report_endpoints() {
    let app = app_with(Arc::new(FixtureProvider::new(fixture())));

    let (status, risk) = get_json(&app, "/api/v1/risk?lat=44.43&lng=26.1").await;
    assert_eq!(status, StatusCode::OK);
    // extreme heat 3 + moderate UV 0.5, times 1.5
    assert_eq!(risk["riskScore"], 5.25);
    assert_eq!(risk["level"], "High");
    assert_eq!(risk["factors"], serde_json::json!(["extreme-heat", "moderate-uv"]));

    let (status, report) = get_json(&app, "/api/v1/report?lat=44.43&lng=26.1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["risk"], risk);
    assert_eq!(report["aqi"]["aqi"], 105);
    assert_eq!(report["pollen"]["dominantPollen"], "Birch");
}

#[tokio::test]
async fn repeated_requests_hit_cache() {
    let provider = Arc::new(FixtureProvider::new(fixture()));
    let app = app_with(provider.clone());

    get_json(&app, "/api/v1/aqi?lat=44.43&lng=26.1").await;
    get_json(&app, "/api/v1/pollen?lat=44.43&lng=26.1").await;
    get_json(&app, "/api/v1/report?lat=44.43&lng=26.1&forecastHour=1").await;

    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn invalid_location_is_bad_request() {
    let provider = Arc::new(FixtureProvider::new(fixture()));
    let app = app_with(provider.clone());

    let (status, json) = get_json(&app, "/api/v1/aqi?lat=91&lng=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Latitude"));

    let (status, json) = get_json(&app, "/api/v1/risk?lat=10").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());

    let (status, _) = get_json(&app, "/api/v1/pollen?lat=abc&lng=1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn provider_failure_is_bad_gateway() {
    let provider = Arc::new(FixtureProvider::new(fixture()));
    provider.set_failing(true);
    let app = app_with(provider);

    let (status, json) = get_json(&app, "/api/v1/report?lat=44.43&lng=26.1").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], "Failed to fetch data: HTTP 503");
}

#[tokio::test]
async fn catalog_lists_all_metrics() {
    let app = app_with(Arc::new(FixtureProvider::new(Vec::new())));

    let (status, json) = get_json(&app, "/api/v1/catalog").await;
    assert_eq!(status, StatusCode::OK);
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 16);
    assert_eq!(entries[3]["metricType"], "pm2p5");
    assert_eq!(entries[3]["displayName"], "PM2.5");
    assert_eq!(entries[3]["kind"], "pollutant");
}

#[tokio::test]
async fn metrics_endpoint_exposes_counters() {
    let app = app_with(Arc::new(FixtureProvider::new(fixture())));
    get_json(&app, "/api/v1/aqi?lat=44.43&lng=26.1").await;

    let res = app
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("zephyr_requests_total"));
}
