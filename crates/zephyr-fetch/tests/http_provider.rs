use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use zephyr_core::{Location, MetricId};
use zephyr_fetch::{DataProvider, FetchError, ForecastQuery, HttpProvider};

/// Serve exactly one canned HTTP response and report the request line
async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let request = String::from_utf8_lossy(&request).to_string();
        let request_line = request.lines().next().unwrap_or_default().to_string();

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        let _ = tx.send(request_line);
    });

    (format!("http://{addr}/api/v1/data"), rx)
}

#[tokio::test]
async fn test_fetch_over_http() {
    let body = r#"[{"id":1,"point":{"id":4,"forecastHour":3,"latitude":47.16,"longitude":27.58},"metricType":"no2_conc","value":21.5,"status":0},{"id":2,"point":{"id":4,"forecastHour":3,"latitude":47.16,"longitude":27.58},"metricType":"unknown_conc","value":1.0,"status":0}]"#;
    let (base_url, request_line) = serve_once("200 OK", body).await;

    let provider = HttpProvider::new(&base_url, Duration::from_secs(5)).unwrap();
    let query = ForecastQuery::new(Location { lat: 47.16, lng: 27.58 }, 3).with_metric(MetricId::No2);
    let readings = provider.fetch(&query).await.unwrap();

    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0].metric_type, MetricId::No2);
    assert_eq!(readings[0].value, 21.5);
    assert_eq!(readings[0].forecast_hour, 3);

    let request_line = request_line.await.unwrap();
    assert_eq!(
        request_line,
        "GET /api/v1/data?lat=47.16&lng=27.58&forecastHour=3&metricType=no2_conc HTTP/1.1"
    );
}

#[tokio::test]
async fn test_non_success_status() {
    let (base_url, _request_line) = serve_once("503 Service Unavailable", "").await;

    let provider = HttpProvider::new(&base_url, Duration::from_secs(5)).unwrap();
    let query = ForecastQuery::new(Location { lat: 0.0, lng: 0.0 }, 0);

    let err = provider.fetch(&query).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 503 }));
    assert_eq!(err.to_string(), "Failed to fetch data: HTTP 503");
}

#[tokio::test]
async fn test_connection_refused() {
    // bind then drop so the port is very likely closed
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let provider = HttpProvider::new(&format!("http://{addr}/"), Duration::from_secs(2)).unwrap();
    let err = provider
        .fetch(&ForecastQuery::new(Location { lat: 0.0, lng: 0.0 }, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));
}
