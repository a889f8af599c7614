//! In-memory provider serving canned readings

use crate::{DataProvider, FetchError, FetchResult, ForecastQuery};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use zephyr_core::Reading;

/// Provider for tests and offline runs.
///
/// Answers every query with the stored readings matching its hour and
/// metric filter, regardless of location.
pub struct FixtureProvider {
    readings: Vec<Reading>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl FixtureProvider {
    pub fn new(readings: Vec<Reading>) -> Self {
        Self {
            readings,
            delay: None,
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    /// Wait `delay` before answering each query
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of queries received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make subsequent queries fail with HTTP 503
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl DataProvider for FixtureProvider {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn fetch(&self, query: &ForecastQuery) -> FetchResult<Vec<Reading>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(FetchError::Status { status: 503 });
        }

        Ok(self
            .readings
            .iter()
            .filter(|r| r.forecast_hour == query.forecast_hour)
            .filter(|r| query.metric.map_or(true, |m| r.metric_type == m))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zephyr_core::{Location, MetricId};

    fn reading(metric: MetricId, hour: u8) -> Reading {
        Reading {
            metric_type: metric,
            value: 1.0,
            forecast_hour: hour,
            location: Location { lat: 0.0, lng: 0.0 },
        }
    }

    #[tokio::test]
    async fn test_filters_by_hour_and_metric() {
        let provider = FixtureProvider::new(vec![
            reading(MetricId::Uv, 1),
            reading(MetricId::Pm10, 1),
            reading(MetricId::Pm10, 2),
        ]);
        let location = Location { lat: 10.0, lng: 10.0 };

        let all = provider.fetch(&ForecastQuery::new(location, 1)).await.unwrap();
        assert_eq!(all.len(), 2);

        let pm10 = provider
            .fetch(&ForecastQuery::new(location, 2).with_metric(MetricId::Pm10))
            .await
            .unwrap();
        assert_eq!(pm10.len(), 1);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_failing() {
        let provider = FixtureProvider::new(Vec::new());
        provider.set_failing(true);

        let result = provider
            .fetch(&ForecastQuery::new(Location { lat: 0.0, lng: 0.0 }, 0))
            .await;
        assert!(matches!(result, Err(FetchError::Status { status: 503 })));
    }
}
