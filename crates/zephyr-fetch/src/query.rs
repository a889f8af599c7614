//! Provider query parameters and their canonical cache key

use crate::{FetchError, FetchResult};
use url::form_urlencoded;
use zephyr_core::{ForecastHour, Location, MetricId, MAX_FORECAST_HOUR};

/// One provider request: a point, an hour and an optional metric filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastQuery {
    pub location: Location,
    pub forecast_hour: ForecastHour,
    /// `None` requests every metric
    pub metric: Option<MetricId>,
}

impl ForecastQuery {
    pub fn new(location: Location, forecast_hour: ForecastHour) -> Self {
        Self {
            location,
            forecast_hour,
            metric: None,
        }
    }

    pub fn with_metric(mut self, metric: MetricId) -> Self {
        self.metric = Some(metric);
        self
    }

    /// Reject bad coordinates or hours before anything is fetched
    pub fn validate(&self) -> FetchResult<()> {
        self.location.validate()?;
        if self.forecast_hour > MAX_FORECAST_HOUR {
            return Err(FetchError::InvalidForecastHour(self.forecast_hour));
        }
        Ok(())
    }

    /// Query parameters in provider order
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("lat", coordinate(self.location.lat)),
            ("lng", coordinate(self.location.lng)),
            ("forecastHour", self.forecast_hour.to_string()),
        ];
        if let Some(metric) = self.metric {
            params.push(("metricType", metric.code().to_string()));
        }
        params
    }

    /// Canonical form-encoded key; equal queries always produce equal keys
    pub fn cache_key(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params())
            .finish()
    }
}

/// `-0.0` and `0.0` are the same coordinate and must render the same
fn coordinate(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}
