//! HTTP provider for the Zephyr forecast API

use crate::{parse_readings, DataProvider, FetchError, FetchResult, ForecastQuery};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use zephyr_core::Reading;

pub const DEFAULT_BASE_URL: &str = "https://zephyr.190304.xyz/api/v1/data";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Provider backed by `GET <base>?lat=..&lng=..&forecastHour=..[&metricType=..]`
pub struct HttpProvider {
    client: Client,
    base_url: Url,
}

impl HttpProvider {
    pub fn new(base_url: &str, timeout: Duration) -> FetchResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| FetchError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full request URL for a query
    pub fn request_url(&self, query: &ForecastQuery) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().extend_pairs(query.params());
        url
    }
}

#[async_trait::async_trait]
impl DataProvider for HttpProvider {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, query: &ForecastQuery) -> FetchResult<Vec<Reading>> {
        let url = self.request_url(query);
        debug!(url = %url, "requesting forecast data");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), metric = ?query.metric, "provider returned an error");
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        parse_readings(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zephyr_core::{Location, MetricId};

    #[test]
    fn test_request_url() {
        let provider = HttpProvider::new("http://localhost:9000/api/v1/data", DEFAULT_TIMEOUT).unwrap();
        let query = ForecastQuery::new(Location { lat: 46.77, lng: 23.6 }, 5).with_metric(MetricId::O3);

        assert_eq!(
            provider.request_url(&query).as_str(),
            "http://localhost:9000/api/v1/data?lat=46.77&lng=23.6&forecastHour=5&metricType=o3_conc"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpProvider::new("not a url", DEFAULT_TIMEOUT),
            Err(FetchError::InvalidBaseUrl(_))
        ));
    }
}
