//! Cache-first access to a data provider

use crate::{DataProvider, FetchCache, FetchResult, ForecastQuery};
use std::sync::Arc;
use tracing::{debug, instrument};
use zephyr_core::{ForecastHour, Location, MetricId, Reading, ReadingSet};

pub struct CachedFetcher {
    provider: Arc<dyn DataProvider>,
    cache: FetchCache,
}

impl CachedFetcher {
    pub fn new(provider: Arc<dyn DataProvider>, cache: FetchCache) -> Self {
        Self { provider, cache }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn cache(&self) -> &FetchCache {
        &self.cache
    }

    /// Readings for `query`, from the cache while fresh.
    ///
    /// Invalid queries fail before the provider is contacted. Provider errors
    /// are returned as-is and leave the cache untouched.
    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn fetch(&self, query: &ForecastQuery) -> FetchResult<Arc<[Reading]>> {
        query.validate()?;
        let key = query.cache_key();

        if let Some(hit) = self.cache.get(&key).await {
            debug!(key = %key, "cache hit");
            return Ok(hit);
        }

        let started = self.cache.now();
        let readings = self.provider.fetch(query).await?;
        debug!(key = %key, count = readings.len(), "fetched from provider");

        Ok(self.cache.put_fetched(key, readings, started).await)
    }

    /// Every metric at a location and hour, indexed by metric
    pub async fn fetch_readings(&self, location: Location, forecast_hour: ForecastHour) -> FetchResult<ReadingSet> {
        let readings = self.fetch(&ForecastQuery::new(location, forecast_hour)).await?;
        Ok(readings.iter().collect())
    }

    /// A single metric; `None` when the provider has no value for it
    pub async fn fetch_metric(
        &self,
        metric: MetricId,
        location: Location,
        forecast_hour: ForecastHour,
    ) -> FetchResult<Option<Reading>> {
        let query = ForecastQuery::new(location, forecast_hour).with_metric(metric);
        let readings = self.fetch(&query).await?;
        Ok(readings.iter().find(|r| r.metric_type == metric).cloned())
    }
}
