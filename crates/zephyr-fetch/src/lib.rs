//! Forecast data access for Zephyr
//!
//! Providers return already-computed readings for a `(location, hour,
//! metric?)` query. `CachedFetcher` puts a TTL cache in front of a provider
//! so repeated reads of the same query do not hit the network again.

pub mod cache;
pub mod fetcher;
pub mod fixture;
pub mod http;
pub mod query;
pub mod session;
pub mod wire;

pub use cache::*;
pub use fetcher::*;
pub use fixture::*;
pub use http::*;
pub use query::*;
pub use session::*;
pub use wire::*;

use thiserror::Error;
use zephyr_core::{ForecastHour, LocationError, Reading};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid location: {0}")]
    InvalidLocation(#[from] LocationError),

    #[error("Invalid forecast hour: {0}")]
    InvalidForecastHour(ForecastHour),

    #[error("Invalid provider URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Failed to fetch data: HTTP {status}")]
    Status { status: u16 },

    #[error("Network error fetching forecast data: {0}")]
    Network(String),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("Request cancelled: selection changed")]
    Cancelled,
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Source of forecast readings
#[async_trait::async_trait]
pub trait DataProvider: Send + Sync {
    /// Provider name/identifier
    fn name(&self) -> &str;

    /// Fetch every reading matching the query. Failures are returned, never
    /// retried.
    async fn fetch(&self, query: &ForecastQuery) -> FetchResult<Vec<Reading>>;
}
