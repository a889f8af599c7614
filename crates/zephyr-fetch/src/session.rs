//! Interactive forecast session: one current selection, cancellable refresh

use crate::{CachedFetcher, FetchError, FetchResult, ForecastQuery};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;
use zephyr_core::{build_report, EnvironmentReport, ForecastHour, Location, ReadingSet, MAX_FORECAST_HOUR};

/// What the user is currently looking at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub location: Location,
    pub forecast_hour: ForecastHour,
}

/// Clamp an arbitrary hour into 0..=23
pub fn clamp_forecast_hour(hour: i64) -> ForecastHour {
    hour.clamp(0, MAX_FORECAST_HOUR as i64) as ForecastHour
}

pub struct ForecastSession {
    fetcher: Arc<CachedFetcher>,
    selection: watch::Sender<Selection>,
}

impl ForecastSession {
    pub fn new(fetcher: Arc<CachedFetcher>, location: Location, forecast_hour: i64) -> Self {
        let (selection, _) = watch::channel(Selection {
            location,
            forecast_hour: clamp_forecast_hour(forecast_hour),
        });
        Self { fetcher, selection }
    }

    pub fn selection(&self) -> Selection {
        *self.selection.borrow()
    }

    /// Receiver notified on every selection change
    pub fn subscribe(&self) -> watch::Receiver<Selection> {
        self.selection.subscribe()
    }

    pub fn select_location(&self, location: Location) -> FetchResult<()> {
        location.validate()?;
        self.selection.send_modify(|s| s.location = location);
        Ok(())
    }

    /// Out-of-range hours are clamped, never rejected
    pub fn set_forecast_hour(&self, hour: i64) -> ForecastHour {
        let hour = clamp_forecast_hour(hour);
        self.selection.send_modify(|s| s.forecast_hour = hour);
        hour
    }

    /// Fetch and evaluate the current selection.
    ///
    /// If the selection changes before the fetch completes the request is
    /// dropped and `FetchError::Cancelled` returned; its result is never
    /// cached or reported.
    pub async fn refresh(&self) -> FetchResult<EnvironmentReport> {
        let mut changes = self.selection.subscribe();
        let selection = *changes.borrow_and_update();
        let query = ForecastQuery::new(selection.location, selection.forecast_hour);

        tokio::select! {
            result = self.fetcher.fetch(&query) => {
                let readings: ReadingSet = result?.iter().collect();
                Ok(build_report(&readings))
            }
            _ = changes.changed() => {
                debug!(?selection, "selection changed, dropping refresh");
                Err(FetchError::Cancelled)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_forecast_hour() {
        assert_eq!(clamp_forecast_hour(-3), 0);
        assert_eq!(clamp_forecast_hour(7), 7);
        assert_eq!(clamp_forecast_hour(48), 23);
    }
}
