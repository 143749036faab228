//! Location provider
//!
//! An explicitly constructed provider (no process-wide instance) that owns
//! the location signal. The signal starts as `Loading`, replays its current
//! value to each new subscriber, and never errors: failures are
//! `LocationState::Failed` values.

use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use weathervane_core::{Hub, HubStream};

use crate::api::{GeocodeError, Geocoder};
use crate::state::{Coordinates, LocationState};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location access was not granted")]
    PermissionDenied,

    #[error("location service unavailable")]
    ServiceUnavailable,

    #[error("location request timed out")]
    Timeout,

    #[error("{0}")]
    Other(String),
}

impl From<GeocodeError> for LocationError {
    fn from(err: GeocodeError) -> Self {
        if err.is_timeout() {
            return LocationError::Timeout;
        }
        match err {
            GeocodeError::NotFound(city) => LocationError::Other(format!("no place named {city}")),
            GeocodeError::Request(_) => LocationError::ServiceUnavailable,
        }
    }
}

/// Where positions come from.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSource {
    /// Fixed coordinates
    Fixed(Coordinates),
    /// Resolve a city name through the geocoder
    City(String),
    /// Nothing configured: behaves like a denied permission
    Unconfigured,
}

impl LocationSource {
    /// Produce one location emission.
    pub async fn resolve(&self, geocoder: &Geocoder) -> LocationState {
        match self {
            LocationSource::Fixed(coords) => LocationState::Located(*coords),
            LocationSource::City(city) => match geocoder.lookup(city).await {
                Ok(place) => {
                    info!(city = %city, place = %place.name, "City resolved");
                    LocationState::Located(place.coords)
                }
                Err(err) => {
                    warn!(city = %city, error = %err, "City lookup failed");
                    LocationState::Failed(err.into())
                }
            },
            LocationSource::Unconfigured => LocationState::Failed(LocationError::PermissionDenied),
        }
    }
}

/// Owner of the location signal.
#[derive(Clone)]
pub struct LocationProvider {
    hub: Hub<LocationState>,
}

impl LocationProvider {
    pub fn new() -> Self {
        Self {
            hub: Hub::with_initial(LocationState::Loading),
        }
    }

    /// Live location signal, starting with the current value.
    ///
    /// Every call returns an independent subscription to the same
    /// emissions; subscribing never triggers another lookup.
    pub fn current_location(&self) -> HubStream<LocationState> {
        self.hub.subscribe()
    }

    /// Emit a new location state to every subscriber.
    pub fn publish(&self, state: LocationState) {
        let receivers = self.hub.publish(state);
        tracing::trace!(receivers, "Location published");
    }

    pub fn current(&self) -> LocationState {
        self.hub.latest().unwrap_or(LocationState::Loading)
    }

    /// Resolve `source` now and, with `refresh`, again on every period.
    ///
    /// Each resolution is a new emission even if the position did not
    /// move, so downstream consumers refetch.
    pub fn spawn(
        &self,
        source: LocationSource,
        geocoder: Geocoder,
        refresh: Option<Duration>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let provider = self.clone();
        tokio::spawn(async move {
            provider.publish(source.resolve(&geocoder).await);

            let Some(period) = refresh else {
                return;
            };
            let mut interval = tokio::time::interval(period);
            // Skip the first immediate tick
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        provider.publish(source.resolve(&geocoder).await);
                    }
                }
            }
        })
    }
}

impl Default for LocationProvider {
    fn default() -> Self {
        Self::new()
    }
}
