//! HTTP collaborators: OpenWeatherMap current weather and Open-Meteo geocoding
//!
//! The state machine only sees the [`WeatherFetcher`] trait; the clients
//! here are the production implementations.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::state::{Coordinates, Weather};

pub const OPENWEATHER_URL: &str = "https://api.openweathermap.org";
pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One-shot weather lookup. Completes or fails exactly once per call.
pub trait WeatherFetcher: Send + Sync + 'static {
    fn fetch(&self, coords: Coordinates)
        -> impl Future<Output = Result<Weather, FetchError>> + Send;
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("weather request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("weather service answered HTTP {status}")]
    Status { status: u16 },

    #[error("could not decode weather response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("weather response listed no conditions")]
    EmptyConditions,
}

// ============================================================================
// OpenWeatherMap
// ============================================================================

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    weather: Vec<Condition>,
    main: Readings,
    name: String,
}

#[derive(Debug, Deserialize)]
struct Condition {
    main: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct Readings {
    temp: f64,
}

impl TryFrom<WeatherResponse> for Weather {
    type Error = FetchError;

    fn try_from(response: WeatherResponse) -> Result<Self, Self::Error> {
        let condition = response
            .weather
            .into_iter()
            .next()
            .ok_or(FetchError::EmptyConditions)?;
        Ok(Weather {
            description: condition.main,
            icon_code: condition.icon,
            temperature: response.main.temp,
            location: response.name,
        })
    }
}

/// Current-weather client for the OpenWeatherMap API (metric units).
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(FetchError::Request)?;
        Ok(Self {
            http,
            base_url: OPENWEATHER_URL.to_string(),
            api_key: api_key.into(),
        })
    }

    /// Point the client at another host (a proxy, a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl WeatherFetcher for OpenWeatherClient {
    async fn fetch(&self, coords: Coordinates) -> Result<Weather, FetchError> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        let lat = coords.lat.to_string();
        let lon = coords.lon.to_string();

        tracing::debug!(lat = coords.lat, lon = coords.lon, "Fetching weather");
        let response = self
            .http
            .get(&url)
            .query(&[
                ("APPID", self.api_key.as_str()),
                ("units", "metric"),
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
            ])
            .send()
            .await
            .map_err(FetchError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body: WeatherResponse = response.json().await.map_err(FetchError::Decode)?;
        Weather::try_from(body)
    }
}

// ============================================================================
// Geocoding
// ============================================================================

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("city not found: {0}")]
    NotFound(String),
}

impl GeocodeError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, GeocodeError::Request(e) if e.is_timeout())
    }
}

/// A geocoded place.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    /// Display name with country context, e.g. `Nizbor, Czechia`
    pub name: String,
    pub coords: Coordinates,
}

/// City name to coordinates via the Open-Meteo geocoding API.
#[derive(Debug, Clone)]
pub struct Geocoder {
    http: reqwest::Client,
    base_url: String,
}

impl Geocoder {
    pub fn new() -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: GEOCODING_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub async fn lookup(&self, city: &str) -> Result<Place, GeocodeError> {
        let url = format!("{}/v1/search", self.base_url);
        let data: GeocodingResponse = self
            .http
            .get(&url)
            .query(&[("name", city), ("count", "1"), ("language", "en")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        data.results
            .and_then(|results| results.into_iter().next())
            .map(|r| {
                let name = match &r.country {
                    Some(country) => format!("{}, {}", r.name, country),
                    None => r.name,
                };
                Place {
                    name,
                    coords: Coordinates::new(r.latitude, r.longitude),
                }
            })
            .ok_or_else(|| GeocodeError::NotFound(city.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_sample_response() {
        let body = r#"{
            "coord": {"lon": 14, "lat": 50},
            "weather": [{"id": 804, "main": "Clouds", "description": "overcast clouds", "icon": "04d"}],
            "main": {"temp": 3.72, "pressure": 1012, "humidity": 81},
            "name": "Nizbor",
            "cod": 200
        }"#;
        let response: WeatherResponse = serde_json::from_str(body).unwrap();
        let weather = Weather::try_from(response).unwrap();
        assert_eq!(
            weather,
            Weather {
                description: "Clouds".into(),
                icon_code: "04d".into(),
                temperature: 3.72,
                location: "Nizbor".into(),
            }
        );
    }

    #[test]
    fn test_empty_conditions_is_an_error() {
        let body = r#"{"weather": [], "main": {"temp": 1.0}, "name": "Nowhere"}"#;
        let response: WeatherResponse = serde_json::from_str(body).unwrap();
        assert!(matches!(
            Weather::try_from(response),
            Err(FetchError::EmptyConditions)
        ));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = OpenWeatherClient::new("key")
            .unwrap()
            .with_base_url("http://localhost:9000/");
        assert_eq!(client.base_url, "http://localhost:9000");
    }
}
