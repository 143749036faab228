//! Command line configuration

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::api::{GEOCODING_URL, OPENWEATHER_URL};
use crate::format::Locale;
use crate::location::LocationSource;
use crate::state::{Coordinates, SupersededFetches};

/// Terminal weather screen with like/dislike feedback
#[derive(Parser, Debug, Clone)]
#[command(name = "weathervane", version)]
#[command(about = "Current weather for one place, with like/dislike feedback")]
pub struct Args {
    /// City name to look up (Open-Meteo geocoding)
    #[arg(long, short, conflicts_with_all = ["lat", "lon"])]
    pub city: Option<String>,

    /// Latitude in degrees (requires --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude in degrees (requires --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// OpenWeatherMap API key
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// OpenWeatherMap base URL
    #[arg(long, default_value = OPENWEATHER_URL)]
    pub base_url: String,

    /// Geocoding base URL
    #[arg(long, default_value = GEOCODING_URL)]
    pub geocoding_url: String,

    /// Locale for temperature formatting, e.g. cs or en_US
    #[arg(long, env = "LANG")]
    pub locale: Option<String>,

    /// Re-read the location every N seconds (each re-read refetches)
    #[arg(long, short)]
    pub refresh_interval: Option<u64>,

    /// Drop results of fetches whose location was replaced
    #[arg(long)]
    pub discard_superseded: bool,

    /// Where feedback is appended as JSON lines
    #[arg(long)]
    pub feedback_file: Option<PathBuf>,

    /// Log file (the terminal belongs to the UI)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("no API key: pass --api-key or set OPENWEATHER_API_KEY")]
    MissingApiKey,

    #[error("latitude {0} is outside -90..=90")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside -180..=180")]
    LongitudeOutOfRange(f64),

    #[error("refresh interval must be at least one second")]
    ZeroRefresh,

    #[error("no data directory on this system: pass --feedback-file and --log-file")]
    NoDataDir,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub source: LocationSource,
    pub api_key: String,
    pub base_url: String,
    pub geocoding_url: String,
    pub locale: Locale,
    pub refresh: Option<Duration>,
    pub superseded: SupersededFetches,
    pub feedback_file: PathBuf,
    pub log_file: PathBuf,
}

impl Args {
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let source = match (self.city, self.lat, self.lon) {
            (Some(city), _, _) => LocationSource::City(city),
            (None, Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    return Err(ConfigError::LatitudeOutOfRange(lat));
                }
                if !(-180.0..=180.0).contains(&lon) {
                    return Err(ConfigError::LongitudeOutOfRange(lon));
                }
                LocationSource::Fixed(Coordinates::new(lat, lon))
            }
            _ => LocationSource::Unconfigured,
        };

        let refresh = match self.refresh_interval {
            Some(0) => return Err(ConfigError::ZeroRefresh),
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        let locale = self
            .locale
            .as_deref()
            .map(Locale::parse)
            .unwrap_or_default();

        let data_dir = dirs::data_local_dir().map(|dir| dir.join("weathervane"));
        let feedback_file = match self.feedback_file {
            Some(path) => path,
            None => data_dir
                .as_ref()
                .map(|dir| dir.join("feedback.jsonl"))
                .ok_or(ConfigError::NoDataDir)?,
        };
        let log_file = match self.log_file {
            Some(path) => path,
            None => data_dir
                .map(|dir| dir.join("weathervane.log"))
                .ok_or(ConfigError::NoDataDir)?,
        };

        Ok(Config {
            source,
            api_key,
            base_url: self.base_url,
            geocoding_url: self.geocoding_url,
            locale,
            refresh,
            superseded: if self.discard_superseded {
                SupersededFetches::Discard
            } else {
                SupersededFetches::Merge
            },
            feedback_file,
            log_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        let paths = ["--log-file", "w.log", "--feedback-file", "f.jsonl"];
        let full = std::iter::once("weathervane")
            .chain(argv.iter().copied())
            .chain(paths);
        let mut args = Args::try_parse_from(full).expect("valid arguments");
        // LANG from the environment must not leak into assertions
        if !argv.contains(&"--locale") {
            args.locale = None;
        }
        args
    }

    #[test]
    fn test_city_source() {
        let config = parse(&["--city", "Nizbor", "--api-key", "k"])
            .into_config()
            .unwrap();
        assert_eq!(config.source, LocationSource::City("Nizbor".into()));
        assert_eq!(config.superseded, SupersededFetches::Merge);
        assert_eq!(config.locale, Locale::default());
        assert_eq!(config.feedback_file, PathBuf::from("f.jsonl"));
    }

    #[test]
    fn test_fixed_coordinates_accept_negatives() {
        let config = parse(&[
            "--lat",
            "-33.9",
            "--lon",
            "18.4",
            "--api-key",
            "k",
            "--locale",
            "cs_CZ.UTF-8",
            "--discard-superseded",
            "--refresh-interval",
            "300",
        ])
        .into_config()
        .unwrap();
        assert_eq!(
            config.source,
            LocationSource::Fixed(Coordinates::new(-33.9, 18.4))
        );
        assert_eq!(config.locale.language(), "cs");
        assert_eq!(config.superseded, SupersededFetches::Discard);
        assert_eq!(config.refresh, Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_nothing_configured_is_unconfigured() {
        let config = parse(&["--api-key", "k"]).into_config().unwrap();
        assert_eq!(config.source, LocationSource::Unconfigured);
    }

    #[test]
    fn test_lat_requires_lon() {
        let result = Args::try_parse_from(["weathervane", "--lat", "50", "--api-key", "k"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_city_conflicts_with_coordinates() {
        let result =
            Args::try_parse_from(["weathervane", "--city", "Brno", "--lat", "1", "--lon", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_errors() {
        let mut args = parse(&["--lat", "91", "--lon", "0", "--api-key", "k"]);
        assert_eq!(
            args.clone().into_config().unwrap_err(),
            ConfigError::LatitudeOutOfRange(91.0)
        );

        args.lat = Some(0.0);
        args.lon = Some(-181.0);
        assert_eq!(
            args.clone().into_config().unwrap_err(),
            ConfigError::LongitudeOutOfRange(-181.0)
        );

        args.lon = Some(0.0);
        args.refresh_interval = Some(0);
        assert_eq!(args.clone().into_config().unwrap_err(), ConfigError::ZeroRefresh);

        args.api_key = Some("  ".into());
        assert_eq!(args.into_config().unwrap_err(), ConfigError::MissingApiKey);
    }
}
