//! Weathervane: a single-screen weather display
//!
//! The interesting part is [`WeatherStateMachine`]. It turns two
//! independently timed signals, location updates and weather fetches, into
//! one ordered sequence of [`UiState`] values, and routes like/dislike taps
//! to a [`FeedbackSink`] against the weather record current at tap time.
//!
//! ```ignore
//! let provider = LocationProvider::new();
//! let machine = WeatherStateMachine::spawn(
//!     OpenWeatherClient::new(api_key)?,
//!     LogFeedbackSink,
//!     provider.current_location(),
//!     MachineConfig::default(),
//! );
//! provider.publish(LocationState::Located(Coordinates::new(49.98, 14.0)));
//!
//! let mut states = machine.state();
//! while let Some(ui) = states.next().await {
//!     // render ui
//! }
//! ```

pub mod action;
pub mod api;
pub mod components;
pub mod config;
pub mod effect;
pub mod feedback;
pub mod format;
pub mod location;
pub mod machine;
pub mod reducer;
pub mod state;

pub use action::Action;
pub use api::{FetchError, Geocoder, OpenWeatherClient, WeatherFetcher};
pub use feedback::{FeedbackSink, JsonlFeedbackSink, LogFeedbackSink};
pub use format::{format_temperature, weather_emoji, Locale};
pub use location::{LocationError, LocationProvider, LocationSource};
pub use machine::{MachineConfig, StateStream, WeatherStateMachine};
pub use state::{Coordinates, Feedback, LocationState, SupersededFetches, UiState, Weather};
