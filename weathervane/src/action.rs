//! Actions
//!
//! Naming convention: `Did` marks the result of async work, so
//! `WeatherDidLoad` and `WeatherDidError` are fetch completions while
//! `LocationDidChange` is a location signal emission.

use weathervane_core::ActionSummary;

use crate::state::{LocationState, Weather};

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// The location source emitted a new value
    LocationDidChange(LocationState),

    /// Fetch for location `generation` succeeded
    WeatherDidLoad { generation: u64, weather: Weather },

    /// Fetch for location `generation` failed
    WeatherDidError { generation: u64, error: String },

    /// Like button tapped
    FeedbackLike,

    /// Dislike button tapped
    FeedbackDislike,

    /// Exit the application; handled by the main loop, not the reducer
    Quit,
}

impl weathervane_core::Action for Action {
    fn name(&self) -> &'static str {
        match self {
            Action::LocationDidChange(_) => "LocationDidChange",
            Action::WeatherDidLoad { .. } => "WeatherDidLoad",
            Action::WeatherDidError { .. } => "WeatherDidError",
            Action::FeedbackLike => "FeedbackLike",
            Action::FeedbackDislike => "FeedbackDislike",
            Action::Quit => "Quit",
        }
    }
}

impl ActionSummary for Action {
    fn summary(&self) -> String {
        match self {
            Action::WeatherDidLoad { generation, weather } => {
                format!(
                    "WeatherDidLoad {{ gen: {}, temp: {:.1}°C, icon: {} }}",
                    generation, weather.temperature, weather.icon_code
                )
            }
            // Truncate long error messages
            Action::WeatherDidError { generation, error } => {
                let msg = if error.chars().count() > 40 {
                    format!("{}...", error.chars().take(37).collect::<String>())
                } else {
                    error.clone()
                };
                format!("WeatherDidError {{ gen: {}, error: {:?} }}", generation, msg)
            }
            _ => format!("{:?}", self),
        }
    }
}
