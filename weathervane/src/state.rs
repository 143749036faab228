//! Screen state - single source of truth
//!
//! `ScreenState` is owned by the machine's consumer task. Only the reducer
//! mutates it; the outside world sees nothing but the `UiState` values the
//! machine publishes.

use serde::{Deserialize, Serialize};

use crate::format::{format_temperature, weather_emoji, Locale};
use crate::location::LocationError;

/// A point on the globe, in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Location signal. Every emission fully replaces the previous one.
#[derive(Clone, Debug, PartialEq)]
pub enum LocationState {
    Loading,
    Located(Coordinates),
    Failed(LocationError),
}

/// One successful weather fetch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub description: String,
    pub icon_code: String,
    /// Degrees Celsius
    pub temperature: f64,
    pub location: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Feedback {
    #[default]
    NotGiven,
    Liked,
    Disliked,
}

/// What the screen should display.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum UiState {
    #[default]
    Loading,
    Loaded {
        description: String,
        temperature: String,
        icon: String,
        location: String,
        feedback: Feedback,
    },
    Error,
}

impl UiState {
    /// Project a weather record with the feedback active right now.
    pub fn loaded(weather: &Weather, feedback: Feedback, locale: &Locale) -> Self {
        UiState::Loaded {
            description: weather.description.clone(),
            temperature: format_temperature(weather.temperature, locale),
            icon: weather_emoji(&weather.icon_code).to_string(),
            location: weather.location.clone(),
            feedback,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }
}

/// What to do with a fetch whose location has since been replaced.
///
/// Under `Merge` a slow fetch for an old location can still land after
/// the fetch for the newer one and overwrite the display with stale data.
/// `Discard` cancels the old fetch and ignores any result it already queued.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SupersededFetches {
    #[default]
    Merge,
    Discard,
}

/// Everything the reducer needs.
#[derive(Clone, Debug)]
pub struct ScreenState {
    /// Last state shown. Starts as the synthetic `Loading` placeholder.
    pub ui: UiState,

    /// Most recently produced weather record, if any.
    pub weather: Option<Weather>,

    /// Feedback given for `weather`.
    pub feedback: Feedback,

    pub locale: Locale,

    pub superseded: SupersededFetches,

    /// Bumped for every `Located` emission; tags fetches.
    pub generation: u64,
}

impl ScreenState {
    pub fn new(locale: Locale, superseded: SupersededFetches) -> Self {
        Self {
            ui: UiState::Loading,
            weather: None,
            feedback: Feedback::NotGiven,
            locale,
            superseded,
            generation: 0,
        }
    }

    /// Replace the displayed state. Returns false if it was already shown.
    pub fn show(&mut self, next: UiState) -> bool {
        if self.ui == next {
            return false;
        }
        self.ui = next;
        true
    }

    /// Whether a result for `generation` must be dropped.
    pub fn is_superseded(&self, generation: u64) -> bool {
        self.superseded == SupersededFetches::Discard && generation < self.generation
    }
}

impl Default for ScreenState {
    fn default() -> Self {
        Self::new(Locale::default(), SupersededFetches::default())
    }
}
