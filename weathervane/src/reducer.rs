//! Reducer - (state, action) -> (changed, effects)
//!
//! `changed` is true exactly when the displayed `UiState` changed, so the
//! machine publishes on every change and never publishes a repeat.

use tracing::debug;
use weathervane_core::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{Feedback, LocationState, ScreenState, UiState};

pub fn reducer(state: &mut ScreenState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::LocationDidChange(location) => {
            // Placeholder first, then the fetch it triggers.
            let placeholder = match &location {
                LocationState::Failed(_) => UiState::Error,
                LocationState::Loading | LocationState::Located(_) => UiState::Loading,
            };
            let changed = state.show(placeholder);

            match location {
                LocationState::Located(coords) => {
                    state.generation += 1;
                    DispatchResult::changed_if(changed).with(Effect::FetchWeather {
                        coords,
                        generation: state.generation,
                    })
                }
                LocationState::Loading | LocationState::Failed(_) => {
                    DispatchResult::changed_if(changed)
                }
            }
        }

        Action::WeatherDidLoad { generation, weather } => {
            if state.is_superseded(generation) {
                debug!(generation, latest = state.generation, "Dropping superseded weather");
                return DispatchResult::unchanged();
            }
            state.feedback = Feedback::NotGiven;
            let ui = UiState::loaded(&weather, state.feedback, &state.locale);
            state.weather = Some(weather);
            DispatchResult::changed_if(state.show(ui))
        }

        Action::WeatherDidError { generation, .. } => {
            if state.is_superseded(generation) {
                debug!(generation, latest = state.generation, "Dropping superseded error");
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_if(state.show(UiState::Error))
        }

        Action::FeedbackLike => feedback(state, true),
        Action::FeedbackDislike => feedback(state, false),

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Combine a tap with the latest weather record; no record, no effect.
fn feedback(state: &mut ScreenState, liked: bool) -> DispatchResult<Effect> {
    let Some(weather) = state.weather.clone() else {
        debug!(liked, "Feedback before any weather, ignored");
        return DispatchResult::unchanged();
    };

    state.feedback = if liked {
        Feedback::Liked
    } else {
        Feedback::Disliked
    };
    let ui = UiState::loaded(&weather, state.feedback, &state.locale);
    DispatchResult::changed_if(state.show(ui)).with(Effect::RecordFeedback { weather, liked })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::LocationError;
    use crate::state::{Coordinates, SupersededFetches, Weather};

    fn weather(location: &str, temperature: f64) -> Weather {
        Weather {
            description: "Clouds".into(),
            icon_code: "04d".into(),
            temperature,
            location: location.into(),
        }
    }

    fn located(lat: f64, lon: f64) -> Action {
        Action::LocationDidChange(LocationState::Located(Coordinates::new(lat, lon)))
    }

    #[test]
    fn test_initial_loading_is_not_a_change() {
        let mut state = ScreenState::default();
        let result = reducer(&mut state, Action::LocationDidChange(LocationState::Loading));
        assert!(!result.changed);
        assert!(!result.has_effects());
    }

    #[test]
    fn test_located_projects_loading_and_fetches() {
        let mut state = ScreenState::default();
        let result = reducer(&mut state, located(1.0, 1.0));

        assert!(!result.changed);
        assert_eq!(
            result.effects,
            vec![Effect::FetchWeather {
                coords: Coordinates::new(1.0, 1.0),
                generation: 1,
            }]
        );
    }

    #[test]
    fn test_repeated_location_fetches_again() {
        let mut state = ScreenState::default();
        reducer(&mut state, located(1.0, 1.0));
        let result = reducer(&mut state, located(1.0, 1.0));
        assert_eq!(
            result.effects,
            vec![Effect::FetchWeather {
                coords: Coordinates::new(1.0, 1.0),
                generation: 2,
            }]
        );
    }

    #[test]
    fn test_failed_location_shows_error_without_fetch() {
        let mut state = ScreenState::default();
        let result = reducer(
            &mut state,
            Action::LocationDidChange(LocationState::Failed(LocationError::PermissionDenied)),
        );
        assert!(result.changed);
        assert!(!result.has_effects());
        assert_eq!(state.ui, UiState::Error);
        assert_eq!(state.generation, 0);
    }

    #[test]
    fn test_weather_loads_with_no_feedback() {
        let mut state = ScreenState::default();
        reducer(&mut state, located(1.0, 1.0));
        let result = reducer(
            &mut state,
            Action::WeatherDidLoad {
                generation: 1,
                weather: weather("Nizbor", 3.72),
            },
        );

        assert!(result.changed);
        assert!(matches!(
            &state.ui,
            UiState::Loaded { temperature, feedback: Feedback::NotGiven, .. } if temperature == "3.7°C"
        ));
    }

    #[test]
    fn test_feedback_before_weather_does_nothing() {
        let mut state = ScreenState::default();
        for action in [Action::FeedbackLike, Action::FeedbackDislike] {
            let result = reducer(&mut state, action);
            assert!(!result.changed);
            assert!(!result.has_effects());
        }
        assert_eq!(state.feedback, Feedback::NotGiven);
    }

    #[test]
    fn test_like_then_dislike_both_reach_sink() {
        let mut state = ScreenState::default();
        let w = weather("Nizbor", 3.72);
        reducer(
            &mut state,
            Action::WeatherDidLoad {
                generation: 0,
                weather: w.clone(),
            },
        );

        let like = reducer(&mut state, Action::FeedbackLike);
        assert!(like.changed);
        assert_eq!(
            like.effects,
            vec![Effect::RecordFeedback {
                weather: w.clone(),
                liked: true,
            }]
        );

        let again = reducer(&mut state, Action::FeedbackLike);
        assert!(!again.changed, "same UI state is not republished");
        assert_eq!(again.effects.len(), 1, "every tap reaches the sink");

        let dislike = reducer(&mut state, Action::FeedbackDislike);
        assert!(dislike.changed);
        assert_eq!(state.feedback, Feedback::Disliked);
        assert_eq!(
            dislike.effects,
            vec![Effect::RecordFeedback {
                weather: w,
                liked: false,
            }]
        );
    }

    #[test]
    fn test_feedback_uses_weather_not_ui_state() {
        let mut state = ScreenState::default();
        let w = weather("Nizbor", 3.72);
        reducer(
            &mut state,
            Action::WeatherDidLoad {
                generation: 0,
                weather: w.clone(),
            },
        );
        // A new location puts the screen back into Loading
        reducer(&mut state, located(2.0, 2.0));
        assert_eq!(state.ui, UiState::Loading);

        let result = reducer(&mut state, Action::FeedbackLike);
        assert_eq!(
            result.effects,
            vec![Effect::RecordFeedback {
                weather: w,
                liked: true,
            }]
        );
        assert!(matches!(state.ui, UiState::Loaded { feedback: Feedback::Liked, .. }));
    }

    #[test]
    fn test_new_weather_resets_feedback() {
        let mut state = ScreenState::default();
        reducer(
            &mut state,
            Action::WeatherDidLoad {
                generation: 0,
                weather: weather("Nizbor", 3.72),
            },
        );
        reducer(&mut state, Action::FeedbackLike);
        reducer(
            &mut state,
            Action::WeatherDidLoad {
                generation: 0,
                weather: weather("Beroun", 5.0),
            },
        );
        assert_eq!(state.feedback, Feedback::NotGiven);
        assert!(matches!(
            &state.ui,
            UiState::Loaded { location, feedback: Feedback::NotGiven, .. } if location == "Beroun"
        ));
    }

    #[test]
    fn test_error_keeps_latest_weather() {
        let mut state = ScreenState::default();
        let w = weather("Nizbor", 3.72);
        reducer(
            &mut state,
            Action::WeatherDidLoad {
                generation: 0,
                weather: w.clone(),
            },
        );
        let result = reducer(
            &mut state,
            Action::WeatherDidError {
                generation: 0,
                error: "timeout".into(),
            },
        );
        assert!(result.changed);
        assert_eq!(state.ui, UiState::Error);
        assert_eq!(state.weather, Some(w));
    }

    #[test]
    fn test_stale_result_merges_by_default() {
        let mut state = ScreenState::default();
        reducer(&mut state, located(1.0, 1.0));
        reducer(&mut state, located(2.0, 2.0));
        reducer(
            &mut state,
            Action::WeatherDidLoad {
                generation: 2,
                weather: weather("New", 1.0),
            },
        );
        let result = reducer(
            &mut state,
            Action::WeatherDidLoad {
                generation: 1,
                weather: weather("Old", 1.0),
            },
        );
        assert!(result.changed);
        assert!(matches!(&state.ui, UiState::Loaded { location, .. } if location == "Old"));
    }

    #[test]
    fn test_stale_result_dropped_under_discard() {
        let mut state = ScreenState::new(Default::default(), SupersededFetches::Discard);
        reducer(&mut state, located(1.0, 1.0));
        reducer(&mut state, located(2.0, 2.0));
        reducer(
            &mut state,
            Action::WeatherDidLoad {
                generation: 2,
                weather: weather("New", 1.0),
            },
        );

        let stale = reducer(
            &mut state,
            Action::WeatherDidLoad {
                generation: 1,
                weather: weather("Old", 1.0),
            },
        );
        assert!(!stale.changed);
        let stale_error = reducer(
            &mut state,
            Action::WeatherDidError {
                generation: 1,
                error: "late".into(),
            },
        );
        assert!(!stale_error.changed);
        assert!(matches!(&state.ui, UiState::Loaded { location, .. } if location == "New"));
    }

    #[test]
    fn test_quit_is_ignored() {
        let mut state = ScreenState::default();
        let result = reducer(&mut state, Action::Quit);
        assert!(!result.changed);
        assert!(!result.has_effects());
    }
}
