//! The weather state machine
//!
//! Wires the location signal, the fetcher and the feedback sink into one
//! consumer task:
//!
//! ```text
//! location stream ──┐
//! fetch completions ├─► action queue ─► reducer ─► UiState hub ─► subscribers
//! like / dislike ───┘                      │
//!                                          └─► effects: fetch task, sink call
//! ```
//!
//! Every source feeds the same queue and the consumer reduces one action
//! to completion before the next, so arrival order is output order. A
//! `Located` emission starts exactly one fetch no matter how many
//! subscribers watch the output.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use weathervane_core::{
    EffectContext, EffectRuntime, EffectStoreWithMiddleware, Hub, HubStream, LoggingMiddleware,
    TaskKey,
};

use crate::action::Action;
use crate::api::WeatherFetcher;
use crate::effect::Effect;
use crate::feedback::FeedbackSink;
use crate::format::Locale;
use crate::reducer::reducer;
use crate::state::{LocationState, ScreenState, SupersededFetches, UiState};

/// Live `UiState` emissions of one machine.
pub type StateStream = HubStream<UiState>;

/// Machine settings.
#[derive(Debug, Clone, Default)]
pub struct MachineConfig {
    pub locale: Locale,
    pub superseded: SupersededFetches,
}

/// Running state machine for one weather screen.
///
/// Dropping the machine stops its consumer task; output streams end once
/// the task has wound down.
pub struct WeatherStateMachine {
    output: Hub<UiState>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl WeatherStateMachine {
    /// Start the machine on the current tokio runtime.
    pub fn spawn<F, K, L>(fetcher: F, sink: K, location: L, config: MachineConfig) -> Self
    where
        F: WeatherFetcher,
        K: FeedbackSink,
        L: Stream<Item = LocationState> + Send + 'static,
    {
        let superseded = config.superseded;
        let store = EffectStoreWithMiddleware::new(
            ScreenState::new(config.locale, superseded),
            reducer,
            LoggingMiddleware::new(),
        );
        let mut runtime = EffectRuntime::new(store);
        runtime
            .subscriptions()
            .stream("location", location.map(Action::LocationDidChange));

        let output = Hub::default();
        let publish = output.clone();
        let action_tx = runtime.action_tx();
        let cancel = runtime.cancel_token();
        let fetcher = Arc::new(fetcher);

        let handle = tokio::spawn(async move {
            runtime
                .run(
                    move |effect, ctx| handle_effect(effect, ctx, &fetcher, &sink, superseded),
                    move |state: &ScreenState| {
                        publish.publish(state.ui.clone());
                    },
                )
                .await;
            tracing::debug!("Weather state machine stopped");
        });

        Self {
            output,
            action_tx,
            cancel,
            handle: Some(handle),
        }
    }

    /// UI state emissions.
    ///
    /// Starts with the most recent emission, if there has been one, then
    /// follows live. Consecutive values are never equal and the initial
    /// `Loading` placeholder is never emitted.
    pub fn state(&self) -> StateStream {
        self.output.subscribe()
    }

    /// What the screen shows right now.
    pub fn current(&self) -> UiState {
        self.output.latest().unwrap_or_default()
    }

    pub fn like(&self) {
        let _ = self.action_tx.send(Action::FeedbackLike);
    }

    pub fn dislike(&self) {
        let _ = self.action_tx.send(Action::FeedbackDislike);
    }

    /// Stop the consumer task and wait for it.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for WeatherStateMachine {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn handle_effect<F, K>(
    effect: Effect,
    ctx: &mut EffectContext<'_, Action>,
    fetcher: &Arc<F>,
    sink: &K,
    superseded: SupersededFetches,
) where
    F: WeatherFetcher,
    K: FeedbackSink,
{
    match effect {
        Effect::FetchWeather { coords, generation } => {
            // A shared key replaces (cancels) the previous fetch.
            let key = match superseded {
                SupersededFetches::Merge => TaskKey::sequenced("weather", generation),
                SupersededFetches::Discard => TaskKey::new("weather"),
            };
            let fetcher = Arc::clone(fetcher);
            ctx.tasks().spawn(key, async move {
                match fetcher.fetch(coords).await {
                    Ok(weather) => {
                        info!(generation, location = %weather.location, "Weather loaded");
                        Action::WeatherDidLoad { generation, weather }
                    }
                    Err(err) => {
                        warn!(generation, error = %err, "Weather fetch failed");
                        Action::WeatherDidError {
                            generation,
                            error: err.to_string(),
                        }
                    }
                }
            });
        }
        Effect::RecordFeedback { weather, liked } => {
            sink.record(&weather, liked);
        }
    }
}
