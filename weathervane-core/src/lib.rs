//! Core plumbing for weathervane
//!
//! A small Redux/Elm-style toolkit for screens whose state is driven by
//! several asynchronous sources at once.
//!
//! # Core Concepts
//!
//! - **Action**: something that happened (a signal changed, a job finished, a tap)
//! - **EffectStoreWithMiddleware**: state plus a pure reducer that returns effects to run
//! - **EffectRuntime**: the single consumer that drains one action queue
//! - **TaskManager / Subscriptions**: feed async results and streams into that queue
//! - **Hub**: multicast a value to many subscribers without recomputing it
//! - **Component**: pure UI elements rendered from props
//!
//! # Async Handler Pattern
//!
//! Intent actions trigger async work through an effect; result actions carry
//! the outcome back. The `Did*` naming convention identifies result actions.
//!
//! ```ignore
//! fn reducer(state: &mut State, action: Action) -> DispatchResult<Effect> {
//!     match action {
//!         Action::WeatherFetch { coords } => {
//!             DispatchResult::unchanged().with(Effect::Fetch { coords })
//!         }
//!         Action::WeatherDidLoad(weather) => {
//!             state.weather = Some(weather);
//!             DispatchResult::changed_if(true)
//!         }
//!     }
//! }
//!
//! let store = EffectStoreWithMiddleware::new(State::default(), reducer, LoggingMiddleware::new());
//! let mut runtime = EffectRuntime::new(store);
//! runtime
//!     .run(
//!         |effect, ctx| match effect {
//!             Effect::Fetch { coords } => {
//!                 ctx.tasks().spawn("weather", async move {
//!                     Action::WeatherDidLoad(api::fetch(coords).await)
//!                 });
//!             }
//!         },
//!         |state| hub.publish(state.view()),
//!     )
//!     .await;
//! ```

pub mod action;
pub mod component;
pub mod effect;
pub mod event;
pub mod hub;
#[cfg(all(feature = "tasks", feature = "subscriptions"))]
pub mod runtime;
pub mod store;
#[cfg(feature = "subscriptions")]
pub mod subscriptions;
#[cfg(feature = "tasks")]
pub mod tasks;
pub mod testing;

pub use action::{Action, ActionSummary};
pub use component::Component;
pub use effect::{DispatchResult, EffectReducer, EffectStoreWithMiddleware};
pub use event::{process_raw_event, spawn_event_poller, EventKind, PollerConfig, RawEvent};
pub use hub::{Hub, HubStream};
pub use store::{LoggingMiddleware, Middleware};

#[cfg(all(feature = "tasks", feature = "subscriptions"))]
pub use runtime::{EffectContext, EffectRuntime};

#[cfg(feature = "tasks")]
pub use tasks::{TaskKey, TaskManager};

#[cfg(feature = "subscriptions")]
pub use subscriptions::{SubKey, Subscriptions};

pub use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    Frame,
};

pub use testing::{key, key_event, RenderHarness, TestHarness};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, ActionSummary};
    pub use crate::component::Component;
    pub use crate::effect::{DispatchResult, EffectReducer, EffectStoreWithMiddleware};
    pub use crate::event::{process_raw_event, spawn_event_poller, EventKind, PollerConfig, RawEvent};
    pub use crate::hub::{Hub, HubStream};
    #[cfg(all(feature = "tasks", feature = "subscriptions"))]
    pub use crate::runtime::{EffectContext, EffectRuntime};
    pub use crate::store::{LoggingMiddleware, Middleware};
    #[cfg(feature = "subscriptions")]
    pub use crate::subscriptions::{SubKey, Subscriptions};
    #[cfg(feature = "tasks")]
    pub use crate::tasks::{TaskKey, TaskManager};

    pub use ratatui::{
        layout::Rect,
        style::{Color, Modifier, Style},
        text::{Line, Span, Text},
        Frame,
    };
}
