//! Middleware hooks around store dispatch

use crate::action::{Action, ActionSummary};

/// Middleware trait for intercepting actions
///
/// Implement this trait to add logging, auditing, or other
/// cross-cutting concerns to a store.
pub trait Middleware<A: Action> {
    /// Called before the action is dispatched to the reducer
    fn before(&mut self, action: &A);

    /// Called after the action is processed by the reducer
    fn after(&mut self, action: &A, state_changed: bool);
}

/// Middleware that traces every action through `tracing`
///
/// The action is logged at trace level before the reducer runs and at debug
/// level afterwards, together with whether the state changed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl<A: ActionSummary> Middleware<A> for LoggingMiddleware {
    fn before(&mut self, action: &A) {
        tracing::trace!(action = %action.name(), summary = %action.summary(), "Dispatching action");
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        tracing::debug!(
            action = %action.name(),
            summary = %action.summary(),
            state_changed = state_changed,
            "Action processed"
        );
    }
}
