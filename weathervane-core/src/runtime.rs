//! Headless effect runtime
//!
//! The runtime is the single consumer of the action queue. Every source
//! (subscriptions, finished tasks, user input sent through
//! [`EffectRuntime::action_tx`]) feeds the same unbounded channel, and the
//! runtime reduces one action at a time to completion before taking the
//! next. Arrival order is the only ordering: nothing is re-sorted.

use std::marker::PhantomData;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::effect::EffectStoreWithMiddleware;
use crate::store::Middleware;
use crate::subscriptions::Subscriptions;
use crate::tasks::TaskManager;
use crate::Action;

/// Context passed to effect handlers.
pub struct EffectContext<'a, A: Action> {
    tasks: &'a mut TaskManager<A>,
}

impl<'a, A: Action> EffectContext<'a, A> {
    pub fn tasks(&mut self) -> &mut TaskManager<A> {
        self.tasks
    }
}

/// Runtime for effect-based stores.
pub struct EffectRuntime<S, A: Action, E, M: Middleware<A>> {
    store: EffectStoreWithMiddleware<S, A, E, M>,
    action_tx: mpsc::UnboundedSender<A>,
    action_rx: mpsc::UnboundedReceiver<A>,
    tasks: TaskManager<A>,
    subscriptions: Subscriptions<A>,
    cancel: CancellationToken,
    _effect: PhantomData<E>,
}

impl<S, A: Action, E, M: Middleware<A>> EffectRuntime<S, A, E, M> {
    pub fn new(store: EffectStoreWithMiddleware<S, A, E, M>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let tasks = TaskManager::new(action_tx.clone());
        let subscriptions = Subscriptions::new(action_tx.clone());

        Self {
            store,
            action_tx,
            action_rx,
            tasks,
            subscriptions,
            cancel: CancellationToken::new(),
            _effect: PhantomData,
        }
    }

    /// Clone the action sender.
    pub fn action_tx(&self) -> mpsc::UnboundedSender<A> {
        self.action_tx.clone()
    }

    /// Token that stops [`run`](Self::run) when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn subscriptions(&mut self) -> &mut Subscriptions<A> {
        &mut self.subscriptions
    }

    /// Drain the action queue until the cancel token fires.
    ///
    /// For each action: reduce, hand every effect to `handle_effect` in
    /// order, then call `on_change` if the reducer reported a change.
    /// Subscriptions and tasks are cancelled on exit.
    pub async fn run<FEffect, FChange>(&mut self, mut handle_effect: FEffect, mut on_change: FChange)
    where
        FEffect: FnMut(E, &mut EffectContext<A>),
        FChange: FnMut(&S),
    {
        loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    tracing::debug!("Runtime cancelled");
                    break;
                }

                Some(action) = self.action_rx.recv() => {
                    let result = self.store.dispatch(action);
                    if result.has_effects() {
                        let mut ctx = EffectContext {
                            tasks: &mut self.tasks,
                        };
                        for effect in result.effects {
                            handle_effect(effect, &mut ctx);
                        }
                    }
                    if result.changed {
                        on_change(self.store.state());
                    }
                }

                else => {
                    break;
                }
            }
        }

        self.subscriptions.cancel_all();
        self.tasks.cancel_all();
    }
}
