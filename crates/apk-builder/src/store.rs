use crate::actions::Action;
use crate::dispatcher::Dispatcher;
use crate::middleware::Middleware;
use crate::reducers::app_reducer::reduce;
use crate::state::AppState;
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// Owns the state and the middleware chain
///
/// Only the task holding the store mutates state. Spawned work queues
/// actions through the [`Dispatcher`]; they are applied in arrival order
/// by [`Store::next_action`] and [`Store::run_until`].
pub struct Store {
    state: AppState,
    middleware: Vec<Box<dyn Middleware>>,
    dispatcher: Dispatcher,
    queue: UnboundedReceiver<Action>,
}

impl Store {
    pub fn new(initial_state: AppState) -> Self {
        let (sender, queue) = mpsc::unbounded_channel();
        Self {
            state: initial_state,
            middleware: Vec::new(),
            dispatcher: Dispatcher::new(sender),
            queue,
        }
    }

    /// Middleware runs in the order it was added
    pub fn add_middleware(&mut self, middleware: Box<dyn Middleware>) {
        self.middleware.push(middleware);
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Apply one action now
    pub fn dispatch(&mut self, action: Action) {
        let state = &self.state;
        let dispatcher = &self.dispatcher;
        let passed = self
            .middleware
            .iter_mut()
            .all(|middleware| middleware.handle(&action, state, dispatcher));

        if passed {
            self.state = reduce(self.state.clone(), &action);
        }
    }

    /// Next queued action; `None` once every sender is gone
    pub async fn next_action(&mut self) -> Option<Action> {
        self.queue.recv().await
    }

    pub async fn run_until(&mut self, done: impl Fn(&AppState) -> bool) {
        while !done(&self.state) {
            let Some(action) = self.next_action().await else {
                break;
            };
            self.dispatch(action);
        }
    }
}
