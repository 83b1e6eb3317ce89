//! Dispatcher for middleware action dispatch
//!
//! Spawned work reports back by dispatching actions. Actions dispatched here
//! are queued on the store's channel and re-enter the middleware chain from
//! the beginning when the store loop picks them up.

use crate::actions::Action;
use tokio::sync::mpsc::UnboundedSender;

/// Dispatcher for sending actions through the middleware chain
#[derive(Clone)]
pub struct Dispatcher {
    action_tx: UnboundedSender<Action>,
}

impl Dispatcher {
    pub fn new(action_tx: UnboundedSender<Action>) -> Self {
        Self { action_tx }
    }

    /// Queue an action for the store loop
    pub fn dispatch(&self, action: Action) {
        if let Err(e) = self.action_tx.send(action) {
            log::error!("Dispatcher: failed to send action: {}", e);
        }
    }
}
