use crate::actions::Action;
use crate::dispatcher::Dispatcher;
use crate::state::AppState;

pub mod build_middleware;
pub mod logging;
pub mod notification_middleware;
pub mod poller_middleware;
pub mod repository_middleware;

/// Sees every action before the reducer does
///
/// Handlers run on the store's task and must return quickly; GitHub and
/// Telegram calls are spawned and report back through `dispatcher`.
/// Returning `false` consumes the action so neither later middleware nor
/// the reducer see it.
pub trait Middleware: Send {
    fn handle(&mut self, action: &Action, state: &AppState, dispatcher: &Dispatcher) -> bool;
}
