use crate::actions::Action;
use crate::dispatcher::Dispatcher;
use crate::middleware::Middleware;
use crate::state::AppState;

/// Writes every action to the log file together with the stage it met
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Middleware for LoggingMiddleware {
    fn handle(&mut self, action: &Action, state: &AppState, _dispatcher: &Dispatcher) -> bool {
        let build = &state.build;
        match action {
            // Already written to the log by whoever recorded it
            Action::Activity(_) => log::trace!("[{}#{}] {:?}", build.stage, build.attempt, action),
            _ => log::debug!("[{}#{}] {:?}", build.stage, build.attempt, action),
        }
        true
    }
}
