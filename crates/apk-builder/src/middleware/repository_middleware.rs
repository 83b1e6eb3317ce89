//! Repository Middleware
//!
//! Loads the repositories a token can see, for the repository listing.

use crate::actions::{Action, RepositoryAction};
use crate::dispatcher::Dispatcher;
use crate::middleware::Middleware;
use crate::services::Services;
use crate::state::AppState;

/// Repository middleware - handles repository loading
pub struct RepositoryMiddleware {
    services: Services,
}

impl RepositoryMiddleware {
    pub fn new(services: Services) -> Self {
        Self { services }
    }
}

impl Middleware for RepositoryMiddleware {
    fn handle(&mut self, action: &Action, _state: &AppState, dispatcher: &Dispatcher) -> bool {
        if let Action::Repository(RepositoryAction::Load { ci_token }) = action {
            log::info!("RepositoryMiddleware: Loading repositories");
            let dispatcher = dispatcher.clone();
            match self.services.github.client(ci_token) {
                Ok(client) => {
                    tokio::spawn(async move {
                        let action = match client.list_repositories().await {
                            Ok(repositories) => {
                                log::info!(
                                    "RepositoryMiddleware: Found {} repositories",
                                    repositories.len()
                                );
                                RepositoryAction::Loaded(repositories)
                            }
                            Err(err) => RepositoryAction::LoadFailed(err.to_string()),
                        };
                        dispatcher.dispatch(Action::Repository(action));
                    });
                }
                Err(err) => {
                    dispatcher.dispatch(Action::Repository(RepositoryAction::LoadFailed(
                        err.to_string(),
                    )));
                }
            }
        }

        true // Let action pass through to reducer
    }
}
