//! Application state.

use std::sync::Arc;

use film_service::RatingFacade;
use film_store::FilmStore;

use crate::config::Config;

/// Shared application state.
pub struct AppState<S: FilmStore> {
    /// Server configuration.
    pub config: Config,
    /// Facade over the film catalog and user directory.
    pub facade: RatingFacade<S>,
}

impl<S: FilmStore> AppState<S> {
    /// Creates new application state.
    pub fn new(config: Config, store: S) -> Self {
        Self {
            config,
            facade: RatingFacade::new(Arc::new(store)),
        }
    }
}

/// Type alias for shared state.
pub type SharedState<S> = Arc<AppState<S>>;

/// Creates shared state from config and store.
pub fn create_shared_state<S: FilmStore>(config: Config, store: S) -> SharedState<S> {
    Arc::new(AppState::new(config, store))
}
