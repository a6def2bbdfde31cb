use crate::config::Config;
use crate::infrastructure::session::SessionStore;
use crate::infrastructure::storage::StoreBackend;

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub backend: StoreBackend,
}

impl AppState {
    pub fn new(backend: StoreBackend, session_ttl: chrono::Duration) -> Self {
        AppState {
            sessions: SessionStore::new(session_ttl),
            backend,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.user_store, config.session_ttl())
    }
}
