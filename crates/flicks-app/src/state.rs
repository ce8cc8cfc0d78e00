use std::sync::Arc;

use flicks_dal::SharedMovies;

#[derive(Clone)]
pub struct AppState {
    state: Arc<AppStateInner>,
}

impl AppState {
    pub fn new(app_config: AppConfig, store: SharedMovies) -> Self {
        AppState {
            state: Arc::new(AppStateInner { app_config, store }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.state.app_config
    }

    pub fn store(&self) -> &SharedMovies {
        &self.state.store
    }
}

struct AppStateInner {
    store: SharedMovies,
    app_config: AppConfig,
}

pub struct AppConfig {
    /// Exact origin strings allowed through the CORS gate.
    pub allowed_origins: Vec<String>,
}
