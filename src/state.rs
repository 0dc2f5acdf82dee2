use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config,
    store::{Database, MemoryDocumentStore},
    utils::schema::TemplateRegistry,
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub templates: Arc<TemplateRegistry>,
    pub config: Config,
}

impl AppState {
    pub fn new(db: Database, templates: TemplateRegistry, config: Config) -> Self {
        Self {
            db,
            templates: Arc::new(templates),
            config,
        }
    }

    /// State backed by a fresh `MemoryDocumentStore`.
    pub fn in_memory(config: Config, templates: TemplateRegistry) -> Self {
        let db = Database::new(
            Arc::new(MemoryDocumentStore::default()),
            config.database.name.clone(),
        );
        Self::new(db, templates, config)
    }
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
