use std::sync::Arc;

use crate::{
    catalog::Catalog, config::Config, notify::ToastQueue, router::Navigator,
    session::SessionStore,
};

/// Everything a controller or command needs, passed explicitly.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub sessions: SessionStore,
    pub navigator: Arc<Navigator>,
    pub toasts: Arc<ToastQueue>,
    pub config: Config,
}

impl AppState {
    pub fn new(catalog: Catalog, sessions: SessionStore, config: Config) -> Self {
        Self {
            catalog,
            sessions,
            navigator: Arc::new(Navigator::new()),
            toasts: Arc::new(ToastQueue::new()),
            config,
        }
    }
}
