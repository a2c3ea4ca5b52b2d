use std::sync::Arc;

use anyhow::Result;
use shev_core::store::{EventStore, FsStore, MemoryStore};
use shev_core::{EventService, ShevConfig, geo};

use crate::templates::Templates;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: EventService,
    pub templates: Arc<Templates>,
}

impl AppState {
    pub fn new(service: EventService, templates: Templates) -> Self {
        AppState {
            service,
            templates: Arc::new(templates),
        }
    }

    /// Build providers, open the store and load templates. The store handle
    /// is acquired here once and shared by every request.
    pub async fn from_config(config: &ShevConfig, in_memory: bool) -> Result<Self> {
        let (geocoder, timezones) = geo::providers(config);

        let store: Arc<dyn EventStore> = if in_memory {
            tracing::warn!("Using in-memory event store, events will not survive a restart");
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(FsStore::open(&config.data_path()).await?)
        };

        let service = EventService::new(geocoder, timezones, store, config.public_url());

        Ok(AppState::new(service, Templates::load()?))
    }
}
