use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::EventStore;
use crate::error::{ShevError, ShevResult};
use crate::event::Event;

/// Process-local store; contents are lost on exit.
#[derive(Default)]
pub struct MemoryStore {
    events: RwLock<HashMap<String, Event>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn insert_one(&self, event: &Event) -> ShevResult<()> {
        let mut events = self.events.write().await;
        match events.entry(event.id.clone()) {
            Entry::Occupied(_) => Err(ShevError::DuplicateId(event.id.clone())),
            Entry::Vacant(slot) => {
                slot.insert(event.clone());
                Ok(())
            }
        }
    }

    async fn find_one(&self, id: &str) -> ShevResult<Option<Event>> {
        Ok(self.events.read().await.get(id).cloned())
    }
}
