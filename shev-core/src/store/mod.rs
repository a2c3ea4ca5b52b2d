//! Event persistence.
//!
//! The store is the only owner of persisted events. Handlers get it through
//! [`crate::EventService`]; nothing else keeps authoritative state.

mod fs;
mod memory;

use async_trait::async_trait;

use crate::error::ShevResult;
use crate::event::Event;

pub use fs::FsStore;
pub use memory::MemoryStore;

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist a new event. Fails with `DuplicateId` instead of overwriting.
    async fn insert_one(&self, event: &Event) -> ShevResult<()>;

    /// Fetch an event by id, `None` when there is no such event.
    async fn find_one(&self, id: &str) -> ShevResult<Option<Event>>;
}

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{TimeZone, Utc};

    use crate::alarm::Alarm;
    use crate::event::Event;

    pub fn sample_event(id: &str) -> Event {
        let start = Utc.with_ymd_and_hms(2023, 6, 1, 8, 0, 0).unwrap();
        Event {
            id: id.to_string(),
            name: "Standup".to_string(),
            location: Some("Lisbon".to_string()),
            start_date: Some(start.fixed_offset()),
            end_date: Some((start + chrono::Duration::minutes(15)).fixed_offset()),
            user_date: "06/01/2023 9:00 AM".to_string(),
            notes: None,
            timezone: "Europe/Lisbon".to_string(),
            alarm: Alarm::Multiple(vec![5, 0]),
            created_at: Utc.with_ymd_and_hms(2023, 5, 1, 0, 0, 0).unwrap(),
        }
    }
}
