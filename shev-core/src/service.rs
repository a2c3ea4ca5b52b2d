//! Request-level operations shared by all handlers.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::display::EventDisplay;
use crate::error::{ShevError, ShevResult};
use crate::event::{Event, NewEventForm};
use crate::geo::{self, Geocoder, TimezoneLookup};
use crate::store::EventStore;
use crate::{ics, id, normalize};

/// Everything a request needs, built once at startup.
#[derive(Clone)]
pub struct EventService {
    geocoder: Arc<dyn Geocoder>,
    timezones: Arc<dyn TimezoneLookup>,
    store: Arc<dyn EventStore>,
    public_url: String,
}

/// An event plus what the view page shows for it.
#[derive(Debug, Clone, Serialize)]
pub struct EventView {
    pub event: Event,
    /// `None` when the stored dates are invalid
    pub display: Option<EventDisplay>,
    pub share_url: String,
    pub calendar_url: String,
}

impl EventService {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        timezones: Arc<dyn TimezoneLookup>,
        store: Arc<dyn EventStore>,
        public_url: impl Into<String>,
    ) -> Self {
        EventService {
            geocoder,
            timezones,
            store,
            public_url: public_url.into(),
        }
    }

    /// Resolve the timezone, normalize and persist a submitted event.
    ///
    /// The insert is the last step, so a failure never leaves a partial record.
    pub async fn create(&self, form: NewEventForm) -> ShevResult<Event> {
        let id = id::generate_id();
        let reference = normalize::reference_instant(&form.start_date);

        let zone = geo::resolve_timezone(
            self.geocoder.as_ref(),
            self.timezones.as_ref(),
            form.location(),
            reference,
        )
        .await;

        let event = normalize::normalize_event(id, form, &zone, Utc::now());
        self.store.insert_one(&event).await?;

        tracing::info!(
            id = %event.id,
            timezone = %event.timezone,
            resolved = zone.is_resolved(),
            "Created event"
        );
        Ok(event)
    }

    pub async fn get(&self, id: &str) -> ShevResult<Event> {
        self.store
            .find_one(id)
            .await?
            .ok_or_else(|| ShevError::EventNotFound(id.to_string()))
    }

    /// The event's ICS document. Reads never modify the record, so this is
    /// stable across calls.
    pub async fn calendar(&self, id: &str) -> ShevResult<String> {
        let event = self.get(id).await?;
        ics::generate_ics(&event, &self.public_url)
    }

    pub async fn view(&self, id: &str) -> ShevResult<EventView> {
        let event = self.get(id).await?;

        let display = match EventDisplay::for_event(&event) {
            Ok(display) => Some(display),
            Err(err) => {
                tracing::warn!(id, error = %err, "Cannot format event dates");
                None
            }
        };

        Ok(EventView {
            share_url: event.view_url(&self.public_url),
            calendar_url: event.calendar_url(&self.public_url),
            display,
            event,
        })
    }
}
