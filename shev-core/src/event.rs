//! The shared event record and the raw creation form.

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::alarm::Alarm;
use crate::normalize::DEFAULT_TZ;

/// A shared event as persisted by the store.
///
/// Events are immutable once inserted: there is no edit or delete path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Opaque short id, the public key in share and calendar links
    pub id: String,
    pub name: String,
    pub location: Option<String>,

    /// Normalized start, `None` when the submitted string did not parse
    pub start_date: Option<DateTime<FixedOffset>>,
    /// Normalized end, `None` when the submitted string did not parse
    pub end_date: Option<DateTime<FixedOffset>>,
    /// Start exactly as the user typed it
    pub user_date: String,

    pub notes: Option<String>,
    /// IANA identifier, or `GMT` when resolution failed
    pub timezone: String,
    pub alarm: Alarm,

    /// Creation instant, emitted as DTSTAMP
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// The event's zone. Unknown identifiers fall back to GMT.
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(DEFAULT_TZ)
    }

    pub fn view_url(&self, public_url: &str) -> String {
        format!("{}/view/{}", public_url.trim_end_matches('/'), self.id)
    }

    pub fn calendar_url(&self, public_url: &str) -> String {
        format!("{}/ev/{}", public_url.trim_end_matches('/'), self.id)
    }
}

/// Fields posted by the creation form, before any normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewEventForm {
    pub name: String,
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub notes: Option<String>,
    pub alarm: Alarm,
}

impl NewEventForm {
    /// Build from urlencoded pairs. `alarm` may repeat; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut form = NewEventForm::default();
        let mut alarms = Vec::new();

        for (key, value) in pairs {
            match key.as_str() {
                "name" => form.name = value,
                "loc" => form.location = non_empty(value),
                "startDate" => form.start_date = value,
                "endDate" => form.end_date = value,
                "notes" => form.notes = non_empty(value),
                "alarm" => alarms.push(value),
                _ => {}
            }
        }

        form.alarm = Alarm::from_form_values(alarms.as_slice());
        form
    }

    /// Location to geocode, if any non-blank text was given.
    pub fn location(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|loc| !loc.is_empty())
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
