//! Human-readable start/end strings for the event page.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::error::{ShevError, ShevResult};
use crate::event::Event;

const DAY_FORMAT: &str = "%-d/%-m/%Y";
const TIME_FORMAT: &str = "%Ih%M %p";

/// Display strings for an event, computed per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDisplay {
    /// Set only when start and end fall on the same day
    pub day: Option<String>,
    pub start_time: String,
    /// Always carries the zone's GMT offset
    pub end_time: String,
}

impl EventDisplay {
    /// Format `event` in its own timezone.
    ///
    /// Fails when either timestamp is missing, i.e. the submitted date didn't parse.
    pub fn for_event(event: &Event) -> ShevResult<Self> {
        let (Some(start), Some(end)) = (event.start_date, event.end_date) else {
            return Err(ShevError::InvalidTimestamp(event.id.clone()));
        };

        let tz = event.tz();
        Ok(Self::format(
            &start.with_timezone(&tz),
            &end.with_timezone(&tz),
        ))
    }

    pub fn format<Z>(start: &DateTime<Z>, end: &DateTime<Z>) -> Self
    where
        Z: TimeZone,
        Z::Offset: Display,
    {
        let offset = format!(" (GMT{})", end.format("%:z"));

        if start.date_naive() == end.date_naive() {
            EventDisplay {
                day: Some(start.format(DAY_FORMAT).to_string()),
                start_time: start.format(TIME_FORMAT).to_string(),
                end_time: format!("{}{}", end.format(TIME_FORMAT), offset),
            }
        } else {
            EventDisplay {
                day: None,
                start_time: format_day_and_time(start),
                end_time: format!("{}{}", format_day_and_time(end), offset),
            }
        }
    }
}

fn format_day_and_time<Z>(dt: &DateTime<Z>) -> String
where
    Z: TimeZone,
    Z::Offset: Display,
{
    format!("{} at {}", dt.format(DAY_FORMAT), dt.format(TIME_FORMAT))
}
