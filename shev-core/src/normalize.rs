//! Turning submitted local date strings into zoned timestamps.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::event::{Event, NewEventForm};
use crate::geo::ResolvedZone;

/// Format of `startDate`/`endDate`, e.g. `06/01/2023 9:30 PM`.
pub const INPUT_FORMAT: &str = "%m/%d/%Y %I:%M %p";

/// Zone used when the location could not be resolved.
pub const DEFAULT_TZ: Tz = Tz::GMT;

/// Appended to the notes of events stored in [`DEFAULT_TZ`].
pub const GMT_WARNING: &str = "WARNING : TIME IS GMT";

/// Parse a submitted date string as a naive wall-clock time.
pub fn parse_local(input: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input.trim(), INPUT_FORMAT).ok()
}

/// Interpret `input` as wall-clock time in `tz`.
///
/// Returns `None` for malformed input. Ambiguous times take the earlier
/// instant; times inside a DST gap are moved forward an hour.
pub fn normalize(input: &str, tz: Tz) -> Option<DateTime<FixedOffset>> {
    let naive = parse_local(input)?;

    let zoned = tz.from_local_datetime(&naive).earliest().or_else(|| {
        tz.from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
    })?;

    Some(zoned.fixed_offset())
}

/// Instant handed to the timezone lookup: the submitted start read as UTC,
/// or now when it doesn't parse.
pub fn reference_instant(input: &str) -> DateTime<Utc> {
    parse_local(input)
        .map(|naive| naive.and_utc())
        .unwrap_or_else(Utc::now)
}

/// Append [`GMT_WARNING`] to optional notes.
pub fn with_gmt_warning(notes: Option<&str>) -> String {
    match notes.map(str::trim_end).filter(|n| !n.is_empty()) {
        Some(notes) => format!("{notes} {GMT_WARNING}"),
        None => GMT_WARNING.to_string(),
    }
}

/// Build the record to persist from a submitted form and its resolved zone.
pub fn normalize_event(
    id: String,
    form: NewEventForm,
    zone: &ResolvedZone,
    created_at: DateTime<Utc>,
) -> Event {
    let tz = zone.tz();

    let notes = match zone {
        ResolvedZone::Resolved(_) => form.notes,
        ResolvedZone::Unresolved => Some(with_gmt_warning(form.notes.as_deref())),
    };

    let start_date = normalize(&form.start_date, tz);
    let end_date = normalize(&form.end_date, tz);
    if start_date.is_none() || end_date.is_none() {
        tracing::warn!(
            id = %id,
            start = %form.start_date,
            end = %form.end_date,
            "Storing event with unparseable date"
        );
    }

    Event {
        id,
        name: form.name,
        location: form.location,
        start_date,
        end_date,
        user_date: form.start_date,
        notes,
        timezone: tz.name().to_string(),
        alarm: form.alarm,
        created_at,
    }
}
