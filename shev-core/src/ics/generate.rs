//! ICS file generation.

use crate::error::{ShevError, ShevResult};
use crate::event::Event;
use chrono::{DateTime, Utc};
use icalendar::{Alarm, Calendar, Component, EventLike, Trigger};

/// Host part of generated UIDs
pub const ICS_DOMAIN: &str = "shareevent";

/// X-WR-CALNAME of every generated calendar
pub const CALENDAR_NAME: &str = "Share Event calendar";

/// Generate a single-event calendar for `event`, linking back to its view page
/// under `public_url`.
///
/// Output depends only on the stored record, so repeated downloads of the same
/// event are byte-identical.
pub fn generate_ics(event: &Event, public_url: &str) -> ShevResult<String> {
    let (Some(start), Some(end)) = (event.start_date, event.end_date) else {
        return Err(ShevError::InvalidTimestamp(event.id.clone()));
    };

    let mut cal = Calendar::new();
    cal.name(CALENDAR_NAME);

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&format!("{}@{}", event.id, ICS_DOMAIN));
    ics_event.summary(&event.name);

    // DTSTAMP from the record rather than the clock
    ics_event.add_property("DTSTAMP", format_utc(event.created_at));

    ics_event.add_property("DTSTART", format_utc(start.with_timezone(&Utc)));
    ics_event.add_property("DTEND", format_utc(end.with_timezone(&Utc)));

    if let Some(ref notes) = event.notes {
        ics_event.description(notes);
    }

    if let Some(ref loc) = event.location {
        ics_event.location(loc);
    }

    ics_event.add_property("URL", event.view_url(public_url));

    // Display alarms, in the order they were entered
    let alarm_text = if event.name.trim().is_empty() {
        "Reminder"
    } else {
        event.name.as_str()
    };
    for minutes in event.alarm.trigger_minutes() {
        let trigger = Trigger::before_start(chrono::Duration::minutes(i64::from(minutes)));
        ics_event.alarm(Alarm::display(alarm_text, trigger));
    }

    let ics_event = ics_event.done();
    cal.push(ics_event);
    let cal = cal.done();

    Ok(strip_ics_bloat(&cal.to_string()))
}

fn format_utc(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with SHAREEVENT
/// - Remove CALSCALE:GREGORIAN (it's the default)
/// - Remove DTSTAMP and UID inside VALARM sections (random per call, not required by RFC 5545)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());
    let mut in_valarm = false;

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:SHAREEVENT\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        if line == "BEGIN:VALARM" {
            in_valarm = true;
        } else if line == "END:VALARM" {
            in_valarm = false;
        }

        if in_valarm && (line.starts_with("DTSTAMP:") || line.starts_with("UID:")) {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::Alarm as Reminder;
    use chrono::{FixedOffset, TimeZone};

    const PUBLIC_URL: &str = "http://localhost:8080";

    fn make_test_event() -> Event {
        let paris = FixedOffset::east_opt(2 * 3600).unwrap();
        Event {
            id: "Xk3_9aB-q2Lz".to_string(),
            name: "Picnic".to_string(),
            location: Some("Parc Monceau, Paris".to_string()),
            start_date: Some(paris.with_ymd_and_hms(2023, 6, 1, 10, 0, 0).unwrap()),
            end_date: Some(paris.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap()),
            user_date: "06/01/2023 10:00 AM".to_string(),
            notes: Some("Bring a blanket".to_string()),
            timezone: "Europe/Paris".to_string(),
            alarm: Reminder::None,
            created_at: Utc.with_ymd_and_hms(2023, 5, 20, 8, 30, 0).unwrap(),
        }
    }

    /// Minutes encoded by an ISO 8601 duration such as `-PT30M` or `-PT1800S`.
    fn duration_minutes(value: &str) -> i64 {
        let body = value.trim_start_matches(['-', '+']).trim_start_matches('P');
        let mut seconds = 0;
        let mut number = String::new();
        let mut in_time = false;

        for c in body.chars() {
            match c {
                'T' => in_time = true,
                '0'..='9' => number.push(c),
                unit => {
                    let n: i64 = number.parse().unwrap();
                    number.clear();
                    seconds += match (unit, in_time) {
                        ('W', _) => n * 7 * 86_400,
                        ('D', _) => n * 86_400,
                        ('H', true) => n * 3_600,
                        ('M', true) => n * 60,
                        ('S', true) => n,
                        other => panic!("unexpected duration unit {other:?} in {value}"),
                    };
                }
            }
        }

        seconds / 60
    }

    fn trigger_minutes(ics: &str) -> Vec<i64> {
        ics.lines()
            .filter(|l| l.starts_with("TRIGGER"))
            .map(|l| duration_minutes(l.rsplit(':').next().unwrap()))
            .collect()
    }

    #[test]
    fn test_generate_ics_core_properties() {
        let ics = generate_ics(&make_test_event(), PUBLIC_URL).unwrap();

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"), "ICS:\n{}", ics);
        assert!(ics.trim_end().ends_with("END:VCALENDAR"), "ICS:\n{}", ics);
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 1);
        assert!(ics.contains("PRODID:SHAREEVENT"));
        assert!(!ics.contains("CALSCALE"));
        assert!(ics.contains("X-WR-CALNAME:Share Event calendar"));
        assert!(ics.contains("UID:Xk3_9aB-q2Lz@shareevent"));
        assert!(ics.contains("DTSTAMP:20230520T083000Z"));
        assert!(ics.contains("DTSTART:20230601T080000Z"), "ICS:\n{}", ics);
        assert!(ics.contains("DTEND:20230601T100000Z"), "ICS:\n{}", ics);
        assert!(ics.contains("SUMMARY:Picnic"));
        assert!(ics.contains("DESCRIPTION:Bring a blanket"));
        assert!(ics.contains("URL:http://localhost:8080/view/Xk3_9aB-q2Lz"));
    }

    #[test]
    fn test_generate_ics_uses_crlf() {
        let ics = generate_ics(&make_test_event(), PUBLIC_URL).unwrap();
        let bare_newlines = ics.matches('\n').count() - ics.matches("\r\n").count();
        assert_eq!(bare_newlines, 0);
    }

    #[test]
    fn test_generate_ics_no_alarm() {
        let ics = generate_ics(&make_test_event(), PUBLIC_URL).unwrap();
        assert!(!ics.contains("BEGIN:VALARM"));
    }

    #[test]
    fn test_generate_ics_alarm_list_skips_sentinel_and_coerces_zero() {
        let mut event = make_test_event();
        event.alarm = Reminder::from_form_values(&["30", "none", "0"]);

        let ics = generate_ics(&event, PUBLIC_URL).unwrap();

        assert_eq!(ics.matches("BEGIN:VALARM").count(), 2, "ICS:\n{}", ics);
        assert_eq!(ics.matches("ACTION:DISPLAY").count(), 2);
        assert_eq!(trigger_minutes(&ics), vec![30, 1]);
    }

    #[test]
    fn test_generate_ics_single_alarm() {
        let mut event = make_test_event();
        event.alarm = Reminder::Single(0);

        let ics = generate_ics(&event, PUBLIC_URL).unwrap();

        assert_eq!(trigger_minutes(&ics), vec![1]);
    }

    #[test]
    fn test_generate_ics_alarm_is_minimal() {
        let mut event = make_test_event();
        event.alarm = Reminder::Single(30);

        let ics = generate_ics(&event, PUBLIC_URL).unwrap();

        let valarm_section: String = ics
            .split("BEGIN:VALARM")
            .nth(1)
            .unwrap()
            .split("END:VALARM")
            .next()
            .unwrap()
            .to_string();
        assert!(
            !valarm_section.contains("UID:"),
            "VALARM should not have UID. Got:\n{}",
            valarm_section
        );
        assert!(
            !valarm_section.contains("DTSTAMP:"),
            "VALARM should not have DTSTAMP. Got:\n{}",
            valarm_section
        );
    }

    #[test]
    fn test_generate_ics_is_deterministic() {
        let mut event = make_test_event();
        event.alarm = Reminder::Multiple(vec![10, 60]);

        let first = generate_ics(&event, PUBLIC_URL).unwrap();
        let second = generate_ics(&event, PUBLIC_URL).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_generate_ics_without_optional_fields() {
        let mut event = make_test_event();
        event.location = None;
        event.notes = None;

        let ics = generate_ics(&event, PUBLIC_URL).unwrap();

        assert!(!ics.contains("LOCATION"));
        assert!(!ics.lines().any(|l| l.starts_with("DESCRIPTION")));
    }

    #[test]
    fn test_generate_ics_rejects_invalid_timestamps() {
        let mut event = make_test_event();
        event.end_date = None;

        let err = generate_ics(&event, PUBLIC_URL).unwrap_err();
        assert!(matches!(err, ShevError::InvalidTimestamp(ref id) if id == "Xk3_9aB-q2Lz"));
    }
}
