//! Reminder specification for an event.
//!
//! The creation form posts zero or more `alarm` values. Each is a number of
//! minutes before the start, or the `none` sentinel. They are decoded once,
//! here, into a tagged [`Alarm`] so nothing downstream sees the sentinel.

use serde::{Deserialize, Serialize};

/// Form value meaning "no reminder".
pub const NO_ALARM: &str = "none";

/// Smallest trigger emitted for a reminder. A zero-minute reminder would fire
/// exactly at start, which calendar clients treat inconsistently.
pub const MIN_TRIGGER_MINUTES: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "minutes", rename_all = "snake_case")]
pub enum Alarm {
    #[default]
    None,
    Single(u32),
    Multiple(Vec<u32>),
}

impl Alarm {
    /// Decode the raw `alarm` form values.
    ///
    /// One value gives `Single` (or `None` for the sentinel); several give
    /// `Multiple` with sentinel entries dropped and order kept.
    pub fn from_form_values<S: AsRef<str>>(values: &[S]) -> Self {
        let mut minutes = values.iter().filter_map(|v| parse_minutes(v.as_ref()));

        match values.len() {
            0 => Alarm::None,
            1 => minutes.next().map_or(Alarm::None, Alarm::Single),
            _ => {
                let list: Vec<u32> = minutes.collect();
                if list.is_empty() {
                    Alarm::None
                } else {
                    Alarm::Multiple(list)
                }
            }
        }
    }

    /// Minutes before start, as entered.
    pub fn minutes(&self) -> &[u32] {
        match self {
            Alarm::None => &[],
            Alarm::Single(m) => std::slice::from_ref(m),
            Alarm::Multiple(list) => list,
        }
    }

    /// Minutes before start to use for triggers, with zero coerced to
    /// [`MIN_TRIGGER_MINUTES`].
    pub fn trigger_minutes(&self) -> impl Iterator<Item = u32> + '_ {
        self.minutes()
            .iter()
            .map(|m| (*m).max(MIN_TRIGGER_MINUTES))
    }
}

fn parse_minutes(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case(NO_ALARM) {
        return None;
    }

    match raw.parse::<u32>() {
        Ok(minutes) => Some(minutes),
        Err(_) => {
            tracing::warn!(value = raw, "Ignoring unparseable alarm value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_values_is_none() {
        let empty: [&str; 0] = [];
        assert_eq!(Alarm::from_form_values(&empty), Alarm::None);
    }

    #[test]
    fn test_single_sentinel_is_none() {
        assert_eq!(Alarm::from_form_values(&["none"]), Alarm::None);
        assert_eq!(Alarm::from_form_values(&[""]), Alarm::None);
    }

    #[test]
    fn test_single_value() {
        assert_eq!(Alarm::from_form_values(&["15"]), Alarm::Single(15));
    }

    #[test]
    fn test_list_drops_sentinel_and_keeps_order() {
        let alarm = Alarm::from_form_values(&["30", "none", "0"]);
        assert_eq!(alarm, Alarm::Multiple(vec![30, 0]));
        assert_eq!(alarm.trigger_minutes().collect::<Vec<_>>(), vec![30, 1]);
    }

    #[test]
    fn test_list_of_sentinels_is_none() {
        assert_eq!(Alarm::from_form_values(&["none", "none"]), Alarm::None);
    }

    #[test]
    fn test_garbage_is_ignored() {
        assert_eq!(
            Alarm::from_form_values(&["soon", "-5", "10"]),
            Alarm::Multiple(vec![10])
        );
    }

    #[test]
    fn test_zero_is_coerced_for_triggers_only() {
        let alarm = Alarm::Single(0);
        assert_eq!(alarm.minutes(), &[0]);
        assert_eq!(alarm.trigger_minutes().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&Alarm::Multiple(vec![5, 10])).unwrap();
        assert_eq!(json, r#"{"kind":"multiple","minutes":[5,10]}"#);
        let none: Alarm = serde_json::from_str(r#"{"kind":"none"}"#).unwrap();
        assert_eq!(none, Alarm::None);
    }
}
