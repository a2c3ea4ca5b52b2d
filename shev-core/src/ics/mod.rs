//! ICS generation for shared events.

mod generate;

pub use generate::{CALENDAR_NAME, ICS_DOMAIN, generate_ics};
