//! Core types and logic for shev.
//!
//! This crate holds everything between the HTTP surface and the outside world:
//! - `Event` and its tagged `Alarm` representation
//! - timezone resolution through a geocoder and a timezone lookup
//! - date normalization, display formatting and ICS generation
//! - the `EventStore` persistence seam and the `EventService` that ties it together

pub mod alarm;
pub mod config;
pub mod display;
pub mod error;
pub mod event;
pub mod geo;
pub mod ics;
pub mod id;
pub mod normalize;
pub mod service;
pub mod store;

pub use alarm::Alarm;
pub use crate::config::ShevConfig;
pub use display::EventDisplay;
pub use error::{ShevError, ShevResult};
pub use event::{Event, NewEventForm};
pub use service::{EventService, EventView};
