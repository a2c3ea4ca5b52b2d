//! Resolving an event's timezone from its free-text location.
//!
//! Resolution is a two-step chain: a [`Geocoder`] turns the location into
//! coordinates, then a [`TimezoneLookup`] turns the coordinates into an IANA
//! zone. Any failure along the way yields [`ResolvedZone::Unresolved`]; it is
//! logged and never reaches the user.

pub mod google;
pub mod mapbox;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::config::ShevConfig;
use crate::error::{ShevError, ShevResult};
use crate::normalize::DEFAULT_TZ;

pub use google::GoogleTimezone;
pub use mapbox::MapboxGeocoder;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Forward geocoding of a free-text place.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Coordinates of the first match, or `None` when nothing matched.
    async fn geocode(&self, query: &str) -> ShevResult<Option<Coordinates>>;
}

/// Coordinates to IANA timezone identifier.
#[async_trait]
pub trait TimezoneLookup: Send + Sync {
    async fn timezone(&self, at: Coordinates, reference: DateTime<Utc>) -> ShevResult<String>;
}

/// Stand-in used when no provider credentials are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct Disabled;

#[async_trait]
impl Geocoder for Disabled {
    async fn geocode(&self, _query: &str) -> ShevResult<Option<Coordinates>> {
        Ok(None)
    }
}

#[async_trait]
impl TimezoneLookup for Disabled {
    async fn timezone(&self, _at: Coordinates, _reference: DateTime<Utc>) -> ShevResult<String> {
        Err(ShevError::Timezone(
            "no timezone provider configured".to_string(),
        ))
    }
}

/// Build the configured providers. Missing credentials disable a provider,
/// which makes every submission fall back to GMT.
pub fn providers(config: &ShevConfig) -> (Arc<dyn Geocoder>, Arc<dyn TimezoneLookup>) {
    let client = reqwest::Client::new();

    let geocoder: Arc<dyn Geocoder> = match config.mapbox_access_token() {
        Some(token) => Arc::new(
            MapboxGeocoder::new(client.clone(), token).with_base_url(&config.mapbox_base_url),
        ),
        None => {
            tracing::warn!("MAPBOX_ACCESSTOKEN not set, geocoding disabled");
            Arc::new(Disabled)
        }
    };

    let timezones: Arc<dyn TimezoneLookup> = match config.gmap_api_key() {
        Some(key) => Arc::new(GoogleTimezone::new(client, key).with_base_url(&config.gmap_base_url)),
        None => {
            tracing::warn!("GMAP_APIKEY not set, timezone lookup disabled");
            Arc::new(Disabled)
        }
    };

    (geocoder, timezones)
}

/// Outcome of timezone resolution for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedZone {
    Resolved(Tz),
    Unresolved,
}

impl ResolvedZone {
    /// The zone to normalize in, [`DEFAULT_TZ`] when unresolved.
    pub fn tz(&self) -> Tz {
        match self {
            ResolvedZone::Resolved(tz) => *tz,
            ResolvedZone::Unresolved => DEFAULT_TZ,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolvedZone::Resolved(_))
    }
}

/// Geocode `location`, degrading every failure to `None`.
pub async fn locate(geocoder: &dyn Geocoder, location: &str) -> Option<Coordinates> {
    let query = location.trim();
    if query.is_empty() {
        return None;
    }

    match geocoder.geocode(query).await {
        Ok(Some(coordinates)) => Some(coordinates),
        Ok(None) => {
            tracing::info!(location = query, "No geocoding match");
            None
        }
        Err(err) => {
            tracing::warn!(location = query, error = %err, "Geocoding failed");
            None
        }
    }
}

/// Resolve the zone for an optional location.
///
/// Without a location, or when geocoding does not resolve, no timezone call
/// is made. A single failed lookup is final.
pub async fn resolve_timezone(
    geocoder: &dyn Geocoder,
    lookup: &dyn TimezoneLookup,
    location: Option<&str>,
    reference: DateTime<Utc>,
) -> ResolvedZone {
    let Some(location) = location else {
        return ResolvedZone::Unresolved;
    };
    let Some(coordinates) = locate(geocoder, location).await else {
        return ResolvedZone::Unresolved;
    };

    match lookup.timezone(coordinates, reference).await {
        Ok(id) => match id.parse::<Tz>() {
            Ok(tz) => {
                tracing::debug!(location, timezone = %id, "Resolved timezone");
                ResolvedZone::Resolved(tz)
            }
            Err(_) => {
                tracing::warn!(location, timezone = %id, "Unknown timezone identifier");
                ResolvedZone::Unresolved
            }
        },
        Err(err) => {
            tracing::warn!(location, error = %err, "Timezone lookup failed");
            ResolvedZone::Unresolved
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FixedGeocoder, FixedTimezone};
    use super::*;

    #[tokio::test]
    async fn test_no_location_skips_both_calls() {
        let geocoder = FixedGeocoder::found(48.85, 2.35);
        let lookup = FixedTimezone::answering("Europe/Paris");

        let zone = resolve_timezone(&geocoder, &lookup, None, Utc::now()).await;

        assert_eq!(zone, ResolvedZone::Unresolved);
        assert_eq!(geocoder.calls(), 0);
        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_location_skips_geocoding() {
        let geocoder = FixedGeocoder::found(48.85, 2.35);
        let lookup = FixedTimezone::answering("Europe/Paris");

        let zone = resolve_timezone(&geocoder, &lookup, Some("  "), Utc::now()).await;

        assert_eq!(zone, ResolvedZone::Unresolved);
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn test_resolves_through_both_steps() {
        let geocoder = FixedGeocoder::found(48.85, 2.35);
        let lookup = FixedTimezone::answering("Europe/Paris");

        let zone = resolve_timezone(&geocoder, &lookup, Some("Paris"), Utc::now()).await;

        assert_eq!(zone, ResolvedZone::Resolved(Tz::Europe__Paris));
        assert!(zone.is_resolved());
        assert_eq!(lookup.calls(), 1);
    }

    #[tokio::test]
    async fn test_unmatched_location_skips_timezone_call() {
        let geocoder = FixedGeocoder::not_found();
        let lookup = FixedTimezone::answering("Europe/Paris");

        let zone = resolve_timezone(&geocoder, &lookup, Some("Atlantis"), Utc::now()).await;

        assert_eq!(zone, ResolvedZone::Unresolved);
        assert_eq!(geocoder.calls(), 1);
        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test]
    async fn test_geocoder_error_degrades() {
        let geocoder = FixedGeocoder::failing();
        let lookup = FixedTimezone::answering("Europe/Paris");

        let zone = resolve_timezone(&geocoder, &lookup, Some("Paris"), Utc::now()).await;

        assert_eq!(zone, ResolvedZone::Unresolved);
        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test]
    async fn test_lookup_error_is_not_retried() {
        let geocoder = FixedGeocoder::found(48.85, 2.35);
        let lookup = FixedTimezone::failing();

        let zone = resolve_timezone(&geocoder, &lookup, Some("Paris"), Utc::now()).await;

        assert_eq!(zone, ResolvedZone::Unresolved);
        assert_eq!(zone.tz(), DEFAULT_TZ);
        assert_eq!(lookup.calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_identifier_degrades() {
        let geocoder = FixedGeocoder::found(0.0, 0.0);
        let lookup = FixedTimezone::answering("Ocean/Nowhere");

        let zone = resolve_timezone(&geocoder, &lookup, Some("Null Island"), Utc::now()).await;

        assert_eq!(zone, ResolvedZone::Unresolved);
    }

    #[tokio::test]
    async fn test_disabled_providers() {
        let zone = resolve_timezone(&Disabled, &Disabled, Some("Paris"), Utc::now()).await;
        assert_eq!(zone, ResolvedZone::Unresolved);
    }
}
