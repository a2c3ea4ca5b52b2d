//! Mapbox forward geocoding.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use super::{Coordinates, Geocoder};
use crate::error::{ShevError, ShevResult};

pub const DEFAULT_BASE_URL: &str = "https://api.mapbox.com";

pub struct MapboxGeocoder {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    /// `[longitude, latitude]`
    coordinates: [f64; 2],
}

impl MapboxGeocoder {
    pub fn new(client: reqwest::Client, access_token: impl Into<String>) -> Self {
        MapboxGeocoder {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: access_token.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn places_url(&self, query: &str) -> ShevResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ShevError::Config(format!("Invalid Mapbox base URL: {e}")))?;

        let file = format!("{query}.json");
        url.path_segments_mut()
            .map_err(|()| ShevError::Config("Mapbox base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["geocoding", "v5", "mapbox.places", file.as_str()]);

        Ok(url)
    }
}

#[async_trait]
impl Geocoder for MapboxGeocoder {
    async fn geocode(&self, query: &str) -> ShevResult<Option<Coordinates>> {
        let url = self.places_url(query)?;

        let response = self
            .client
            .get(url)
            .query(&[("access_token", self.access_token.as_str()), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShevError::Geocode(format!("Mapbox returned {status}")));
        }

        let collection: FeatureCollection = response
            .json()
            .await
            .map_err(|e| ShevError::Geocode(format!("Invalid Mapbox response: {e}")))?;

        Ok(collection.features.first().map(|feature| {
            let [longitude, latitude] = feature.geometry.coordinates;
            Coordinates {
                latitude,
                longitude,
            }
        }))
    }
}
