//! Google Time Zone API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{Coordinates, TimezoneLookup};
use crate::error::{ShevError, ShevResult};

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";

pub struct GoogleTimezone {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimezoneResponse {
    status: String,
    time_zone_id: Option<String>,
    error_message: Option<String>,
}

impl GoogleTimezone {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        GoogleTimezone {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl TimezoneLookup for GoogleTimezone {
    async fn timezone(&self, at: Coordinates, reference: DateTime<Utc>) -> ShevResult<String> {
        let url = format!(
            "{}/maps/api/timezone/json",
            self.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .get(url)
            .query(&[
                ("location", format!("{},{}", at.latitude, at.longitude)),
                ("timestamp", reference.timestamp().to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShevError::Timezone(format!(
                "Time Zone API returned {status}"
            )));
        }

        let body: TimezoneResponse = response
            .json()
            .await
            .map_err(|e| ShevError::Timezone(format!("Invalid Time Zone API response: {e}")))?;

        if body.status != "OK" {
            return Err(ShevError::Timezone(format!(
                "Time Zone API status {}: {}",
                body.status,
                body.error_message.unwrap_or_default()
            )));
        }

        body.time_zone_id
            .ok_or_else(|| ShevError::Timezone("Time Zone API returned no timeZoneId".to_string()))
    }
}
