// OneHand Reverse Geocoder
// Copyright (c) 2026 Xing_The_Creator | OneHand
//
// Turns a GPS fix into a street address through Nominatim.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use super::GpsFix;

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
const USER_AGENT: &str = "saan-ka-talaga-ph";
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

pub const ADDRESS_NOT_FOUND: &str = "Address not found";
pub const ADDRESS_LOOKUP_FAILED: &str = "Address lookup failed";

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoder unreachable: {0}")]
    Network(#[from] reqwest::Error),

    #[error("geocoder answered HTTP {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Debug, Deserialize)]
struct ReverseReply {
    display_name: Option<String>,
}

pub struct ReverseGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl ReverseGeocoder {
    pub fn new() -> Self {
        Self::with_base(NOMINATIM_URL)
    }

    pub fn with_base(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!("[GEOTAG] Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Address at `fix`, `Ok(None)` when the service has nothing there.
    pub async fn lookup(&self, fix: GpsFix) -> Result<Option<String>, GeocodeError> {
        let url = format!("{}/reverse", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", fix.latitude.to_string()),
                ("lon", fix.longitude.to_string()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(GeocodeError::Status(resp.status()));
        }

        let reply: ReverseReply = resp.json().await?;
        Ok(reply.display_name.filter(|name| !name.trim().is_empty()))
    }
}

impl Default for ReverseGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Address text for display, never an error.
pub async fn describe_location(geocoder: Option<&ReverseGeocoder>, fix: GpsFix) -> String {
    let Some(geocoder) = geocoder else {
        return ADDRESS_NOT_FOUND.to_string();
    };

    match geocoder.lookup(fix).await {
        Ok(Some(address)) => address,
        Ok(None) => ADDRESS_NOT_FOUND.to_string(),
        Err(e) => {
            debug!("[GEOTAG] Reverse geocoding failed: {}", e);
            ADDRESS_LOOKUP_FAILED.to_string()
        }
    }
}
