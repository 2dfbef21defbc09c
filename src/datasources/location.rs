use crate::config::LocationConfig;
use crate::error::{CropOpsError, Result};
use crate::models::LocationInfo;
use serde::Deserialize;

/// Resolves a pincode to its state and district via the India Post pincode API.
pub struct LocationClient {
    client: reqwest::Client,
    config: LocationConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PostalResponse {
    status: String,
    #[serde(default)]
    post_office: Option<Vec<PostOffice>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PostOffice {
    #[serde(default)]
    district: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

impl LocationClient {
    pub fn new(config: LocationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Look up the region for `pincode`. Unmatched pincodes resolve to
    /// an "Unknown" region rather than an error.
    pub async fn fetch_location(&self, pincode: &str) -> Result<LocationInfo> {
        let url = self.url(pincode);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CropOpsError::DataSourceUnavailable(format!("Pincode lookup: {}", e)))?;

        if !response.status().is_success() {
            return Err(CropOpsError::DataSourceUnavailable(format!(
                "Pincode lookup returned {}",
                response.status()
            )));
        }

        let body: Vec<PostalResponse> = response.json().await.map_err(|e| {
            CropOpsError::DataSourceUnavailable(format!(
                "Failed to parse pincode lookup response: {}",
                e
            ))
        })?;

        let location = convert_response(pincode, body);
        tracing::debug!("Pincode {} resolved to {}", pincode, location.region);
        Ok(location)
    }

    pub async fn test_connection(&self) -> Result<bool> {
        let response = self
            .client
            .get(self.url("110001"))
            .send()
            .await
            .map_err(|e| CropOpsError::DataSourceUnavailable(format!("Pincode lookup: {}", e)))?;

        Ok(response.status().is_success())
    }

    fn url(&self, pincode: &str) -> String {
        format!("{}/pincode/{}", self.config.base_url.trim_end_matches('/'), pincode)
    }
}

fn convert_response(pincode: &str, body: Vec<PostalResponse>) -> LocationInfo {
    let office = body
        .into_iter()
        .filter(|r| r.status.eq_ignore_ascii_case("success"))
        .filter_map(|r| r.post_office)
        .flatten()
        .find(|o| o.state.as_deref().is_some_and(|s| !s.trim().is_empty()));

    match office {
        Some(office) => LocationInfo {
            pincode: pincode.to_string(),
            region: office.state.unwrap_or_default().trim().to_string(),
            district: office.district.filter(|d| !d.trim().is_empty()),
        },
        None => LocationInfo::unknown(pincode),
    }
}
