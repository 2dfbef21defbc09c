use crate::config::SoilServiceConfig;
use crate::error::{CropOpsError, Result};
use crate::models::SoilReport;
use serde::Serialize;

/// Client for a soil health report service keyed by pincode and region.
pub struct SoilDataClient {
    client: reqwest::Client,
    config: SoilServiceConfig,
}

#[derive(Debug, Serialize)]
struct SoilRequest<'a> {
    pincode: &'a str,
    region: &'a str,
}

impl SoilDataClient {
    pub fn new(config: SoilServiceConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub async fn fetch_report(&self, pincode: &str, region: &str) -> Result<SoilReport> {
        let mut request = self
            .client
            .post(&self.config.url)
            .json(&SoilRequest { pincode, region });

        if !self.config.token.is_empty() {
            request = request.bearer_auth(&self.config.token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CropOpsError::DataSourceUnavailable(format!("Soil service: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CropOpsError::DataSourceUnavailable(format!(
                "Soil service returned {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        parse_report(&body)
    }

    /// Any non-5xx answer means the service is reachable.
    pub async fn test_connection(&self) -> Result<bool> {
        let response = self
            .client
            .get(&self.config.url)
            .send()
            .await
            .map_err(|e| CropOpsError::DataSourceUnavailable(format!("Soil service: {}", e)))?;

        Ok(!response.status().is_server_error())
    }
}

/// Parse a report, dropping readings that are not finite or negative.
fn parse_report(body: &str) -> Result<SoilReport> {
    let mut report: SoilReport = serde_json::from_str(body)?;

    let clean = |v: Option<f64>| v.filter(|x| x.is_finite() && *x >= 0.0);
    report.ph = clean(report.ph);
    report.nitrogen = clean(report.nitrogen);
    report.phosphorus = clean(report.phosphorus);
    report.potassium = clean(report.potassium);
    report.moisture_percent = clean(report.moisture_percent);
    report.organic_matter_percent = clean(report.organic_matter_percent);

    Ok(report)
}
