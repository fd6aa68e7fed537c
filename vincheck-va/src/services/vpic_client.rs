//! NHTSA vPIC decode API client
//!
//! One outbound GET per request. The service treats every failure here as
//! degraded-mode input (the reconciler proceeds without remote data), so
//! errors are reported precisely but never escalated.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use vincheck_common::config::VpicConfig;

use crate::vin::Vin;

const DEFAULT_BASE_URL: &str = "https://vpic.nhtsa.dot.gov/api/vehicles";
const USER_AGENT: &str = "vincheck/0.1.0 (https://github.com/vincheck/vincheck)";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// vPIC client errors
#[derive(Debug, Error)]
pub enum VpicError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("No decode data for VIN {0}")]
    NoData(String),
}

/// One vehicle record from the vPIC flat-format decode endpoint
///
/// vPIC reports every field as a string and uses empty strings for missing
/// data; use [`non_empty`] when consuming values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VpicVehicle {
    #[serde(rename = "Make")]
    pub make: Option<String>,
    #[serde(rename = "Model")]
    pub model: Option<String>,
    #[serde(rename = "ModelYear")]
    pub model_year: Option<String>,
    #[serde(rename = "VehicleType")]
    pub vehicle_type: Option<String>,
    #[serde(rename = "EngineCylinders")]
    pub engine_cylinders: Option<String>,
    #[serde(rename = "EngineModel")]
    pub engine_model: Option<String>,
    #[serde(rename = "DisplacementL")]
    pub displacement_l: Option<String>,
    #[serde(rename = "FuelTypePrimary")]
    pub fuel_type_primary: Option<String>,
    #[serde(rename = "TransmissionStyle")]
    pub transmission_style: Option<String>,
    #[serde(rename = "DriveType")]
    pub drive_type: Option<String>,
    #[serde(rename = "BodyClass")]
    pub body_class: Option<String>,
    #[serde(rename = "PlantCountry")]
    pub plant_country: Option<String>,
    #[serde(rename = "PlantCity")]
    pub plant_city: Option<String>,
    #[serde(rename = "ErrorCode")]
    pub error_code: Option<String>,
    #[serde(rename = "ErrorText")]
    pub error_text: Option<String>,
}

impl VpicVehicle {
    /// Reported model year as a number, when present and plausible
    pub fn model_year_parsed(&self) -> Option<i32> {
        non_empty(&self.model_year)
            .and_then(|year| year.parse::<i32>().ok())
            .filter(|year| *year > 0)
    }

    /// The vendor error code and text, when the record reports a real error
    ///
    /// vPIC encodes clean decodes as error code "0" (sometimes a code list
    /// that includes 0); only a non-empty code without a '0' digit counts as
    /// a reported error.
    pub fn reported_error(&self) -> Option<(&str, Option<&str>)> {
        let code = non_empty(&self.error_code)?;
        if code.contains('0') {
            return None;
        }
        Some((code, non_empty(&self.error_text)))
    }
}

/// Treat vendor empty or whitespace-only strings as missing values
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Flat-format decode response: a list of result objects, one per VIN
#[derive(Debug, Deserialize)]
struct VpicResponse {
    #[serde(rename = "Results", default)]
    results: Vec<VpicVehicle>,
}

/// vPIC decode API client
pub struct VpicClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl VpicClient {
    pub fn new() -> Result<Self, VpicError> {
        Self::with_settings(DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS)
    }

    pub fn from_config(config: &VpicConfig) -> Result<Self, VpicError> {
        Self::with_settings(&config.base_url, config.timeout_secs)
    }

    fn with_settings(base_url: &str, timeout_secs: u64) -> Result<Self, VpicError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| VpicError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Decode a VIN through the flat-format endpoint
    ///
    /// An empty `Results` list is reported as `NoData`; the caller treats it
    /// the same as any other unavailability.
    pub async fn decode_vin(&self, vin: &Vin) -> Result<VpicVehicle, VpicError> {
        let url = format!("{}/DecodeVinValues/{}?format=json", self.base_url, vin);

        tracing::debug!(vin = %vin, url = %url, "Querying vPIC decode API");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| VpicError::NetworkError(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(VpicError::ApiError(status.as_u16(), error_text));
        }

        let payload: VpicResponse = response
            .json()
            .await
            .map_err(|e| VpicError::ParseError(e.to_string()))?;

        let vehicle = payload
            .results
            .into_iter()
            .next()
            .ok_or_else(|| VpicError::NoData(vin.to_string()))?;

        tracing::info!(
            vin = %vin,
            make = non_empty(&vehicle.make).unwrap_or("Unknown"),
            model = non_empty(&vehicle.model).unwrap_or("Unknown"),
            error_code = non_empty(&vehicle.error_code).unwrap_or(""),
            "Retrieved vehicle record from vPIC"
        );

        Ok(vehicle)
    }
}
