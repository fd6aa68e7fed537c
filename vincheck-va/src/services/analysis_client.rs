//! Vehicle condition analysis client
//!
//! Sends the reconciled vehicle record plus the seller-provided free text to
//! a chat-completion endpoint and returns the generated prose unchanged. The
//! model's output is opaque to this service; the only obligation upstream is
//! supplying a fully-populated record or an explicit absence.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use vincheck_common::config::AnalysisConfig;

use crate::vin::reconciler::{DecodedRecord, DecodingSource, UNKNOWN_YEAR};

const USER_AGENT: &str = "vincheck/0.1.0 (https://github.com/vincheck/vincheck)";

const SYSTEM_PROMPT: &str = "You are an experienced used-car purchase adviser. \
You receive decoded VIN data for a vehicle together with details supplied by the seller. \
Assess the purchase: point out inconsistencies between the decoded data and the seller's claims, \
note issues typical for this make, model and age, and comment on the asking price when one is given. \
If the VIN checksum is invalid, warn that the VIN may be mistyped or altered. \
Answer the buyer's question if one was asked. \
End with exactly one verdict line: 'Verdict: recommend', 'Verdict: caution' or 'Verdict: not recommended'.";

/// Analysis client errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Model returned no content")]
    EmptyResponse,
}

/// Seller-supplied fields passed through to the model uninterpreted
#[derive(Debug, Clone, Default)]
pub struct SellerInput<'a> {
    pub make_model: Option<&'a str>,
    pub year: Option<i32>,
    pub mileage: Option<u32>,
    pub price: Option<u64>,
    pub seller_description: Option<&'a str>,
    pub user_question: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Chat-completion client for the analysis collaborator
pub struct AnalysisClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl AnalysisClient {
    pub fn from_config(config: &AnalysisConfig, api_key: String) -> Result<Self, AnalysisError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AnalysisError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    /// Generate the purchase-analysis prose
    ///
    /// `decoded` is None when decoding was skipped or failed upstream; the
    /// prompt says so instead of fabricating vehicle data.
    pub async fn analyze(
        &self,
        seller: &SellerInput<'_>,
        decoded: Option<&DecodedRecord>,
    ) -> Result<String, AnalysisError> {
        let prompt = build_prompt(seller, decoded);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.4,
        };

        let url = format!("{}/chat/completions", self.base_url);

        tracing::debug!(model = %self.model, url = %url, "Requesting vehicle analysis");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::NetworkError(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AnalysisError::ApiError(status.as_u16(), error_text));
        }

        let payload: ChatResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::ParseError(e.to_string()))?;

        let content = payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AnalysisError::EmptyResponse)?;

        tracing::info!(chars = content.len(), "Vehicle analysis generated");

        Ok(content)
    }
}

/// Assemble the user prompt from the decoded record and seller input
fn build_prompt(seller: &SellerInput<'_>, decoded: Option<&DecodedRecord>) -> String {
    let mut prompt = String::from("Vehicle listing under evaluation.\n\n");

    match decoded {
        Some(record) => {
            prompt.push_str("Decoded VIN data:\n");
            prompt.push_str(&format!("- Make: {}\n", record.make));
            prompt.push_str(&format!("- Model: {}\n", record.model));
            if record.year != UNKNOWN_YEAR {
                prompt.push_str(&format!("- Year: {}\n", record.year));
            } else {
                prompt.push_str("- Year: Unknown\n");
            }
            prompt.push_str(&format!("- Vehicle type: {}\n", record.vehicle_type));
            prompt.push_str(&format!("- Engine: {}\n", record.engine_type));
            prompt.push_str(&format!("- Displacement: {}\n", record.engine_displacement));
            prompt.push_str(&format!("- Fuel: {}\n", record.fuel_type));
            prompt.push_str(&format!("- Transmission: {}\n", record.transmission));
            prompt.push_str(&format!("- Drive type: {}\n", record.drive_type));
            prompt.push_str(&format!("- Body class: {}\n", record.body_class));
            prompt.push_str(&format!(
                "- Assembled in: {} ({})\n",
                record.plant_country, record.plant_city
            ));

            let source = match record.decoding_source {
                DecodingSource::Remote => "national vehicle database",
                DecodingSource::Local => "structural VIN decoding only",
            };
            prompt.push_str(&format!("- Data source: {}\n", source));

            if !record.checksum_valid {
                prompt.push_str("- WARNING: the VIN checksum is invalid; the VIN may be mistyped or altered\n");
            }
            if let Some(error_text) = &record.error_text {
                prompt.push_str(&format!("- Decoder advisory: {}\n", error_text));
            }
        }
        None => {
            prompt.push_str("VIN decoding was unavailable for this vehicle.\n");
        }
    }

    prompt.push_str("\nSeller-provided details:\n");
    if let Some(make_model) = seller.make_model {
        prompt.push_str(&format!("- Declared make and model: {}\n", make_model));
    }
    if let Some(year) = seller.year {
        prompt.push_str(&format!("- Declared year: {}\n", year));
    }
    if let Some(mileage) = seller.mileage {
        prompt.push_str(&format!("- Mileage: {} km\n", mileage));
    }
    if let Some(price) = seller.price {
        prompt.push_str(&format!("- Asking price: {} USD\n", price));
    }
    if let Some(description) = seller.seller_description {
        prompt.push_str(&format!("- Seller description: {}\n", description));
    }

    if let Some(question) = seller.user_question {
        prompt.push_str(&format!("\nBuyer question: {}\n", question));
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vin::reconciler::UNKNOWN;

    fn sample_record() -> DecodedRecord {
        DecodedRecord {
            make: "Volkswagen".to_string(),
            model: "Touareg".to_string(),
            year: 2016,
            vehicle_type: UNKNOWN.to_string(),
            engine_type: UNKNOWN.to_string(),
            engine_displacement: UNKNOWN.to_string(),
            fuel_type: UNKNOWN.to_string(),
            transmission: UNKNOWN.to_string(),
            drive_type: UNKNOWN.to_string(),
            body_class: UNKNOWN.to_string(),
            plant_country: "Germany".to_string(),
            plant_city: UNKNOWN.to_string(),
            error_code: None,
            error_text: None,
            checksum_valid: true,
            is_regional_variant: true,
            decoding_source: DecodingSource::Local,
        }
    }

    #[test]
    fn test_client_creation() {
        let config = AnalysisConfig::default();
        assert!(AnalysisClient::from_config(&config, "test-key".to_string()).is_ok());
    }

    #[test]
    fn test_prompt_carries_decoded_fields_and_seller_input() {
        let seller = SellerInput {
            make_model: Some("VW Touareg"),
            year: Some(2016),
            mileage: Some(180_000),
            price: Some(14_500),
            seller_description: Some("One owner, full service history"),
            user_question: Some("Is the mileage plausible?"),
        };

        let prompt = build_prompt(&seller, Some(&sample_record()));

        assert!(prompt.contains("- Make: Volkswagen"));
        assert!(prompt.contains("- Model: Touareg"));
        assert!(prompt.contains("- Year: 2016"));
        assert!(prompt.contains("structural VIN decoding only"));
        assert!(prompt.contains("One owner, full service history"));
        assert!(prompt.contains("Buyer question: Is the mileage plausible?"));
        assert!(!prompt.contains("WARNING"));
    }

    #[test]
    fn test_prompt_warns_on_invalid_checksum() {
        let mut record = sample_record();
        record.checksum_valid = false;

        let prompt = build_prompt(&SellerInput::default(), Some(&record));
        assert!(prompt.contains("checksum is invalid"));
    }

    #[test]
    fn test_prompt_states_decode_unavailable() {
        let prompt = build_prompt(&SellerInput::default(), None);
        assert!(prompt.contains("VIN decoding was unavailable"));
        assert!(!prompt.contains("Decoded VIN data"));
    }

    #[test]
    fn test_response_content_extraction() {
        let payload = r#"{
            "choices": [{
                "message": {"role": "assistant", "content": "Solid car. Verdict: recommend"}
            }]
        }"#;

        let response: ChatResponse = serde_json::from_str(payload).unwrap();
        let content = response.choices.into_iter().next().unwrap().message.content;
        assert_eq!(content.as_deref(), Some("Solid car. Verdict: recommend"));
    }
}
