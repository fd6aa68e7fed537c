//! Vehicle analysis API handler
//!
//! POST /analyze: the full pipeline — shape validation, local structural
//! decode, remote lookup, reconciliation, analysis generation.

use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::services::SellerInput;
use crate::vin::{decode_local, DecodedRecord, Vin};
use crate::AppState;

const MAX_MILEAGE: u32 = 2_000_000;
const MAX_PRICE: u64 = 10_000_000;
const MAX_DESCRIPTION_CHARS: usize = 5_000;
const MAX_QUESTION_CHARS: usize = 1_000;
const MIN_DECLARED_YEAR: i32 = 1980;

/// POST /analyze request
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub vin: String,
    #[serde(default)]
    pub make_model: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub mileage: Option<u32>,
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default)]
    pub seller_description: Option<String>,
    #[serde(default)]
    pub user_question: Option<String>,
}

impl AnalyzeRequest {
    /// Bounds checks for the auxiliary seller fields
    ///
    /// The VIN itself is validated separately by [`Vin::parse`]; the fields
    /// here are pass-through data and only sanity-checked.
    fn validate(&self) -> Result<(), String> {
        if let Some(year) = self.year {
            let max_year = Utc::now().year() + 1;
            if year < MIN_DECLARED_YEAR || year > max_year {
                return Err(format!(
                    "Declared year must be between {} and {}",
                    MIN_DECLARED_YEAR, max_year
                ));
            }
        }
        if self.mileage.is_some_and(|mileage| mileage > MAX_MILEAGE) {
            return Err(format!("Mileage must not exceed {}", MAX_MILEAGE));
        }
        if self.price.is_some_and(|price| price > MAX_PRICE) {
            return Err(format!("Price must not exceed {}", MAX_PRICE));
        }
        if self
            .seller_description
            .as_deref()
            .is_some_and(|text| text.chars().count() > MAX_DESCRIPTION_CHARS)
        {
            return Err(format!(
                "Seller description must not exceed {} characters",
                MAX_DESCRIPTION_CHARS
            ));
        }
        if self
            .user_question
            .as_deref()
            .is_some_and(|text| text.chars().count() > MAX_QUESTION_CHARS)
        {
            return Err(format!(
                "Question must not exceed {} characters",
                MAX_QUESTION_CHARS
            ));
        }
        Ok(())
    }

    fn seller_input(&self) -> SellerInput<'_> {
        SellerInput {
            make_model: self.make_model.as_deref(),
            year: self.year,
            mileage: self.mileage,
            price: self.price,
            seller_description: self.seller_description.as_deref(),
            user_question: self.user_question.as_deref(),
        }
    }
}

/// POST /analyze response
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub decoded: DecodedRecord,
    pub analysis: String,
    pub timestamp: DateTime<Utc>,
}

/// POST /analyze
///
/// Shape failures reject the request; every decode-path failure degrades
/// instead (remote unavailability falls back to local-only data). Only the
/// analysis collaborator is load-bearing.
pub async fn analyze_vehicle(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let request_id = Uuid::new_v4();

    request.validate().map_err(ApiError::BadRequest)?;

    let vin = Vin::parse(&request.vin).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    tracing::info!(request_id = %request_id, vin = %vin, "Analysis request accepted");

    let local = decode_local(&vin);

    let remote = match state.vpic.decode_vin(&vin).await {
        Ok(vehicle) => Some(vehicle),
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                vin = %vin,
                error = %e,
                "Remote decode unavailable, continuing with local data"
            );
            *state.last_error.write().await = Some(e.to_string());
            None
        }
    };

    let record = state.reconciler.reconcile(&vin, &local, remote.as_ref());

    tracing::info!(
        request_id = %request_id,
        vin = %vin,
        make = %record.make,
        model = %record.model,
        year = record.year,
        source = ?record.decoding_source,
        checksum_valid = record.checksum_valid,
        "VIN reconciled"
    );

    let analysis = state
        .analysis
        .analyze(&request.seller_input(), Some(&record))
        .await
        .map_err(|e| {
            tracing::error!(request_id = %request_id, error = %e, "Analysis generation failed");
            ApiError::UpstreamFailed(format!("Analysis generation failed: {}", e))
        })?;

    Ok(Json(AnalyzeResponse {
        decoded: record,
        analysis,
        timestamp: Utc::now(),
    }))
}

/// Build analyze routes
pub fn analyze_routes() -> Router<AppState> {
    Router::new().route("/analyze", post(analyze_vehicle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(vin: &str) -> AnalyzeRequest {
        AnalyzeRequest {
            vin: vin.to_string(),
            make_model: None,
            year: None,
            mileage: None,
            price: None,
            seller_description: None,
            user_question: None,
        }
    }

    #[test]
    fn test_validate_accepts_minimal_request() {
        assert!(request("1M8GDM9AXKP042788").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_fields() {
        let mut r = request("1M8GDM9AXKP042788");
        r.year = Some(1899);
        assert!(r.validate().is_err());

        let mut r = request("1M8GDM9AXKP042788");
        r.mileage = Some(MAX_MILEAGE + 1);
        assert!(r.validate().is_err());

        let mut r = request("1M8GDM9AXKP042788");
        r.price = Some(MAX_PRICE + 1);
        assert!(r.validate().is_err());

        let mut r = request("1M8GDM9AXKP042788");
        r.seller_description = Some("x".repeat(MAX_DESCRIPTION_CHARS + 1));
        assert!(r.validate().is_err());

        let mut r = request("1M8GDM9AXKP042788");
        r.user_question = Some("x".repeat(MAX_QUESTION_CHARS + 1));
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_seller_input_borrows_fields() {
        let mut r = request("1M8GDM9AXKP042788");
        r.make_model = Some("BMW 328i".to_string());
        r.mileage = Some(120_000);

        let seller = r.seller_input();
        assert_eq!(seller.make_model, Some("BMW 328i"));
        assert_eq!(seller.mileage, Some(120_000));
        assert_eq!(seller.user_question, None);
    }
}
