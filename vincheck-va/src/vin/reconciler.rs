//! Reconciliation of local structural decode and remote vPIC data
//!
//! Two untrusted sources feed one authoritative record. Remote coverage is
//! strong for North-American-market vehicles and weak for a known set of
//! European region codes, so arbitration is a single binary trust switch
//! (region membership plus a sanity check), not a per-field confidence
//! score. The switch decides which source populates the trust-critical
//! fields; the record always carries provenance and checksum metadata and
//! is fully constructible from local decoding alone.

use serde::{Deserialize, Serialize};
use vincheck_common::config::DecoderConfig;

use super::decoder::LocalCandidate;
use super::tables::MODEL_HINTED_MAKE;
use super::validator::Vin;
use crate::services::vpic_client::{non_empty, VpicVehicle};

/// Sentinel for fields with no known value; absence is not a valid state
pub const UNKNOWN: &str = "Unknown";

/// Sentinel for an unknown model year
pub const UNKNOWN_YEAR: i32 = 0;

/// Which source supplied the authoritative fields of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodingSource {
    Remote,
    Local,
}

/// The reconciled vehicle record, constructed exactly once per request
///
/// Every string field defaults to [`UNKNOWN`], the year to [`UNKNOWN_YEAR`];
/// only the vendor error fields are optional.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedRecord {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub vehicle_type: String,
    pub engine_type: String,
    pub engine_displacement: String,
    pub fuel_type: String,
    pub transmission: String,
    pub drive_type: String,
    pub body_class: String,
    pub plant_country: String,
    pub plant_city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_text: Option<String>,
    pub checksum_valid: bool,
    pub is_regional_variant: bool,
    pub decoding_source: DecodingSource,
}

/// Reconciliation tuning
///
/// Both values are empirical heuristics with no first-principles derivation,
/// so they are configuration rather than constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilerPolicy {
    /// Maximum tolerated gap between the structural year code and the
    /// remote-reported model year before the remote record is suspect
    pub year_mismatch_threshold: i32,
    /// VIN first characters whose markets have unreliable remote coverage
    pub regional_prefixes: Vec<char>,
}

impl Default for ReconcilerPolicy {
    fn default() -> Self {
        Self {
            year_mismatch_threshold: 2,
            regional_prefixes: vec!['W', 'V', 'Z', 'S', 'T', 'Y'],
        }
    }
}

impl ReconcilerPolicy {
    pub fn from_config(config: &DecoderConfig) -> Self {
        Self {
            year_mismatch_threshold: config.year_mismatch_threshold,
            regional_prefixes: config.regional_prefixes.chars().collect(),
        }
    }
}

/// Arbitrates between the local structural decode and the remote record
pub struct Reconciler {
    policy: ReconcilerPolicy,
}

impl Reconciler {
    pub fn new() -> Self {
        Self {
            policy: ReconcilerPolicy::default(),
        }
    }

    pub fn with_policy(policy: ReconcilerPolicy) -> Self {
        Self { policy }
    }

    /// Combine both sources into one authoritative record
    ///
    /// Arbitration:
    /// 1. The remote record is suspect when absent, when it reports a real
    ///    vendor error code, or when its model year contradicts the VIN's
    ///    structural year code beyond the configured threshold.
    /// 2. `use_local` = regional variant AND remote suspect. When set, the
    ///    trust-critical fields (make, model, year, plant country) and the
    ///    engine fields ignore the remote record entirely; when clear,
    ///    remote values win with local fallback.
    /// 3. The vendor error surfaces in the output only when it was actually
    ///    reported, never synthesized from absence or the year heuristic.
    pub fn reconcile(
        &self,
        vin: &Vin,
        local: &LocalCandidate,
        remote: Option<&VpicVehicle>,
    ) -> DecodedRecord {
        let reported_error = remote.and_then(VpicVehicle::reported_error);
        let remote_year = remote.and_then(VpicVehicle::model_year_parsed);

        let year_mismatch = match (local.model_year, remote_year) {
            (Some(local_year), Some(remote_year)) => {
                (remote_year - local_year).abs() > self.policy.year_mismatch_threshold
            }
            _ => false,
        };

        let remote_suspect = remote.is_none() || reported_error.is_some() || year_mismatch;
        let is_regional_variant = self.policy.regional_prefixes.contains(&vin.first_char());
        let use_local = is_regional_variant && remote_suspect;

        tracing::debug!(
            vin = %vin,
            regional = is_regional_variant,
            suspect = remote_suspect,
            year_mismatch = year_mismatch,
            use_local = use_local,
            "Reconciling decode sources"
        );

        let remote_make = remote.and_then(|r| non_empty(&r.make));
        let remote_model = remote.and_then(|r| non_empty(&r.model));
        let remote_plant_country = remote.and_then(|r| non_empty(&r.plant_country));

        let make = if use_local {
            local.make.unwrap_or(UNKNOWN).to_string()
        } else {
            remote_make.or(local.make).unwrap_or(UNKNOWN).to_string()
        };

        let mut model = if use_local {
            UNKNOWN.to_string()
        } else {
            remote_model.unwrap_or(UNKNOWN).to_string()
        };

        // Model hint recovery for the one make that encodes the model in
        // positions 4-8
        if (model == UNKNOWN || use_local) && make.eq_ignore_ascii_case(MODEL_HINTED_MAKE) {
            if let Some(hint) = local.model_hint {
                model = hint.to_string();
            }
        }

        let year = if use_local {
            local.model_year.unwrap_or(UNKNOWN_YEAR)
        } else {
            remote_year.or(local.model_year).unwrap_or(UNKNOWN_YEAR)
        };

        let local_country = local.country.or(local.region);
        let plant_country = if use_local {
            local_country.unwrap_or(UNKNOWN).to_string()
        } else {
            remote_plant_country
                .or(local_country)
                .unwrap_or(UNKNOWN)
                .to_string()
        };

        // Local decoding has no source of engine information; these fields
        // exist only when the remote record is trusted
        let (engine_type, engine_displacement) = match remote {
            Some(vehicle) if !use_local => (
                engine_summary(vehicle),
                displacement_summary(vehicle),
            ),
            _ => (UNKNOWN.to_string(), UNKNOWN.to_string()),
        };

        let (error_code, error_text) = match reported_error {
            Some((code, text)) => (Some(code.to_string()), text.map(str::to_string)),
            None => (None, None),
        };

        DecodedRecord {
            make,
            model,
            year,
            vehicle_type: passthrough(remote, |r| &r.vehicle_type),
            engine_type,
            engine_displacement,
            fuel_type: passthrough(remote, |r| &r.fuel_type_primary),
            transmission: passthrough(remote, |r| &r.transmission_style),
            drive_type: passthrough(remote, |r| &r.drive_type),
            body_class: passthrough(remote, |r| &r.body_class),
            plant_country,
            plant_city: passthrough(remote, |r| &r.plant_city),
            error_code,
            error_text,
            checksum_valid: local.checksum_valid,
            is_regional_variant,
            decoding_source: if use_local {
                DecodingSource::Local
            } else {
                DecodingSource::Remote
            },
        }
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

/// Descriptive fields with no local counterpart: remote value when present,
/// sentinel otherwise. These carry no trust decision, so they are consulted
/// regardless of the arbitration switch.
fn passthrough(
    remote: Option<&VpicVehicle>,
    field: impl Fn(&VpicVehicle) -> &Option<String>,
) -> String {
    remote
        .and_then(|vehicle| non_empty(field(vehicle)))
        .unwrap_or(UNKNOWN)
        .to_string()
}

/// Cylinder count and engine model combined into one description
fn engine_summary(vehicle: &VpicVehicle) -> String {
    let cylinders = non_empty(&vehicle.engine_cylinders);
    let model = non_empty(&vehicle.engine_model);

    match (cylinders, model) {
        (Some(cylinders), Some(model)) => format!("{} cylinders {}", cylinders, model),
        (Some(cylinders), None) => format!("{} cylinders", cylinders),
        (None, Some(model)) => model.to_string(),
        (None, None) => UNKNOWN.to_string(),
    }
}

fn displacement_summary(vehicle: &VpicVehicle) -> String {
    match non_empty(&vehicle.displacement_l) {
        Some(displacement) => format!("{}L", displacement),
        None => UNKNOWN.to_string(),
    }
}
