//! VIN core: shape validation, local structural decoding, reconciliation

pub mod decoder;
pub mod reconciler;
pub mod tables;
pub mod validator;

pub use decoder::{decode_local, LocalCandidate};
pub use reconciler::{DecodedRecord, DecodingSource, Reconciler, ReconcilerPolicy, UNKNOWN};
pub use validator::{Vin, VinError};
