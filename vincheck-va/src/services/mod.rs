//! Outbound collaborator clients

pub mod analysis_client;
pub mod vpic_client;

pub use analysis_client::{AnalysisClient, AnalysisError, SellerInput};
pub use vpic_client::{VpicClient, VpicError, VpicVehicle};
