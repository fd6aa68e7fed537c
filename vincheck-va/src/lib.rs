//! vincheck-va library interface
//!
//! Exposes the application state, router and the VIN core for integration
//! testing.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod vin;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use vincheck_common::TomlConfig;

use crate::services::{AnalysisClient, VpicClient};
use crate::vin::{Reconciler, ReconcilerPolicy};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded service configuration
    pub config: Arc<TomlConfig>,
    /// NHTSA vPIC decode client
    pub vpic: Arc<VpicClient>,
    /// Text-generation collaborator client
    pub analysis: Arc<AnalysisClient>,
    /// Reconciliation policy holder
    pub reconciler: Arc<Reconciler>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last collaborator error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(config: TomlConfig, vpic: VpicClient, analysis: AnalysisClient) -> Self {
        let reconciler = Reconciler::with_policy(ReconcilerPolicy::from_config(&config.decoder));

        Self {
            config: Arc::new(config),
            vpic: Arc::new(vpic),
            analysis: Arc::new(analysis),
            reconciler: Arc::new(reconciler),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::analyze_routes())
        .merge(api::health_routes())
        .with_state(state)
}
