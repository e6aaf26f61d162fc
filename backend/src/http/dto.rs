//! Data Transfer Objects for the HTTP API.
//!
//! Response bodies are the serializable types from [`crate::api`]; only the
//! health payload is specific to the transport.

use serde::{Deserialize, Serialize};

pub use crate::api::{
    FlightSummary, HomeDashboard, Page, PilotDetail, PilotSummary, RecordsOverview,
    TakeoffDetail, TakeoffSummary, WingDetail, WingSummary,
};

/// Health check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "ok" or "error"
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }

    pub fn error() -> Self {
        Self {
            status: "error".to_string(),
        }
    }
}
