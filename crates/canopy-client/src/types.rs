//! Request and response types for the Canopy API.
//!
//! These types mirror the server's API contract.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Monitor
// ─────────────────────────────────────────────────────────────────────────────

/// A service type that can be monitored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorService {
    /// Service type identifier (e.g. "dbaas").
    pub service_type: String,
    /// Human-readable label.
    pub label: String,
}

/// Response for listing monitor services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListServicesResponse {
    /// Service types available to the caller.
    pub services: Vec<MonitorService>,
}

/// Request to create a scoped monitor service token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorTokenCreateOptions {
    /// Entities the token grants access to.
    pub entity_ids: Vec<u64>,
}

/// A scoped token issued for a monitor service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorServiceToken {
    /// The token value.
    pub token: String,
}
