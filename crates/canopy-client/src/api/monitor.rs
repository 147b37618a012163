//! Monitor API.

use crate::client::CanopyClient;
use crate::error::Result;
use crate::types::{
    ListServicesResponse, MonitorService, MonitorServiceToken, MonitorTokenCreateOptions,
};

/// Monitor API client.
pub struct MonitorApi {
    client: CanopyClient,
}

impl MonitorApi {
    pub(crate) fn new(client: CanopyClient) -> Self {
        Self { client }
    }

    /// List the service types available for monitoring.
    pub async fn list_services(&self) -> Result<ListServicesResponse> {
        self.client.get("monitor/services").await
    }

    /// Get a single service type.
    pub async fn get_service(&self, service_type: &str) -> Result<MonitorService> {
        self.client
            .get(&format!("monitor/services/{}", service_type))
            .await
    }

    /// Create a scoped token for a service type.
    pub async fn create_service_token(
        &self,
        service_type: &str,
        opts: MonitorTokenCreateOptions,
    ) -> Result<MonitorServiceToken> {
        self.client
            .post(&format!("monitor/services/{}/token", service_type), &opts)
            .await
    }

    /// Revoke the token issued for a service type.
    pub async fn revoke_service_token(&self, service_type: &str) -> Result<()> {
        self.client
            .delete(&format!("monitor/services/{}/token", service_type))
            .await
    }
}
