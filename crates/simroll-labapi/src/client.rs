//! Simulation API trait and the `reqwest`-backed implementation.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::config::LabApiConfig;
use crate::error::{LabApiError, LabApiResult};

/// Response received from the simulation service.
///
/// The raw body is kept for diagnostics on rejected requests.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

/// Remote simulation operations consumed by the batch dispatcher.
#[async_trait]
pub trait SimulationApi: Send + Sync {
    /// Start the simulation of `lab` for one student identifier.
    async fn start_simulation(&self, lab: &str, identifier: &str) -> LabApiResult<ApiResponse>;

    /// Stop the `{lab}-{identifier}` simulation.
    async fn stop_simulation(&self, lab: &str, identifier: &str) -> LabApiResult<ApiResponse>;
}

/// HTTP client for the lab simulation service.
pub struct LabApiClient {
    config: LabApiConfig,
    client: Client,
}

impl std::fmt::Debug for LabApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabApiClient")
            .field("config", &self.config)
            .finish()
    }
}

impl LabApiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: LabApiConfig) -> LabApiResult<Self> {
        config.validate()?;
        let client = Self::build_client(&config)?;
        Ok(Self { config, client })
    }

    fn build_client(config: &LabApiConfig) -> LabApiResult<Client> {
        Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LabApiError::InvalidConfiguration {
                message: format!("failed to build HTTP client: {e}"),
            })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn into_response(response: reqwest::Response) -> LabApiResult<ApiResponse> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(ApiResponse { status, body })
    }
}

#[async_trait]
impl SimulationApi for LabApiClient {
    async fn start_simulation(&self, lab: &str, identifier: &str) -> LabApiResult<ApiResponse> {
        let url = self.url(&format!("simulations/create/{identifier}"));
        debug!(url = %url, lab = %lab, "starting simulation");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.username, self.config.password.as_deref())
            .form(&[("lab", lab)])
            .send()
            .await?;

        Self::into_response(response).await
    }

    async fn stop_simulation(&self, lab: &str, identifier: &str) -> LabApiResult<ApiResponse> {
        let url = self.url(&format!("simulations/{lab}-{identifier}"));
        debug!(url = %url, "stopping simulation");

        let response = self
            .client
            .delete(&url)
            .basic_auth(&self.config.username, self.config.password.as_deref())
            .send()
            .await?;

        Self::into_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client =
            LabApiClient::new(LabApiConfig::new("https://labs.example.edu/api/", "op")).unwrap();
        assert_eq!(
            client.url("simulations/create/jd123"),
            "https://labs.example.edu/api/simulations/create/jd123"
        );
    }
}
