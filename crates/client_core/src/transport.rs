use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{SimulationRequest, SimulationResponse};
use url::Url;

use crate::error::QueryError;

const SIMULATOR_PATH: &str = "api/simulator";
const STATUS_BODY_LIMIT: usize = 200;

#[async_trait]
pub trait SimulatorTransport: Send + Sync {
    async fn simulate(&self, request: &SimulationRequest)
        -> Result<SimulationResponse, QueryError>;
}

/// JSON-over-HTTP client for the simulator endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(server_url: &str) -> Result<Self, url::ParseError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            http,
            endpoint: simulator_endpoint(server_url)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

pub fn simulator_endpoint(server_url: &str) -> Result<Url, url::ParseError> {
    let mut base = Url::parse(server_url.trim())?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(SIMULATOR_PATH)
}

#[async_trait]
impl SimulatorTransport for HttpTransport {
    async fn simulate(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationResponse, QueryError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|err| QueryError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QueryError::Status {
                status: status.as_u16(),
                body: body.chars().take(STATUS_BODY_LIMIT).collect(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| QueryError::Transport(err.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|err| QueryError::Malformed(err.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
