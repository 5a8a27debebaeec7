use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AgentError, Result};
use crate::traits::AgentGateway;
use crate::types::{AgentRunRequest, AgentRunResponse, HistoryEntry};

/// Agent client (HTTP direct, no SDK).
pub struct AgentHttpClient {
    http_client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl AgentHttpClient {
    /// Create a new client against an agent base URL.
    ///
    /// `timeout` bounds the whole run call; the agent may spend minutes on
    /// multi-step reasoning, so callers pass a generous value (120 s by
    /// default at the config layer).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder().build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn classify(err: reqwest::Error) -> AgentError {
        if err.is_timeout() {
            AgentError::Timeout
        } else {
            AgentError::Transport(err)
        }
    }
}

#[async_trait]
impl AgentGateway for AgentHttpClient {
    async fn invoke(
        &self,
        message: &str,
        history: &[HistoryEntry],
        model: &str,
    ) -> Result<String> {
        let payload = AgentRunRequest {
            message,
            history,
            model,
        };

        tracing::debug!(model, history_len = history.len(), "invoking agent");

        let response = self
            .http_client
            .post(format!("{}/run", self.base_url))
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(Self::classify)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let data: AgentRunResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Malformed(e.to_string()))?;

        Ok(data.response)
    }

    async fn models(&self) -> Result<serde_json::Value> {
        let response = self
            .http_client
            .get(format!("{}/models", self.base_url))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(Self::classify)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| AgentError::Malformed(e.to_string()))
    }
}
