//! HTTP client for the clause-analysis service.

use async_trait::async_trait;
use dictamen_core::report::{AnalysisReport, AnalyzeRequest};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Transport seam for the analyze call. The HTTP client below is the real
/// implementation; session tests script their own.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisReport, ClientError>;
}

/// Health snapshot from `GET /health`. Detail keys (connectors, indices)
/// vary by deployment and are kept uninterpreted.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthReport {
    #[serde(default)]
    pub status: String,
    #[serde(flatten)]
    pub detail: serde_json::Map<String, serde_json::Value>,
}

/// HTTP client for the analysis service endpoints.
pub struct AnalysisClient {
    client: reqwest::Client,
    base_url: String,
}

impl AnalysisClient {
    /// Create a client for the given base URL.
    ///
    /// `base_url` should be like `http://localhost:8000` (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Query the service health endpoint.
    pub async fn health(&self) -> Result<HealthReport, ClientError> {
        let url = format!("{}/health", self.base_url);

        info!(url = %url, "checking service health");
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let report: HealthReport = serde_json::from_str(&resp.text().await?)?;
        info!(status = %report.status, "service healthy");
        Ok(report)
    }
}

#[async_trait]
impl AnalysisTransport for AnalysisClient {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisReport, ClientError> {
        let url = format!("{}/analyze", self.base_url);

        info!(url = %url, jurisdiction = %request.jurisdiction, "submitting clause for analysis");
        let resp = self.client.post(&url).json(request).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let report: AnalysisReport = serde_json::from_str(&resp.text().await?)?;
        info!(
            engine = %report.engine,
            nodes = report.per_node.len(),
            "analysis received"
        );
        Ok(report)
    }
}
