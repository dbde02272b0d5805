//! Gateway: the single point of entry for all calls to the TalentBridge backend.
//!
//! No other module talks to the backend over HTTP. Every method maps to one
//! endpoint and fails without retrying: a failed request stays failed until the
//! user triggers it again.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{multipart, Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::analytics::{ChartInsight, ChartInsightRequest, JobAnalytics};
use crate::models::cv::{
    Application, ApplicationsPayload, CvInsights, CvRecord, ImprovementsResponse, MatchRequest,
    MatchResponse, UploadedCv,
};
use crate::models::job::{JobRecord, JobsPage};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl GatewayError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::Status { status: 404, .. })
    }
}

/// FastAPI error body.
#[derive(Debug, Deserialize)]
struct ErrorDetail {
    detail: Value,
}

/// A document streamed back from `GET /preview-doc/{id}`.
#[derive(Debug, Clone)]
pub struct Document {
    pub content_type: String,
    pub bytes: Bytes,
}

/// Source of the backing job collection.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn list_jobs(&self, limit: usize) -> Result<JobsPage, GatewayError>;
}

/// Source of per-CV application history.
#[async_trait]
pub trait ApplicationSource: Send + Sync {
    async fn applications(&self, cv_id: i64) -> Result<Vec<Application>, GatewayError>;
}

#[derive(Clone)]
pub struct Gateway {
    client: Client,
    base_url: String,
}

impl Gateway {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET /jobs/{id}
    pub async fn get_job(&self, id: i64) -> Result<JobRecord, GatewayError> {
        let response = self.client.get(self.url(&format!("/jobs/{id}"))).send().await?;
        read_json(response).await
    }

    /// GET /jobs/analytics
    pub async fn job_analytics(&self) -> Result<JobAnalytics, GatewayError> {
        let response = self.client.get(self.url("/jobs/analytics")).send().await?;
        read_json(response).await
    }

    /// POST /jobs/analytics/insights
    pub async fn chart_insights(
        &self,
        request: &ChartInsightRequest,
    ) -> Result<ChartInsight, GatewayError> {
        let response = self
            .client
            .post(self.url("/jobs/analytics/insights"))
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }

    /// GET /cvs
    pub async fn list_cvs(&self) -> Result<Vec<CvRecord>, GatewayError> {
        let response = self.client.get(self.url("/cvs")).send().await?;
        read_json(response).await
    }

    /// POST /upload-cv (multipart field `file`)
    pub async fn upload_cv(
        &self,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<UploadedCv, GatewayError> {
        let part = multipart::Part::bytes(data.to_vec())
            .file_name(filename.to_string())
            .mime_str(content_type)?;
        let form = multipart::Form::new().part("file", part);
        let response = self
            .client
            .post(self.url("/upload-cv"))
            .multipart(form)
            .send()
            .await?;
        read_json(response).await
    }

    /// GET /cv/{id}/insights
    pub async fn cv_insights(&self, cv_id: i64) -> Result<CvInsights, GatewayError> {
        let response = self
            .client
            .get(self.url(&format!("/cv/{cv_id}/insights")))
            .send()
            .await?;
        read_json(response).await
    }

    /// POST /cv/improve?cv_id=
    pub async fn improve_cv(&self, cv_id: i64) -> Result<ImprovementsResponse, GatewayError> {
        let response = self
            .client
            .post(self.url("/cv/improve"))
            .query(&[("cv_id", cv_id)])
            .send()
            .await?;
        read_json(response).await
    }

    /// POST /match
    pub async fn match_jobs(&self, request: &MatchRequest) -> Result<MatchResponse, GatewayError> {
        let response = self
            .client
            .post(self.url("/match"))
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }

    /// GET /preview-doc/{id}
    pub async fn preview_document(&self, cv_id: i64) -> Result<Document, GatewayError> {
        let response = self
            .client
            .get(self.url(&format!("/preview-doc/{cv_id}")))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/pdf")
            .to_string();
        let bytes = response.bytes().await?;
        Ok(Document {
            content_type,
            bytes,
        })
    }
}

#[async_trait]
impl JobSource for Gateway {
    /// GET /jobs?limit=N
    async fn list_jobs(&self, limit: usize) -> Result<JobsPage, GatewayError> {
        let response = self
            .client
            .get(self.url("/jobs"))
            .query(&[("limit", limit)])
            .send()
            .await?;
        read_json(response).await
    }
}

#[async_trait]
impl ApplicationSource for Gateway {
    /// GET /applications/{cv_id}
    async fn applications(&self, cv_id: i64) -> Result<Vec<Application>, GatewayError> {
        let response = self
            .client
            .get(self.url(&format!("/applications/{cv_id}")))
            .send()
            .await?;
        let payload: ApplicationsPayload = read_json(response).await?;
        Ok(payload.into_vec())
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    let status = response.status();
    let url = response.url().path().to_string();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(status_error(status, &body));
    }

    debug!("Backend {} returned {} bytes", url, body.len());
    serde_json::from_str(&body).map_err(GatewayError::Malformed)
}

fn status_error(status: StatusCode, body: &str) -> GatewayError {
    GatewayError::Status {
        status: status.as_u16(),
        message: error_message(status, body),
    }
}

/// Pulls a readable message out of an error body, preferring FastAPI's `detail`.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(err) = serde_json::from_str::<ErrorDetail>(body) {
        return match err.detail {
            Value::String(s) => s,
            other => other.to_string(),
        };
    }
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        body.to_string()
    }
}
