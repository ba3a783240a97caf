use std::path::Path;
use std::time::Duration;

use pitch_report_core::listing::ListResponse;
use pitch_report_core::share::encode_path_segment;
use pitch_report_core::upload::{DeckUpload, UploadRejection};
use pitch_report_core::{ReportDocument, ReportError};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unable to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },

    #[error("unexpected response body from {url}: {message}")]
    Body { url: String, message: String },

    #[error("{0}")]
    Rejected(String),

    #[error("unable to read {path}: {source}")]
    ReadDeck {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Upload(#[from] UploadRejection),
}

impl From<ApiError> for ReportError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Status { status, .. } if status == StatusCode::NOT_FOUND => Self::NotFound,
            ApiError::Status { status, .. } => Self::Http {
                status: status.as_u16(),
            },
            ApiError::Body { message, .. } => Self::MalformedBody(message),
            ApiError::Upload(rejection) => Self::InvalidUpload(rejection),
            other => Self::Transport(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub report_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn report_url(&self, report_id: &str) -> String {
        format!("{}/api/report/{}", self.base_url, encode_path_segment(report_id))
    }

    pub fn reports_url(&self, user_id: &str) -> String {
        format!("{}/api/reports/{}", self.base_url, encode_path_segment(user_id.trim()))
    }

    pub fn pdf_url(&self, report_id: &str) -> String {
        format!("{}/api/reports/{}/pdf", self.base_url, encode_path_segment(report_id))
    }

    pub fn delete_url(&self, report_id: &str) -> String {
        format!("{}/api/reports/{}", self.base_url, encode_path_segment(report_id))
    }

    pub fn upload_url(&self) -> String {
        format!("{}/api/validate-pitch-deck", self.base_url)
    }

    pub async fn fetch_report(&self, report_id: &str) -> Result<ReportDocument, ApiError> {
        let url = self.report_url(report_id);
        tracing::debug!(%url, "fetching report");

        let response = self.send(self.http.get(&url), &url).await?;
        let body = response
            .text()
            .await
            .map_err(|source| ApiError::Request {
                url: url.clone(),
                source,
            })?;

        let document = ReportDocument::from_json(&body).map_err(|e| ApiError::Body {
            url: url.clone(),
            message: e.to_string(),
        })?;
        tracing::info!(
            report_id,
            clusters = document.clusters.len(),
            findings = document.finding_count(),
            "report fetched"
        );
        Ok(document)
    }

    pub async fn list_reports(&self, user_id: &str) -> Result<ListResponse, ApiError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(UploadRejection::MissingUserId.into());
        }

        let url = self.reports_url(user_id);
        let response = self.send(self.http.get(&url), &url).await?;
        let listing: ListResponse = response.json().await.map_err(|e| ApiError::Body {
            url: url.clone(),
            message: e.to_string(),
        })?;

        if listing.reports.is_empty() {
            if let Some(error) = listing.error.clone() {
                return Err(ApiError::Rejected(error));
            }
        }
        tracing::info!(user_id, total = listing.total, "reports listed");
        Ok(listing)
    }

    pub async fn upload_deck(&self, deck: &DeckUpload, path: &Path) -> Result<UploadResponse, ApiError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ApiError::ReadDeck {
                path: path.display().to_string(),
                source,
            })?;

        let url = self.upload_url();
        let part = Part::bytes(bytes)
            .file_name(deck.file_name.clone())
            .mime_str(deck.mime)
            .map_err(|source| ApiError::Request {
                url: url.clone(),
                source,
            })?;
        let form = Form::new()
            .text("user_id", deck.user_id.clone())
            .text("title", deck.title.clone())
            .part("pitch_deck", part);

        tracing::info!(file = %deck.file_name, size = deck.size, "uploading pitch deck");
        let response = self.send(self.http.post(&url).multipart(form), &url).await?;
        let outcome: UploadResponse = response.json().await.map_err(|e| ApiError::Body {
            url: url.clone(),
            message: e.to_string(),
        })?;

        if outcome.success {
            Ok(outcome)
        } else {
            Err(ApiError::Rejected(
                outcome
                    .error
                    .unwrap_or_else(|| "Failed to generate report".to_string()),
            ))
        }
    }

    pub async fn download_pdf(&self, report_id: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.pdf_url(report_id);
        let response = self.send(self.http.get(&url), &url).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ApiError::Request {
                url: url.clone(),
                source,
            })?;
        tracing::info!(report_id, size = bytes.len(), "report PDF downloaded");
        Ok(bytes.to_vec())
    }

    pub async fn delete_report(&self, report_id: &str) -> Result<(), ApiError> {
        let url = self.delete_url(report_id);
        self.send(self.http.delete(&url), &url).await?;
        tracing::info!(report_id, "report deleted");
        Ok(())
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(|source| {
            tracing::error!(%url, error = %source, "request failed");
            ApiError::Request {
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, %status, "request returned an error status");
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response)
    }
}
