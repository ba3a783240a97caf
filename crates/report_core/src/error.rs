use thiserror::Error;

use crate::upload::UploadRejection;

/// Failures that stop a report from being shown.
///
/// Missing or oddly-shaped nested data is never an error; it is skipped
/// while building the model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("report body is not a usable JSON object: {0}")]
    MalformedBody(String),

    #[error("report request failed with HTTP status {status}")]
    Http { status: u16 },

    #[error("report request failed: {0}")]
    Transport(String),

    #[error("report not found")]
    NotFound,

    #[error(transparent)]
    InvalidUpload(#[from] UploadRejection),
}

impl ReportError {
    /// Message shown on the full-page error panel.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound => "Report not found".to_string(),
            Self::InvalidUpload(rejection) => rejection.to_string(),
            _ => "Failed to fetch report data".to_string(),
        }
    }
}
