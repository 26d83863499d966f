//! Cloudflare API error types

use cfmp_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CloudflareError {
    #[error("Cloudflare authentication failed (HTTP {status}): {message}")]
    AuthenticationFailed { status: u16, message: String },

    #[error("Cloudflare resource not found: {0}")]
    NotFound(String),

    #[error("Cloudflare API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Unexpected response (HTTP {status}): {body}")]
    UnexpectedResponse { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Worker bundle error: {0}")]
    Bundle(#[from] cfmp_worker::RenderError),
}

pub type Result<T> = std::result::Result<T, CloudflareError>;

impl From<CloudflareError> for CloudError {
    fn from(err: CloudflareError) -> Self {
        match err {
            CloudflareError::AuthenticationFailed { .. } => {
                CloudError::AuthenticationFailed(err.to_string())
            }
            CloudflareError::NotFound(_) => CloudError::ResourceNotFound(err.to_string()),
            CloudflareError::Http(_) => CloudError::Transport(err.to_string()),
            CloudflareError::UnexpectedResponse { .. } | CloudflareError::Json(_) => {
                CloudError::InvalidResponse(err.to_string())
            }
            CloudflareError::ApiError { .. } | CloudflareError::Bundle(_) => {
                CloudError::ApiError(err.to_string())
            }
        }
    }
}
