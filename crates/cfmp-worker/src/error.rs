//! Rendering error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template render failed: {0}")]
    Template(String),

    #[error("Invalid page configuration: {0}")]
    InvalidPage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;
