//! Error types for route reconciliation

use thiserror::Error;

/// Errors raised by a [`RemoteStateClient`](crate::RemoteStateClient) call
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, CloudError>;

/// Errors surfaced by the [`ReconciliationEngine`](crate::ReconciliationEngine)
///
/// Remote failures are tagged with the operation and the pattern or route id
/// that triggered them.
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Invalid target: {0} must not be empty")]
    InvalidTarget(&'static str),

    #[error("Failed to get zone domain for zone {zone_id}")]
    ZoneLookup {
        zone_id: String,
        #[source]
        source: CloudError,
    },

    #[error("Failed to list routes for zone {zone_id}")]
    ListRoutes {
        zone_id: String,
        #[source]
        source: CloudError,
    },

    #[error("Failed to create route {pattern}")]
    CreateRoute {
        pattern: String,
        #[source]
        source: CloudError,
    },

    #[error("Failed to update route {route_id} to {pattern}")]
    UpdateRoute {
        route_id: String,
        pattern: String,
        #[source]
        source: CloudError,
    },

    #[error("Failed to upload script {script}")]
    UploadScript {
        script: String,
        #[source]
        source: CloudError,
    },

    #[error(
        "no matching route found for {expected}. Run 'deploy' first to create the maintenance route"
    )]
    NoMatchingRoute { expected: String },

    #[error("Failed to build worker script: {0}")]
    Render(#[from] cfmp_worker::RenderError),
}
