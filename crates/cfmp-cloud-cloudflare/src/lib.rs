//! Cloudflare API client for cfmp
//!
//! Implements [`cfmp_cloud::RemoteStateClient`] over the Cloudflare v4 REST
//! API with Bearer token authentication.
//!
//! # Required token permissions
//!
//! - Zone: Zone Read, Workers Routes Edit
//! - Account: Workers Scripts Edit
//!
//! # Example
//!
//! ```ignore
//! use cfmp_cloud::{ReconciliationEngine, ZoneTarget};
//! use cfmp_cloud_cloudflare::CloudflareApi;
//!
//! let api = CloudflareApi::new(token)?;
//! let engine = ReconciliationEngine::connect(api, target).await?;
//! engine.enable_maintenance().await?;
//! ```

pub mod api;
pub mod error;

pub use api::{CLOUDFLARE_API_BASE, CloudflareApi};
pub use error::{CloudflareError, Result};
