//! Maintenance route reconciliation for cfmp
//!
//! Maintenance mode is a single Worker route whose pattern is swapped between
//! two canonical values derived from the zone's domain:
//!
//! ```text
//! enabled   *example.com/*              all traffic hits the maintenance Worker
//! disabled  *example.com/maintenance*   only the maintenance sub-path does
//! ```
//!
//! The edge platform is reached through the [`RemoteStateClient`] trait;
//! `cfmp-cloud-cloudflare` implements it over the Cloudflare API and
//! [`memory::InMemoryClient`] keeps everything in process.

pub mod client;
pub mod engine;
pub mod error;
pub mod memory;
pub mod patterns;

pub use client::{RemoteStateClient, Route};
pub use engine::{DeployOutcome, ReconciliationEngine, ZoneTarget};
pub use error::{CloudError, ReconcileError, Result};
pub use patterns::{MaintenanceState, Patterns, derive_script_name};
