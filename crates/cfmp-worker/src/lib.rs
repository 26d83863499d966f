//! Maintenance page and Worker script generation for cfmp
//!
//! - [`template`]: renders the maintenance HTML from a [`PageConfig`]
//! - [`script`]: wraps the HTML into a deployable Worker [`ScriptBundle`]
//!
//! ```ignore
//! use cfmp_worker::{PageConfig, build_bundle};
//!
//! let bundle = build_bundle(&PageConfig::default())?;
//! println!("{}", bundle.main_source().unwrap_or_default());
//! ```

pub mod error;
pub mod model;
pub mod script;
pub mod template;

pub use error::{RenderError, Result};
pub use model::PageConfig;
pub use script::{
    COMPATIBILITY_DATE, MAIN_MODULE, MODULE_CONTENT_TYPE, ScriptBundle, ScriptMetadata,
    build_bundle, generate_worker_script,
};
pub use template::{TemplateRenderer, render};
