//! Maintenance page model

use serde::{Deserialize, Serialize};

/// Settings that drive the maintenance page and the Worker response
///
/// Resolved once per invocation from the `PAGE` section of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageConfig {
    /// HTTP status returned by the Worker (e.g. 503)
    pub status_code: u16,

    pub title: String,

    pub message: String,

    /// ISO-8601 timestamp shown on the page when set
    pub expected_completion_iso: Option<String>,

    /// Value of the `Retry-After` header
    pub retry_after_seconds: u64,

    pub contact_email: String,

    /// Link to an external status page
    pub status_page: Option<String>,

    /// Query parameter value that skips the maintenance response
    pub bypass_value: Option<String>,
}

impl PageConfig {
    /// Bypass value, treating an empty string as unset
    pub fn bypass(&self) -> Option<&str> {
        self.bypass_value.as_deref().filter(|v| !v.is_empty())
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            status_code: 503,
            title: "We'll Be Right Back!".to_string(),
            message: "Our site is currently undergoing scheduled maintenance. \
                      We're working hard to bring you a better experience. \
                      Thank you for your patience and understanding."
                .to_string(),
            expected_completion_iso: None,
            retry_after_seconds: 60 * 60,
            contact_email: "contact@example.com".to_string(),
            status_page: None,
            bypass_value: None,
        }
    }
}
