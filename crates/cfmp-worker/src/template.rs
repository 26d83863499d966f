//! Maintenance page rendering
//!
//! The HTML template is compiled into the binary and rendered with Tera.
//! Optional page fields are guarded in the template, so an unset value is
//! left out of the document rather than printed.

use crate::error::{RenderError, Result};
use crate::model::PageConfig;
use chrono::{DateTime, Utc};
use tera::{Context, Tera};
use tracing::debug;

const TEMPLATE_NAME: &str = "maintenance.html";
const TEMPLATE_SOURCE: &str = include_str!("../templates/maintenance.html.tera");

/// Renders the maintenance HTML document
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Compile the bundled template
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, TEMPLATE_SOURCE)
            .map_err(|e| RenderError::Template(extract_tera_error_detail(&e)))?;
        Ok(Self { tera })
    }

    /// Render the page for the given configuration
    pub fn render(&self, page: &PageConfig) -> Result<String> {
        let context = build_context(page);
        let html = self
            .tera
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| RenderError::Template(extract_tera_error_detail(&e)))?;

        debug!(bytes = html.len(), "Rendered maintenance page");
        Ok(html)
    }
}

/// Render the page with a freshly compiled template
pub fn render(page: &PageConfig) -> Result<String> {
    TemplateRenderer::new()?.render(page)
}

fn build_context(page: &PageConfig) -> Context {
    let expected_completion = page
        .expected_completion_iso
        .as_deref()
        .filter(|v| !v.is_empty());
    let status_page = page.status_page.as_deref().filter(|v| !v.is_empty());

    let mut context = Context::new();
    context.insert("status_code", &page.status_code);
    context.insert("title", &page.title);
    context.insert("message", &page.message);
    context.insert("expected_completion", &expected_completion);
    context.insert(
        "expected_completion_display",
        &expected_completion.and_then(format_completion),
    );
    context.insert("retry_after_seconds", &page.retry_after_seconds);
    context.insert("contact_email", &page.contact_email);
    context.insert("status_page", &status_page);
    context
}

/// Human readable UTC rendering of an RFC 3339 timestamp
fn format_completion(iso: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(iso)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).format("%B %-d, %Y %H:%M UTC").to_string())
}

fn extract_tera_error_detail(e: &tera::Error) -> String {
    use std::error::Error;

    let mut details = vec![e.to_string()];
    let mut source = e.source();
    while let Some(err) = source {
        details.push(err.to_string());
        source = err.source();
    }
    details.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_required_fields() {
        let page = PageConfig {
            title: "Down for upgrades".to_string(),
            message: "Back soon".to_string(),
            contact_email: "ops@example.com".to_string(),
            ..Default::default()
        };

        let html = render(&page).unwrap();

        assert!(html.contains("<title>Down for upgrades</title>"));
        assert!(html.contains("Back soon"));
        assert!(html.contains("mailto:ops@example.com"));
        assert!(html.contains("as soon as possible"));
    }

    #[test]
    fn test_render_optional_fields_absent() {
        let page = PageConfig {
            expected_completion_iso: None,
            status_page: None,
            ..Default::default()
        };

        let html = render(&page).unwrap();

        assert!(!html.contains("undefined"));
        assert!(!html.contains("None"));
        assert!(!html.contains("null"));
        assert!(!html.contains("status page"));
        assert!(!html.contains("<time"));
    }

    #[test]
    fn test_render_expected_completion() {
        let page = PageConfig {
            expected_completion_iso: Some("2028-01-01T09:30:00Z".to_string()),
            ..Default::default()
        };

        let html = render(&page).unwrap();

        assert!(html.contains(r#"datetime="2028-01-01T09:30:00Z""#));
        assert!(html.contains("January 1, 2028 09:30 UTC"));
    }

    #[test]
    fn test_render_unparseable_completion_shown_verbatim() {
        let page = PageConfig {
            expected_completion_iso: Some("tomorrow morning".to_string()),
            ..Default::default()
        };

        let html = render(&page).unwrap();

        assert!(html.contains(">tomorrow morning</time>"));
    }

    #[test]
    fn test_render_status_page_link() {
        let page = PageConfig {
            status_page: Some("https://status.example.com".to_string()),
            ..Default::default()
        };

        let html = render(&page).unwrap();

        assert!(html.contains("status page</a>"));
        assert!(html.contains("status.example.com"));
    }

    #[test]
    fn test_render_escapes_page_text() {
        let page = PageConfig {
            title: "Tom & Jerry's <Shop>".to_string(),
            status_page: Some("https://status.example.com/a?b=1&c=2".to_string()),
            ..Default::default()
        };

        let html = render(&page).unwrap();

        assert!(html.contains("<title>Tom &amp; Jerry&#x27;s &lt;Shop&gt;</title>"));
        assert!(html.contains(
            r#"href="https:&#x2F;&#x2F;status.example.com&#x2F;a?b=1&amp;c=2""#
        ));
        assert!(!html.contains("Jerry's"));
        assert!(!html.contains("<Shop>"));
    }

    #[test]
    fn test_renderer_is_reusable() {
        let renderer = TemplateRenderer::new().unwrap();
        let page = PageConfig::default();

        assert_eq!(renderer.render(&page).unwrap(), renderer.render(&page).unwrap());
    }
}
