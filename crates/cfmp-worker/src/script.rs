//! Worker script synthesis
//!
//! Builds the ES module Worker that answers every request with the rendered
//! maintenance page, and packages it with the upload metadata expected by the
//! Workers script API. Output is deterministic: the same [`PageConfig`]
//! always yields a byte-identical [`ScriptBundle`].

use crate::error::{RenderError, Result};
use crate::model::PageConfig;
use crate::template::TemplateRenderer;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use tracing::info;

/// File name of the Worker entry module
pub const MAIN_MODULE: &str = "worker.js";

/// Workers compatibility date pinned for the generated script
pub const COMPATIBILITY_DATE: &str = "2025-08-28";

/// Content type of ES module parts in the upload form
pub const MODULE_CONTENT_TYPE: &str = "application/javascript+module";

/// Query parameter checked against the configured bypass value
pub const BYPASS_PARAM: &str = "bypass";

/// Upload metadata for the Workers script API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptMetadata {
    pub main_module: String,
    pub compatibility_date: String,
}

/// A deployable Worker: metadata plus its module files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBundle {
    pub metadata: ScriptMetadata,
    pub files: BTreeMap<String, Vec<u8>>,
}

impl ScriptBundle {
    /// Source text of the entry module
    pub fn main_source(&self) -> Option<&str> {
        self.files
            .get(&self.metadata.main_module)
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    /// Metadata serialized as the `metadata` form part
    pub fn metadata_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.metadata)?)
    }
}

/// Render the page and package the Worker for upload
pub fn build_bundle(page: &PageConfig) -> Result<ScriptBundle> {
    let html = TemplateRenderer::new()?.render(page)?;
    let source = generate_worker_script(
        &html,
        page.status_code,
        page.retry_after_seconds,
        page.bypass(),
    )?;

    info!(
        status_code = page.status_code,
        bypass = page.bypass().is_some(),
        bytes = source.len(),
        "Synthesized maintenance worker"
    );

    let mut files = BTreeMap::new();
    files.insert(MAIN_MODULE.to_string(), source.into_bytes());

    Ok(ScriptBundle {
        metadata: ScriptMetadata {
            main_module: MAIN_MODULE.to_string(),
            compatibility_date: COMPATIBILITY_DATE.to_string(),
        },
        files,
    })
}

/// Generate the Worker module source
///
/// The bypass check is only emitted for a non-empty value; an empty check
/// would let every request through.
pub fn generate_worker_script(
    html: &str,
    status_code: u16,
    retry_after_seconds: u64,
    bypass_value: Option<&str>,
) -> Result<String> {
    if !(200..=599).contains(&status_code) {
        return Err(RenderError::InvalidPage(format!(
            "status code {} is outside 200..=599",
            status_code
        )));
    }

    let mut script = String::with_capacity(html.len() + 512);
    script.push_str("export default {\n");
    script.push_str("  async fetch(request) {\n");

    if let Some(value) = bypass_value.filter(|v| !v.is_empty()) {
        let literal = serde_json::to_string(value)?;
        script.push_str("    const url = new URL(request.url);\n");
        // write! to a String cannot fail
        let _ = writeln!(
            script,
            "    if (url.searchParams.get(\"{}\") === {}) {{",
            BYPASS_PARAM, literal
        );
        script.push_str("      return fetch(request);\n");
        script.push_str("    }\n\n");
    }

    let _ = writeln!(
        script,
        "    return new Response(`{}`, {{",
        escape_template_literal(html)
    );
    let _ = writeln!(script, "      status: {},", status_code);
    script.push_str("      headers: {\n");
    script.push_str("        \"content-type\": \"text/html;charset=UTF-8\",\n");
    let _ = writeln!(script, "        \"Retry-After\": \"{}\",", retry_after_seconds);
    script.push_str("      },\n");
    script.push_str("    });\n");
    script.push_str("  },\n");
    script.push_str("};\n");

    Ok(script)
}

/// Escape text for embedding in a JS template literal
fn escape_template_literal(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}
