use anyhow::Context;
use cfmp_config::ConfigResolver;
use colored::Colorize;
use std::path::PathBuf;

const DEFAULT_PREVIEW_FILE: &str = "cfmp-preview.html";

pub fn handle(
    resolver: &ConfigResolver,
    output: Option<PathBuf>,
    open_browser: bool,
    worker: bool,
) -> anyhow::Result<()> {
    let page = resolver
        .resolve_page_config()
        .context("Invalid page settings in config file")?;

    if worker {
        let bundle = cfmp_worker::build_bundle(&page)?;
        let source = bundle
            .main_source()
            .context("Generated worker is not valid UTF-8")?;
        print!("{}", source);
        return Ok(());
    }

    let html = cfmp_worker::render(&page)?;
    let path = output.unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_PREVIEW_FILE));
    std::fs::write(&path, html)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "{} Wrote preview to {}",
        "✓".green().bold(),
        path.display().to_string().cyan()
    );

    if open_browser {
        open::that(&path).context("Failed to open the preview in a browser")?;
    }

    Ok(())
}
