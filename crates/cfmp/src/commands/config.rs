use anyhow::Context;
use cfmp_config::ConfigResolver;
use colored::Colorize;

pub fn handle(resolver: &ConfigResolver, clear_token: bool, print: bool) -> anyhow::Result<()> {
    if clear_token {
        let removed = resolver
            .clear_token()
            .context("Failed to remove API token from credential store")?;
        if removed {
            println!("{} Removed stored API token", "✓".green().bold());
        } else {
            println!("{}", "No stored API token".yellow());
        }
        return Ok(());
    }

    let path = resolver.config_path();
    if resolver.ensure_config_file()? {
        println!("{} Created {}", "✓".green().bold(), path.display());
    }

    if print {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        print!("{}", content);
        return Ok(());
    }

    println!("Config file: {}", path.display().to_string().cyan());
    if let Err(e) = open::that(path) {
        tracing::warn!(error = %e, "Could not open config file");
        println!("Open it in your editor to change the settings.");
    }

    Ok(())
}
