use anyhow::Context;
use cfmp_cloud::MaintenanceState;
use cfmp_config::ConfigResolver;
use colored::Colorize;

pub async fn handle(resolver: &ConfigResolver) -> anyhow::Result<()> {
    let page = resolver
        .resolve_page_config()
        .context("Invalid page settings in config file")?;

    let engine = super::connect(resolver).await?;

    println!(
        "{}",
        format!("Deploying maintenance worker for {}...", engine.domain()).blue()
    );

    let outcome = engine.deploy(&page).await?;

    println!(
        "{} Uploaded script {}",
        "✓".green().bold(),
        outcome.script_name.cyan()
    );
    if let Some(route) = &outcome.created_route {
        println!("  Created route {}", route.pattern.cyan());
    }

    let patterns = engine.patterns();
    match engine.status().await? {
        MaintenanceState::Enabled => {
            println!("  Maintenance: on, route {}", patterns.enabled.cyan());
        }
        MaintenanceState::Disabled => {
            println!("  Maintenance: off, route {}", patterns.disabled.cyan());
        }
        MaintenanceState::Unknown => println!(
            "  {} Existing routes match neither {} nor {}",
            "!".yellow().bold(),
            patterns.enabled,
            patterns.disabled
        ),
    }

    Ok(())
}
