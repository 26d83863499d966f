use cfmp_config::ConfigResolver;
use colored::Colorize;

pub async fn handle(resolver: &ConfigResolver) -> anyhow::Result<()> {
    let engine = super::connect(resolver).await?;

    if engine.enable_maintenance().await? {
        println!("{} Maintenance mode enabled", "✓".green().bold());
    } else {
        println!("{}", "Maintenance mode is already enabled".yellow());
    }
    println!("  Route: {}", engine.patterns().enabled.cyan());

    Ok(())
}
