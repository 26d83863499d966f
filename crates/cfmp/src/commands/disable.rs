use cfmp_config::ConfigResolver;
use colored::Colorize;

pub async fn handle(resolver: &ConfigResolver) -> anyhow::Result<()> {
    let engine = super::connect(resolver).await?;

    if engine.disable_maintenance().await? {
        println!("{} Maintenance mode disabled", "✓".green().bold());
    } else {
        println!("{}", "Maintenance mode is already disabled".yellow());
    }
    println!("  Route: {}", engine.patterns().disabled.cyan());

    Ok(())
}
