use cfmp_cloud::MaintenanceState;
use cfmp_config::ConfigResolver;
use colored::Colorize;

pub async fn handle(resolver: &ConfigResolver) -> anyhow::Result<()> {
    let engine = super::connect(resolver).await?;
    let state = engine.status().await?;

    let label = match state {
        MaintenanceState::Enabled => state.to_string().red().bold(),
        MaintenanceState::Disabled => state.to_string().green().bold(),
        MaintenanceState::Unknown => state.to_string().yellow().bold(),
    };

    println!("Zone:        {}", engine.domain().cyan());
    println!("Script:      {}", engine.script_name().cyan());
    println!("Maintenance: {}", label);

    if state == MaintenanceState::Unknown {
        println!();
        println!(
            "No route matches {} or {}. Run 'cfmp deploy' first.",
            engine.patterns().enabled,
            engine.patterns().disabled
        );
    }

    Ok(())
}
