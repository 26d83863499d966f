mod commands;

use cfmp_config::ConfigResolver;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cfmp")]
#[command(
    about = "Toggle a Cloudflare Workers maintenance page for a zone",
    long_about = None
)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "CFMP_CONFIG_PATH")]
    config: Option<PathBuf>,
    /// Never prompt; fail when a value is missing
    #[arg(
        long,
        global = true,
        env = "CFMP_NO_INPUT",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    no_input: bool,
    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the config file if needed and open it
    Config {
        /// Remove the API token from the credential store
        #[arg(long, conflicts_with = "print")]
        clear_token: bool,
        /// Print the config file instead of opening it
        #[arg(long)]
        print: bool,
    },
    /// Upload the maintenance worker and create its route
    Deploy,
    /// Turn maintenance mode on
    Enable,
    /// Turn maintenance mode off
    Disable,
    /// Show whether maintenance mode is on
    Status,
    /// Render the maintenance page locally
    Preview {
        /// Where to write the HTML (default: temp directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Open the rendered page in the browser
        #[arg(long)]
        open: bool,
        /// Print the generated worker script instead of the HTML
        #[arg(long, conflicts_with_all = ["output", "open"])]
        worker: bool,
    },
    /// Show version information
    Version,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Version needs no config
    if matches!(cli.command, Commands::Version) {
        println!("cfmp {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let resolver = ConfigResolver::standard(cli.config, !cli.no_input)?;

    match cli.command {
        Commands::Config { clear_token, print } => {
            commands::config::handle(&resolver, clear_token, print)?;
        }
        Commands::Deploy => {
            commands::deploy::handle(&resolver).await?;
        }
        Commands::Enable => {
            commands::enable::handle(&resolver).await?;
        }
        Commands::Disable => {
            commands::disable::handle(&resolver).await?;
        }
        Commands::Status => {
            commands::status::handle(&resolver).await?;
        }
        Commands::Preview {
            output,
            open,
            worker,
        } => {
            commands::preview::handle(&resolver, output, open, worker)?;
        }
        Commands::Version => {
            unreachable!("Version is handled before config loading");
        }
    }

    Ok(())
}
