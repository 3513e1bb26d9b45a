pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "tidybook",
    about = "Tidybook operator CLI",
    long_about = "Operate Tidybook migrations, catalog seeding, price estimation, config inspection, and readiness checks.",
    after_help = "Examples:\n  tidybook doctor --json\n  tidybook estimate --service-type regular --property-size medium\n  tidybook seed"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic catalog fixture and verify it")]
    Seed,
    #[command(about = "List the active service and add-on catalogs")]
    Catalog,
    #[command(about = "Compute a staffing recommendation and price estimate without a database")]
    Estimate(commands::estimate::EstimateArgs),
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate configuration and database connectivity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Catalog => commands::catalog::run(),
        Command::Estimate(args) => commands::estimate::run(&args),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
