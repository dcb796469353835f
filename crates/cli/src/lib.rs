pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "treatmatch",
    about = "Treatmatch operator CLI",
    long_about = "Validate treatment catalogs, compute package recommendations from wizard answers, and inspect configuration.",
    after_help = "Examples:\n  treatmatch recommend --steps steps.json\n  treatmatch catalog --catalog packages.json\n  treatmatch doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Score the catalog against recorded wizard steps and print the shortlist")]
    Recommend {
        #[arg(long, help = "JSON file with an array of wizard step records")]
        steps: PathBuf,
        #[arg(long, help = "JSON catalog file (defaults to config, then the demo catalog)")]
        catalog: Option<PathBuf>,
    },
    #[command(about = "Validate a catalog and summarize packages per price tier")]
    Catalog {
        #[arg(long, help = "JSON catalog file (defaults to config, then the demo catalog)")]
        catalog: Option<PathBuf>,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution"
    )]
    Config,
    #[command(about = "Validate config, catalog loading, and a fallback recommendation run")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Recommend { steps, catalog } => {
            commands::recommend::run(&steps, catalog.as_deref())
        }
        Command::Catalog { catalog } => commands::catalog::run(catalog.as_deref()),
        Command::Config => commands::config::run(),
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
