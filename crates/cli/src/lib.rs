pub mod commands;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use recmatch_core::config::{AppConfig, LoadOptions};

use crate::commands::recommend::RecommendArgs;

#[derive(Debug, Parser)]
#[command(
    name = "recmatch",
    about = "Recmatch relevance engine CLI",
    long_about = "Match category preferences against candidate recommendations, backfill from the default catalog, and inspect matching decisions.",
    after_help = "Examples:\n  recmatch recommend --preferences hvac,lighting --candidates candidates.json\n  recmatch explain --preference renewable --label \"Electronics > Renewable Energy\"\n  recmatch catalog --preference smart_home\n  recmatch config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a recmatch.toml config file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Compose recommendations for a comma-separated preference list")]
    Recommend {
        #[arg(long, help = "Comma-separated preference keys, e.g. hvac,lighting")]
        preferences: String,
        #[arg(long, help = "JSON file holding an array of candidate recommendations")]
        candidates: Option<PathBuf>,
        #[arg(long, help = "Pretty-print the JSON output")]
        pretty: bool,
    },
    #[command(about = "Show how a single preference is evaluated against a single label")]
    Explain {
        #[arg(long)]
        preference: String,
        #[arg(long)]
        label: String,
    },
    #[command(about = "Print the default recommendation catalog")]
    Catalog {
        #[arg(long, help = "Only print entries for this preference")]
        preference: Option<String>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = LoadOptions { config_path: cli.config, ..LoadOptions::default() };

    if let Ok(config) = AppConfig::load(options.clone()) {
        logging::init(&config);
    }

    let result = match cli.command {
        Command::Recommend { preferences, candidates, pretty } => {
            commands::recommend::run(options, &RecommendArgs { preferences, candidates, pretty })
        }
        Command::Explain { preference, label } => {
            commands::explain::run(options, &preference, &label)
        }
        Command::Catalog { preference } => commands::catalog::run(preference.as_deref()),
        Command::Config => commands::config::run(options),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
