use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;

use config::CodaConfig;

#[derive(Parser)]
#[command(name = "coda", about = "LLM-assisted thematic annotation and evaluation")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate a survey-response file with a model
    Annotate(commands::annotate::AnnotateArgs),
    /// Score an annotated file against human ground truth
    Eval(commands::eval::EvalArgs),
    /// Inspect or clear the run cache
    Cache(commands::cache::CacheArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = CodaConfig::load()?;

    match cli.command {
        Commands::Annotate(args) => commands::annotate::run(args, config).await,
        Commands::Eval(args) => commands::eval::run(args, config),
        Commands::Cache(args) => commands::cache::run(args),
    }
}
