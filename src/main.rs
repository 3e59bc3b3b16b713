use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;

#[derive(Parser)]
#[command(name = "primer")]
#[command(
    version,
    about = "Budgeted project-context generator for LLM coding assistants"
)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root to summarize (defaults to the current directory)
    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the context document for the project
    Generate {
        /// Token budget override (1000-100000); defaults to the config value
        #[arg(long)]
        budget: Option<usize>,

        /// Build the document without persisting it
        #[arg(long)]
        dry_run: bool,

        /// Print the document itself instead of the summary
        #[arg(long)]
        stdout: bool,

        /// Emit the result metadata as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let project_dir = match &cli.project_dir {
        Some(dir) => dir
            .canonicalize()
            .context("Failed to resolve project directory")?,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    match &cli.command {
        Commands::Generate {
            budget,
            dry_run,
            stdout,
            json,
        } => cmd::cmd_generate(&project_dir, *budget, *dry_run, *stdout, *json),
        Commands::Config => cmd::cmd_config(&project_dir),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;
    let default = if verbose { "primer=debug" } else { "primer=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
