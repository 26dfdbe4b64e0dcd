//! Lookbook CLI - product photo studio on the command line

mod commands;
mod key_prompt;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{generate, options, prompts, session};

#[derive(Parser)]
#[command(name = "lookbook")]
#[command(about = "Generate product photo lookbooks with AI image models", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Provider to use instead of the configured one (gemini, mock)
    #[arg(long, global = true)]
    provider: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the prompts a run would send
    Prompts(prompts::PromptsArgs),

    /// Run one batch and save the results
    Generate(generate::GenerateArgs),

    /// Interactive studio session
    Session,

    /// List themes, colors, lighting, lenses and pose chips
    Options,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let provider = cli.provider.as_deref();
    match cli.command {
        Commands::Prompts(args) => prompts::run(args, provider),
        Commands::Generate(args) => generate::run(args, provider),
        Commands::Session => session::run(provider),
        Commands::Options => options::run(),
    }
}
