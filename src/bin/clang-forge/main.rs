//! clang-forge CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.global.verbose {
        EnvFilter::new("clang_forge=debug")
    } else if cli.global.quiet {
        EnvFilter::new("clang_forge=warn")
    } else {
        EnvFilter::new("clang_forge=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let global = &cli.global;
    match cli.command {
        Commands::Source(args) => commands::source::execute(global, args),
        Commands::Build(args) => commands::build::execute(global, args),
        Commands::Package(args) => commands::package::execute(global, args),
        Commands::Run(args) => commands::run::execute(global, args),
        Commands::Patch(args) => commands::patch::execute(global, args),
        Commands::Info(args) => commands::info::execute(global, args),
        Commands::Import(args) => commands::import::execute(global, args),
        Commands::Clean(args) => commands::clean::execute(global, args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
