mod cli;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    dispatch(cli.command)
}

fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Members { manifest, filter } => cli::members::run(&manifest, &filter),
        Commands::Check {
            manifest,
            tokens,
            scope,
        } => cli::check::run(&manifest, &tokens, scope.as_deref()),
        Commands::Encode {
            manifest,
            name,
            scope,
        } => cli::encode::run(&manifest, &name, scope.as_deref()),
    }
}
