use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod closure;
mod core;
mod error;
mod parsing;
mod reconcile;
mod rules;
mod store;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("hymnlink=debug,info")
    } else {
        EnvFilter::new("hymnlink=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Reconcile(args) => {
            cli::reconcile::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Check(args) => {
            cli::check::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Translate(args) => {
            cli::translate::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
