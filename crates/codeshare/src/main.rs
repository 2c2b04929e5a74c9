//! codeshare CLI - share code snippets by link
//!
//! This is the main entry point for the codeshare command-line interface.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize rustls crypto provider before any TLS operations
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Version(args) => commands::version::run(args),
        Commands::Config(args) => commands::config::run(args, cli.config.as_deref()),
        Commands::Share(args) => commands::share::run(args, cli.config.as_deref()).await,
        Commands::Load(args) => commands::load::run(args, cli.config.as_deref()).await,
        Commands::Link(args) => commands::link::run(args, cli.config.as_deref()),
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            // Retry warnings show at the default level
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
