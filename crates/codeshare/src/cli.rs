//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// codeshare - share code snippets by link
#[derive(Parser, Debug)]
#[command(name = "codeshare")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a runtime.yaml layered over ~/.codeshare/runtime.yaml
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version(VersionArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Share a file (or stdin) and print its link
    Share(ShareArgs),

    /// Load a shared snippet
    Load(LoadArgs),

    /// Print the share link for a snippet id
    Link(LinkArgs),
}

// Version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Config commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved runtime configuration
    Show(ConfigShowArgs),
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Share command
#[derive(Args, Debug)]
pub struct ShareArgs {
    /// File to share (reads stdin when omitted)
    pub file: Option<Utf8PathBuf>,

    /// Language recorded with the snippet
    #[arg(short, long)]
    pub language: Option<String>,
}

// Load command
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Snippet id or share link
    #[arg(value_name = "ID|LINK")]
    pub snippet: String,

    /// Write the snippet to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<Utf8PathBuf>,
}

// Link command
#[derive(Args, Debug)]
pub struct LinkArgs {
    /// Snippet id
    pub id: String,
}
