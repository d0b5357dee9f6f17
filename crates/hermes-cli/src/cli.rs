use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "hermes",
    about = "Hermes: a Linked Data Notifications inbox server",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the inbox server until ctrl-c
    Serve(ServeArgs),
    /// Validate configuration and show the identifiers it produces
    CheckConfig(CheckConfigArgs),
    /// List the notifications stored for an inbox
    Inspect(InspectArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Override the configured listen address
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Override the configured database path
    #[arg(long)]
    pub storage: Option<PathBuf>,
}

#[derive(Args)]
pub struct CheckConfigArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Host used to render the sample identifiers
    #[arg(long, default_value = "example.org")]
    pub host: String,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Database file to read
    #[arg(long)]
    pub storage: PathBuf,
    pub inbox: String,
    /// Start after this notification id
    #[arg(long)]
    pub after: Option<String>,
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
}
