use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Application instance info service CLI.
#[derive(Debug, Parser)]
#[command(name = "appo")]
#[command(about = "Tenant-scoped application instance info service", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the instance info HTTP service.
    Serve(ServeArgs),
    /// Validate a configuration file and exit.
    CheckConfig(CheckConfigArgs),
}

#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    #[arg(long, help = "Path to the service configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Override the configured bind address")]
    pub bind: Option<String>,

    #[arg(long, help = "Override the configured port")]
    pub port: Option<u16>,

    #[arg(long, help = "Override the data directory used for storage and logs")]
    pub data_dir: Option<PathBuf>,

    #[arg(long, help = "Verbose stdout logging")]
    pub verbose: bool,

    #[arg(long, help = "Emit stdout logs as JSON")]
    pub log_json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct CheckConfigArgs {
    #[arg(long, default_value = "config.yaml", help = "Configuration file to validate")]
    pub config: PathBuf,
}
