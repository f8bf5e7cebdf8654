//! Command-line interface definitions using clap

use clap::Parser;

/// ipgeo - IP geolocation lookups normalized across providers
#[derive(Parser, Debug)]
#[command(name = "ipgeo")]
#[command(version)]
#[command(about = "IP geolocation microservice with normalized provider responses", long_about = None)]
pub struct Cli {
    /// Configuration file path (default: config.toml)
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Print a sample configuration file and exit
    #[arg(long)]
    pub print_config: bool,
}
