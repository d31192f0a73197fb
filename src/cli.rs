use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agriweather", version, about = "Weather outlook and crop alerts for farmers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Re-run interactive setup
    Init,
    /// Validate config and test connections
    Check,
    /// Look up a place by name and print its forecast
    Lookup {
        /// Place name, e.g. "Nashik"
        query: String,

        /// Print the session state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the forecast for the device position
    Locate {
        /// Print the session state as JSON
        #[arg(long)]
        json: bool,
    },
}
