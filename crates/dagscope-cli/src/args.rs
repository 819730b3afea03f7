//! Command-line argument definitions for the Dagscope CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the recorded execution result to load,
//! output and configuration paths, which node to select and logging
//! verbosity.

use clap::Parser;

/// Command-line arguments for the Dagscope pipeline DAG viewer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a recorded execution result (JSON)
    #[arg(help = "Path to the recorded execution result")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Sensitive columns of the bias check whose problem nodes are highlighted
    #[arg(long, value_delimiter = ',')]
    pub sensitive_columns: Vec<String>,

    /// Result kinds shown for a selected node (default: all)
    #[arg(long, value_delimiter = ',')]
    pub enable: Vec<String>,

    /// Select the node with this id and print its details as JSON
    #[arg(long, conflicts_with = "select_point")]
    pub select_node: Option<String>,

    /// Select the node at scene coordinates `x,y` and print its details as JSON
    #[arg(long, allow_hyphen_values = true)]
    pub select_point: Option<String>,

    /// Print the check summary table as JSON
    #[arg(long)]
    pub summary: bool,
}
