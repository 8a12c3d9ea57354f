//! Command-line argument definitions for the Threadmap CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, centering overrides, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Threadmap layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input scene file (TOML)
    #[arg(help = "Path to the input scene file")]
    pub input: String,

    /// Path to the output layout report (TOML)
    #[arg(short, long, default_value = "layout.toml")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Center parents over their children, overriding the configuration
    #[arg(long)]
    pub center_parents: bool,

    /// Number of centering rounds, overriding the configuration
    #[arg(long)]
    pub centering_passes: Option<usize>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
