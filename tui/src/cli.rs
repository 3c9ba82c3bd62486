//! Command-line arguments for the terminal host

use std::path::PathBuf;

use clap::Parser;

/// Vivian - a timed animation-set character on a terminal stage
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "vivian-tui")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "VIVIAN_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,
}
