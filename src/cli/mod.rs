//! CLI argument definitions for alloc-book.

use clap::Parser;
use std::path::PathBuf;

/// alloc-book - Split a textbook's pages across lecture sessions.
///
/// Load an allocation file and edit it with `:` commands (`:help` lists them),
/// or start a new one with `--init`.
#[derive(Parser, Debug)]
#[command(name = "alloc-book")]
#[command(author, version, about = "Support planning lectures from a textbook", long_about = None)]
pub struct Cli {
    /// Allocation file to load.
    /// Can also be set via ALLOC_BOOK_FILE environment variable.
    #[arg(env = "ALLOC_BOOK_FILE")]
    pub configfile: Option<PathBuf>,

    /// Interactively create a new allocation file
    #[arg(short = 'i', long = "init")]
    pub init: bool,

    /// Log filter directive for stderr diagnostics (e.g. "debug")
    #[arg(long = "log-level", env = "ALLOC_BOOK_LOG", default_value = crate::logging::DEFAULT_FILTER)]
    pub log_level: String,
}
