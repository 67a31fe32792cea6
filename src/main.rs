//! alloc-book CLI - Split a textbook's pages across lecture sessions.

use alloc_book::cli::Cli;
use alloc_book::commands::{Session, init};
use alloc_book::{Error, logging, repl};
use clap::Parser;
use std::io;
use std::process;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    logging::init_logging(&cli.log_level)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();

    let mut session = if cli.init {
        let (path, config) = init::initialize(&mut input, &mut out)?;
        Session::new(path, config)?
    } else {
        let path = cli.configfile.ok_or(Error::MissingConfigfile)?;
        Session::open(&path)?
    };

    repl::run(&mut session, &mut input, &mut out)
}
