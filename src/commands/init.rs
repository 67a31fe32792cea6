//! Interactive setup of a new allocation.
//!
//! Asks for the file name and the book's figures, echoes them back and
//! repeats until the user confirms. Nothing is written here; the new file
//! is created by the first `:w`.

use crate::models::BookConfig;
use crate::{repl, storage};
use crate::{Error, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

/// Run the setup dialogue on `input`/`out`.
///
/// Fails with [`Error::AlreadyExists`] as soon as the chosen file exists.
pub fn initialize<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<(PathBuf, BookConfig)> {
    loop {
        let filename = prompt_filename(input, out)?;
        let path = PathBuf::from(&filename);
        storage::ensure_absent(&path)?;

        let total_pages: i64 = prompt_number(input, out, "total pages in textbook? > ")?;
        let lectures: usize = prompt_number(input, out, "number of lectures? > ")?;
        let prefaces: i64 = prompt_number(input, out, "number of pages for prefaces? > ")?;

        let config = match BookConfig::new(total_pages, lectures, prefaces) {
            Ok(config) => config,
            Err(Error::InvalidConfig(msg)) => {
                writeln!(out, "error: {}", msg)?;
                continue;
            }
            Err(e) => return Err(e),
        };

        writeln!(out)?;
        writeln!(out, "preferences:")?;
        writeln!(out, "  filename     : {}", filename)?;
        writeln!(out, "  total page   : {}", total_pages)?;
        writeln!(out, "  # of lectures: {}", lectures)?;
        writeln!(out, "  # of prefaces: {}", prefaces)?;
        writeln!(out, "-----------------------------------------")?;
        writeln!(out)?;

        let answer = prompt(input, out, "Is this correct? y/n[n]")?;
        if answer.trim().to_lowercase().starts_with('y') {
            tracing::info!(%filename, total_pages, lectures, prefaces, "initialized allocation");
            return Ok((path, config));
        }
    }
}

fn prompt_filename<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<String> {
    loop {
        let filename = normalize_filename(&prompt(input, out, "filename? > ")?);
        if !filename.is_empty() {
            return Ok(filename);
        }
    }
}

/// Trim the name and replace inner spaces with underscores.
pub fn normalize_filename(raw: &str) -> String {
    raw.trim().replace(' ', "_")
}

fn prompt_number<T: FromStr, R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    question: &str,
) -> Result<T> {
    loop {
        let answer = prompt(input, out, question)?;
        match answer.trim().parse() {
            Ok(value) => return Ok(value),
            Err(_) => writeln!(out, "error: '{}' is not a number", answer.trim())?,
        }
    }
}

fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> Result<String> {
    write!(out, "{}", question)?;
    out.flush()?;
    repl::read_line(input)?.ok_or(Error::InputClosed)
}
