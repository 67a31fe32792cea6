//! The interactive read-execute loop.

use crate::Result;
use crate::commands::{Command, FINISHED, Session};
use std::io::{BufRead, Write};

/// Prompt printed before every read.
pub const PROMPT: &str = r"\(^o^)/> ";

/// Read commands from `input` until the session quits or input ends.
///
/// Recoverable errors are printed and the loop continues; anything else is
/// returned to the caller.
pub fn run<R: BufRead, W: Write>(session: &mut Session, input: &mut R, out: &mut W) -> Result<()> {
    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let Some(line) = read_line(input)? else {
            writeln!(out)?;
            break;
        };

        let outcome = match Command::parse(&line).and_then(|command| match command {
            Some(command) => session.execute(&command).map(Some),
            None => Ok(None),
        }) {
            Ok(Some(outcome)) => outcome,
            Ok(None) => continue,
            Err(e) if e.is_recoverable() => {
                tracing::debug!(input = line.trim(), error = %e, "command failed");
                writeln!(out, "error: {}", e)?;
                continue;
            }
            Err(e) => return Err(e),
        };

        if let Some(output) = &outcome.output {
            writeln!(out, "{}", output)?;
        }
        if let Some(warning) = &outcome.warning {
            writeln!(out, "{}", warning)?;
        }
        if outcome.quit {
            break;
        }
    }

    writeln!(out, "{}", FINISHED)?;
    Ok(())
}

/// Read one line, replacing bytes that are not valid UTF-8.
///
/// Returns `None` at end of input.
pub fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut buf = Vec::new();
    if input.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookConfig;
    use std::io::Cursor;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn run_script(session: &mut Session, script: &str) -> String {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        run(session, &mut input, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn session() -> Session {
        Session::new(
            PathBuf::from("book.json"),
            BookConfig::new(100, 4, 10).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_quit_ends_loop() {
        let mut s = session();
        let out = run_script(&mut s, ":q\n:1\n");
        assert!(out.ends_with(&format!("{}\n", FINISHED)));
        assert!(!out.contains("lect01"));
    }

    #[test]
    fn test_end_of_input_finishes() {
        let mut s = session();
        let out = run_script(&mut s, ":1\n");
        assert!(out.contains("  ( )lect01  pp. 11 --  33 ( 23 pages)"));
        assert!(out.ends_with(&format!("{}\n", FINISHED)));
    }

    #[test]
    fn test_non_commands_ignored() {
        let mut s = session();
        let out = run_script(&mut s, "hello\n:bogus\n:q\n");
        assert_eq!(out, format!("{p}{p}{p}{}\n", FINISHED, p = PROMPT));
    }

    #[test]
    fn test_bad_argument_keeps_session() {
        let mut s = session();
        let out = run_script(&mut s, ":2 r many\n:9\n:2 r 15\n:q\n");
        assert!(out.contains("error: Invalid argument: 'many' is not a number"));
        assert!(out.contains("error: Invalid argument: lecture 9 is out of range (1-4)"));
        assert_eq!(s.config().confirmed[1], Some(15));
    }

    #[test]
    fn test_invalid_utf8_line_is_ignored() {
        let mut s = session();
        let mut input = Cursor::new(b":2 r 15\n\xff\xfe\n:2\n:q\n".to_vec());
        let mut out = Vec::new();
        run(&mut s, &mut input, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("  (*)lect02  pp. 36 --  50 ( 15 pages)"));
        assert!(out.ends_with(&format!("{}\n", FINISHED)));
    }

    #[test]
    fn test_huge_pin_reported_and_session_continues() {
        let mut s = session();
        let out = run_script(&mut s, ":1 r 9223372036854775807\n:%\n:q\n");
        assert!(out.contains("error: page count out of range"));
        assert!(out.contains("  ( )lect01  pp. 11 --  33 ( 23 pages)"));
        assert_eq!(s.config().confirmed, vec![None; 4]);
    }

    #[test]
    fn test_write_failure_does_not_quit() {
        let dir = TempDir::new().unwrap();
        let mut s = Session::new(
            dir.path().join("missing").join("book.json"),
            BookConfig::new(100, 4, 10).unwrap(),
        )
        .unwrap();
        let out = run_script(&mut s, ":wq\n:1\n:q\n");
        assert!(out.contains("error: IO error"));
        assert!(out.contains("lect01"));
    }
}
