//! Command implementations for the alloc-book interpreter.
//!
//! A line typed at the prompt is parsed into a [`Command`] and executed
//! against a [`Session`]. Every execution recomputes the working allocation
//! first, so the displayed pages always follow the pinned state.
//!
//! - `init` - Interactive creation of a new allocation

pub mod init;

use crate::allocation::{self, Balance};
use crate::models::{Allocation, BookConfig};
use crate::storage;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Message printed when the session ends.
pub const FINISHED: &str = "-*- alloc_book has been finished -*-";

/// A parsed `:` command. Lecture numbers are 1-based as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `:n`
    Show { lecture: usize },
    /// `:%`
    ShowAll,
    /// `:n r [m]`
    Replace { lecture: usize, pages: Option<i64> },
    /// `:n dd`
    Delete { lecture: usize },
    /// `:n e [p]` and `:n en [p]`
    EndAt {
        lecture: usize,
        page: Option<i64>,
        keep_next: bool,
    },
    /// `:w`
    Write,
    /// `:q`
    Quit,
    /// `:wq`
    WriteQuit,
    /// `:help`
    Help,
}

impl Command {
    /// Parse one input line.
    ///
    /// Returns `Ok(None)` for lines that are not commands and for unknown
    /// commands; both are ignored by the interpreter.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if !line.starts_with(':') {
            return Ok(None);
        }
        let normalized = line.replace(',', " ");
        let tokens: Vec<&str> = normalized.split_whitespace().collect();
        let Some(head) = tokens.first() else {
            return Ok(None);
        };

        let command = match *head {
            ":%" => Self::ShowAll,
            ":w" => Self::Write,
            ":q" => Self::Quit,
            ":wq" => Self::WriteQuit,
            ":help" => Self::Help,
            head if head[1..].starts_with(|c: char| c.is_ascii_digit()) => {
                let lecture = parse_lecture(&head[1..])?;
                let arg = tokens.get(2).copied();
                match tokens.get(1).copied() {
                    None => Self::Show { lecture },
                    Some("r") => Self::Replace {
                        lecture,
                        pages: arg.map(parse_value).transpose()?,
                    },
                    Some("dd") => Self::Delete { lecture },
                    Some("e") => Self::EndAt {
                        lecture,
                        page: arg.map(parse_value).transpose()?,
                        keep_next: false,
                    },
                    Some("en") => Self::EndAt {
                        lecture,
                        page: arg.map(parse_value).transpose()?,
                        keep_next: true,
                    },
                    Some(_) => return Ok(None),
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(command))
    }

    /// Whether the command's output should carry allocation warnings.
    fn reports_balance(&self) -> bool {
        !matches!(
            self,
            Self::Write | Self::Quit | Self::WriteQuit | Self::Help
        )
    }
}

fn parse_lecture(token: &str) -> Result<usize> {
    token
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("'{}' is not a lecture number", token)))
}

fn parse_value(token: &str) -> Result<i64> {
    token
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("'{}' is not a number", token)))
}

/// Command results that can be formatted for humans.
pub trait Output {
    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// One lecture's line in the page list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LectureSummary {
    pub number: usize,
    pub pinned: bool,
    pub start: i64,
    pub end: i64,
    pub pages: i64,
}

impl Output for LectureSummary {
    fn to_human(&self) -> String {
        let mark = if self.pinned { '*' } else { ' ' };
        format!(
            "  ({})lect{:02}  pp.{:3} -- {:3} ({:3} pages)",
            mark,
            self.number,
            self.start,
            self.end,
            self.pages
        )
    }
}

/// Every lecture's line, under a header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageList {
    pub lectures: Vec<LectureSummary>,
}

impl Output for PageList {
    fn to_human(&self) -> String {
        let mut lines = vec!["---- page list -----".to_string()];
        lines.extend(self.lectures.iter().map(Output::to_human));
        lines.join("\n")
    }
}

/// Confirmation of a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved {
    pub path: PathBuf,
}

impl Output for Saved {
    fn to_human(&self) -> String {
        format!("saved: {}", self.path.display())
    }
}

/// The command summary printed by `:help`.
pub struct Help;

impl Output for Help {
    fn to_human(&self) -> String {
        [
            "# here \"n\" is the lecture you want to show/modify",
            ":help     ... display this manual",
            ":%        ... show all lectures",
            ":n        ... show lecture n",
            ":n, r, m  ... pin lecture n to m pages",
            ":n, r     ... pin lecture n to its current pages",
            ":n, dd    ... unpin lecture n",
            ":n, e, p  ... pin lecture n so that it ends at page p",
            ":n, e     ... pin lecture n at its current end page",
            ":n, en, p ... like e, keeping the end page of lecture n+1",
            ":w        ... save file",
            ":q        ... quit alloc_book",
            ":wq       ... save file and quit alloc_book",
        ]
        .join("\n")
    }
}

/// Result of executing one command.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Text to print, if any
    pub output: Option<String>,
    /// Allocation problem to report after the output
    pub warning: Option<String>,
    /// Whether the session ends after this command
    pub quit: bool,
}

impl Outcome {
    fn show(output: &impl Output) -> Self {
        Self {
            output: Some(output.to_human()),
            ..Self::default()
        }
    }
}

/// An editing session over one allocation file.
#[derive(Debug, Clone)]
pub struct Session {
    path: PathBuf,
    config: BookConfig,
    allocation: Allocation,
}

impl Session {
    pub fn new(path: PathBuf, config: BookConfig) -> Result<Self> {
        allocation::check(&config)?;
        let allocation = allocation::recompute(&config)?;
        Ok(Self {
            path,
            config,
            allocation,
        })
    }

    /// Open a session on an existing allocation file.
    pub fn open(path: &Path) -> Result<Self> {
        let config = storage::load(path)?;
        Self::new(path.to_path_buf(), config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    pub fn allocation(&self) -> &Allocation {
        &self.allocation
    }

    /// Rederive the working allocation and report how it balances.
    pub fn recompute(&mut self) -> Result<Balance> {
        self.allocation = allocation::recompute(&self.config)?;
        let balance = allocation::balance(&self.config, &self.allocation)?;
        if balance != Balance::Exact {
            tracing::warn!(?balance, "allocation does not match available pages");
        }
        Ok(balance)
    }

    /// Summary line for lecture `index` (0-based).
    pub fn summary(&self, index: usize) -> Result<LectureSummary> {
        let (start, end) = allocation::page_range(&self.allocation, self.config.prefaces, index)?;
        Ok(LectureSummary {
            number: index + 1,
            pinned: self.config.is_pinned(index),
            start,
            end,
            pages: self.allocation.get(index),
        })
    }

    pub fn page_list(&self) -> Result<PageList> {
        let lectures = (0..self.config.lectures())
            .map(|i| self.summary(i))
            .collect::<Result<Vec<_>>>()?;
        Ok(PageList { lectures })
    }

    /// Write the pinned state back to the session's file.
    pub fn save(&self) -> Result<Saved> {
        storage::save(&self.path, &self.config)?;
        Ok(Saved {
            path: self.path.clone(),
        })
    }

    /// Execute one command.
    pub fn execute(&mut self, command: &Command) -> Result<Outcome> {
        self.recompute()?;
        let prefaces = self.config.prefaces;

        let mut outcome = match command {
            Command::Show { lecture } => {
                let index = self.config.lecture_index(*lecture)?;
                Outcome::show(&self.summary(index)?)
            }
            Command::ShowAll => Outcome::show(&self.page_list()?),
            Command::Replace { lecture, pages } => {
                let index = self.config.lecture_index(*lecture)?;
                let pages = pages.unwrap_or_else(|| self.allocation.get(index));
                allocation::pin(&mut self.config, index, pages)?;
                Outcome::default()
            }
            Command::Delete { lecture } => {
                let index = self.config.lecture_index(*lecture)?;
                allocation::unpin(&mut self.config, index)?;
                Outcome::default()
            }
            Command::EndAt {
                lecture,
                page,
                keep_next,
            } => {
                let index = self.config.lecture_index(*lecture)?;
                let page = match page {
                    Some(page) => *page,
                    None => allocation::end_page(&self.allocation, prefaces, index)?,
                };
                if *keep_next {
                    allocation::pin_by_end_page_keep_next(
                        &mut self.config,
                        &self.allocation,
                        index,
                        page,
                    )?;
                } else {
                    allocation::pin_by_end_page(&mut self.config, &self.allocation, index, page)?;
                }
                Outcome::default()
            }
            Command::Write => Outcome::show(&self.save()?),
            Command::Quit => Outcome {
                quit: true,
                ..Outcome::default()
            },
            Command::WriteQuit => Outcome {
                quit: true,
                ..Outcome::show(&self.save()?)
            },
            Command::Help => Outcome::show(&Help),
        };

        if command.reports_balance() {
            outcome.warning = balance_warning(self.recompute()?);
        }
        Ok(outcome)
    }
}

fn balance_warning(balance: Balance) -> Option<String> {
    match balance {
        Balance::Exact => None,
        Balance::Overallocated { pinned, available } => Some(format!(
            "warning: pinned lectures use {} pages but only {} are available",
            pinned, available
        )),
        Balance::Unallocated { remaining } => Some(format!(
            "warning: {} pages are not allocated to any lecture",
            remaining
        )),
    }
}
