//! Console report of a harness run.

use std::fmt::{self, Write as _};
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::compare::Comparison;
use crate::config::ExitPolicy;
use crate::error::Result;

const GREEN: &str = "\x1b[1;32m";
const RED: &str = "\x1b[1;31m";
const RESET: &str = "\x1b[0m";

/// The result of one test case: a comparison, or the error that stopped it.
#[derive(Debug, Clone)]
pub struct Entry<T> {
    pub name: String,
    pub result: Result<Comparison<T>>,
}

impl<T> Entry<T> {
    pub fn new(name: impl Into<String>, result: Result<Comparison<T>>) -> Self {
        Entry {
            name: name.into(),
            result,
        }
    }

    pub fn passed(&self) -> bool {
        matches!(&self.result, Ok(cmp) if cmp.passed())
    }

    pub fn failed(&self) -> bool {
        matches!(&self.result, Ok(cmp) if !cmp.passed())
    }

    pub fn errored(&self) -> bool {
        self.result.is_err()
    }
}

impl<T: fmt::Display> Entry<T> {
    fn line(&self) -> String {
        match &self.result {
            Ok(cmp) => cmp.to_string(),
            Err(e) => format!("Test {} aborted: {}", self.name, e),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Report<T> {
    entries: Vec<Entry<T>>,
    started_at: DateTime<Local>,
    elapsed: Duration,
}

impl<T> Report<T> {
    pub fn new(entries: Vec<Entry<T>>, started_at: DateTime<Local>, elapsed: Duration) -> Self {
        Report {
            entries,
            started_at,
            elapsed,
        }
    }

    pub fn entries(&self) -> &[Entry<T>] {
        &self.entries
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn passed(&self) -> usize {
        self.entries.iter().filter(|e| e.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.iter().filter(|e| e.failed()).count()
    }

    pub fn errored(&self) -> usize {
        self.entries.iter().filter(|e| e.errored()).count()
    }

    pub fn all_passed(&self) -> bool {
        self.entries.iter().all(Entry::passed)
    }

    /// Process exit code for this report under `policy`.
    ///
    /// Errors (setup failures, contract violations, shape mismatches) always
    /// yield 1. Numeric mismatches yield 1 only under [`ExitPolicy::Strict`].
    pub fn exit_code(&self, policy: ExitPolicy) -> u8 {
        if self.errored() > 0 {
            return 1;
        }
        match policy {
            ExitPolicy::Strict if self.failed() > 0 => 1,
            _ => 0,
        }
    }
}

impl<T: fmt::Display> Report<T> {
    /// Renders one line per test followed by a summary line.
    pub fn render(&self, color: bool) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let line = entry.line();
            // Writing into a String cannot fail.
            let _ = match (color, entry.passed()) {
                (false, _) => writeln!(out, "{line}"),
                (true, true) => writeln!(out, "{GREEN}{line}{RESET}"),
                (true, false) => writeln!(out, "{RED}{line}{RESET}"),
            };
        }
        let _ = writeln!(
            out,
            "{} passed, {} failed, {} errored ({:.2?}, started {})",
            self.passed(),
            self.failed(),
            self.errored(),
            self.elapsed,
            self.started_at.format("%Y-%m-%d %H:%M:%S"),
        );
        out
    }
}

impl<T: fmt::Display> fmt::Display for Report<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}
