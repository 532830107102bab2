//! Console output for the command-line tool.
//!
//! One line per event, prefixed with a coloured status icon when stdout is a
//! terminal.

use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::models::{CiteKey, KeyOutcome, KeyStatus, RunReport};
use crate::reconcile::Plan;

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
    Pending,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
        Status::Pending => "○",
    }
}

/// Writes status lines to stdout.
#[derive(Debug, Clone, Copy)]
pub struct Console {
    color: bool,
}

impl Console {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Colour only when stdout is a terminal.
    pub fn detect() -> Self {
        Self::new(is_terminal())
    }

    /// Render a status line without printing it.
    pub fn format_status(&self, status: Status, msg: &str) -> String {
        let icon = status_icon(status);
        if !self.color {
            return format!("{} {}", icon, msg);
        }
        match status {
            Status::Success => format!("{} {}", icon.green().bold(), msg),
            Status::Error => format!("{} {}", icon.red().bold(), msg),
            Status::Warning => format!("{} {}", icon.yellow().bold(), msg),
            Status::Info => format!("{} {}", icon.cyan().bold(), msg),
            Status::Pending => format!("{} {}", icon.white().dimmed(), msg),
        }
    }

    /// Print a styled status message.
    pub fn status(&self, status: Status, msg: &str) {
        println!("{}", self.format_status(status, msg));
    }

    /// Errors go to stderr so they survive output redirection.
    pub fn error(&self, msg: &str) {
        eprintln!("{}", self.format_status(Status::Error, msg));
    }

    /// Lines announcing what a run will do: one per missing key, then the
    /// uncited entries. An empty difference gets a single "nothing to do"
    /// line instead.
    pub fn plan_lines(&self, plan: &Plan) -> Vec<String> {
        if plan.diff.is_empty() {
            return vec![self.format_status(
                Status::Success,
                "No missing keys found. Doing nothing!",
            )];
        }

        let mut lines: Vec<String> = plan
            .classified()
            .into_iter()
            .map(|(key, class)| {
                self.format_status(
                    Status::Pending,
                    &format!("Missing key {} (fetching from {})", key, class),
                )
            })
            .collect();

        if !plan.diff.dangling.is_empty() {
            lines.push(self.format_status(
                Status::Info,
                &format!(
                    "{} bibliography entries are never cited: {}",
                    plan.diff.dangling.len(),
                    join_keys(&plan.diff.dangling)
                ),
            ));
        }
        lines
    }

    pub fn plan(&self, plan: &Plan) {
        for line in self.plan_lines(plan) {
            println!("{}", line);
        }
    }

    pub fn outcome(&self, outcome: &KeyOutcome) {
        match &outcome.status {
            KeyStatus::Appended => {
                self.status(Status::Success, &format!("Saved BibTeX for key {}", outcome.key))
            }
            KeyStatus::Failed { kind, reason } => self.status(
                Status::Error,
                &format!("{} ({}): {}", outcome.key, kind, reason),
            ),
        }
    }

    pub fn summary(&self, report: &RunReport) {
        let status = if report.failed() == 0 {
            Status::Success
        } else {
            Status::Warning
        };
        self.status(
            status,
            &format!(
                "Appended {} of {} missing entries to {}",
                report.appended(),
                report.missing.len(),
                report.bib_path.display()
            ),
        );
    }
}

fn join_keys(keys: &[CiteKey]) -> String {
    keys.iter().map(CiteKey::as_str).collect::<Vec<_>>().join(", ")
}
