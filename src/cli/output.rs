//! Terminal output for command handlers
//!
//! Human-readable messages go through the `success`/`info`/`warning`/`error`
//! helpers, which are silent in JSON mode. Machine-readable results go
//! through [`OutputFormatter::json`].

use crate::error::{IntakeError, Result};
use colored::Colorize;
use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub struct OutputFormatter {
    json: bool,
}

impl OutputFormatter {
    pub fn new(json: bool, no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { json }
    }

    #[must_use]
    pub const fn is_json(&self) -> bool {
        self.json
    }

    pub fn success(&self, message: &str) {
        if !self.json {
            println!("{}", message.green());
        }
    }

    pub fn info(&self, message: &str) {
        if !self.json {
            println!("{message}");
        }
    }

    pub fn warning(&self, message: &str) {
        if !self.json {
            eprintln!("{}", message.yellow());
        }
    }

    pub fn error(&self, message: &str) {
        if !self.json {
            eprintln!("{} {}", "Error:".red().bold(), message);
        }
    }

    /// Pretty-printed JSON on stdout
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| IntakeError::StoreUnavailable(format!("cannot encode output: {e}")))?;
        println!("{text}");
        Ok(())
    }

    /// Prints `value` as JSON in JSON mode, otherwise runs `human`
    pub fn emit<T: Serialize + ?Sized>(&self, value: &T, human: impl FnOnce(&Self)) -> Result<()> {
        if self.json {
            self.json(value)
        } else {
            human(self);
            Ok(())
        }
    }
}

/// Left-pads or truncates a cell for table output
pub(crate) fn cell(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    } else {
        format!("{text:<width$}")
    }
}
