// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

/// Captured result of a successful tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Rendered command line, for diagnostics
    pub command: String,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn new(command: impl Into<String>, stdout: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    /// Both streams, stdout first, as attached to logs and errors.
    pub fn combined(&self) -> String {
        combine(&self.stdout, &self.stderr)
    }
}

pub(crate) fn combine(stdout: &str, stderr: &str) -> String {
    match (stdout.trim().is_empty(), stderr.trim().is_empty()) {
        (_, true) => stdout.trim_end().to_string(),
        (true, false) => stderr.trim_end().to_string(),
        (false, false) => format!("{}\n{}", stdout.trim_end(), stderr.trim_end()),
    }
}

/// Render a command line the way it is shown in logs and errors.
pub fn render(command: &str, args: &[String]) -> String {
    if args.is_empty() {
        command.to_string()
    } else {
        format!("{} {}", command, args.join(" "))
    }
}
