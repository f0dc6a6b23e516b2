// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a failed tool invocation should be treated by callers that can
/// fall back to an alternative target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolFailureKind {
    /// The tool ran and reported failure; another target may still succeed.
    Retryable,
    /// The tool could not run, or failed for a reason no other target fixes.
    Fatal,
}

impl ToolFailureKind {
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Retryable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{command} failed ({kind:?}): {output}")]
pub struct ToolError {
    pub kind: ToolFailureKind,
    pub command: String,
    /// Captured tool output, or the spawn error when the tool never ran
    pub output: String,
}

impl ToolError {
    pub fn new(
        kind: ToolFailureKind,
        command: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            command: command.into(),
            output: output.into(),
        }
    }

    pub fn retryable(command: impl Into<String>, output: impl Into<String>) -> Self {
        Self::new(ToolFailureKind::Retryable, command, output)
    }

    pub fn fatal(command: impl Into<String>, output: impl Into<String>) -> Self {
        Self::new(ToolFailureKind::Fatal, command, output)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("topology not available at {0}")]
    Unavailable(String),

    #[error("failed to read topology: {0}")]
    Read(String),
}
