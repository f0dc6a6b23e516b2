// SPDX-License-Identifier: GPL-3.0-only

use thiserror::Error;

/// Error types for system-level operations
#[derive(Error, Debug)]
pub enum SysError {
    #[error("{tool} not found: {reason}")]
    ToolNotFound { tool: String, reason: String },

    #[error("LVM tools disabled at compile time")]
    LvmDisabled,
}

/// Result type alias for system operations
pub type Result<T> = std::result::Result<T, SysError>;
