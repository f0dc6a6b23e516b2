// SPDX-License-Identifier: GPL-3.0-only

use pmem_contracts::{TopologyError, ToolError};
use thiserror::Error;

use crate::table::TableError;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("failed to initialize pmem context: {0}")]
    Initialization(#[from] TopologyError),

    #[error("query failed: {0}")]
    Query(#[source] ToolError),

    #[error("failed to parse output of {command}: {source}")]
    Parse {
        command: String,
        #[source]
        source: TableError,
    },

    #[error("{command} did not report volume groups {missing:?}")]
    Incomplete {
        command: String,
        missing: Vec<String>,
    },

    #[error(
        "no volume group has {requested} bytes available ({} attempts failed)",
        .attempts.len()
    )]
    Capacity {
        requested: u64,
        /// Failed creation attempts, one per candidate volume group
        attempts: Vec<ToolError>,
    },

    #[error("device not found with name {0}")]
    NotFound(String),

    #[error("failed to create device {name}: {source}")]
    Creation {
        name: String,
        #[source]
        source: ToolError,
    },

    #[error("device flush failure for {path}: {source}")]
    Erase {
        path: String,
        #[source]
        source: ToolError,
    },

    #[error("failed to remove device {path}: {source}")]
    Removal {
        path: String,
        #[source]
        source: ToolError,
    },
}

impl ManagerError {
    /// Captured output of the tool behind this error, if any.
    pub fn tool_output(&self) -> Option<&str> {
        match self {
            Self::Query(source)
            | Self::Creation { source, .. }
            | Self::Erase { source, .. }
            | Self::Removal { source, .. } => Some(&source.output),
            Self::Capacity { attempts, .. } => attempts.last().map(|e| e.output.as_str()),
            Self::Initialization(_)
            | Self::Parse { .. }
            | Self::Incomplete { .. }
            | Self::NotFound(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ManagerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_error_counts_attempts() {
        let err = ManagerError::Capacity {
            requested: 4096,
            attempts: vec![
                ToolError::retryable("lvcreate -L 1 -n d vg0", "insufficient free space"),
                ToolError::retryable("lvcreate -L 1 -n d vg1", "insufficient free extents"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "no volume group has 4096 bytes available (2 attempts failed)"
        );
        assert_eq!(err.tool_output(), Some("insufficient free extents"));
    }

    #[test]
    fn erase_error_keeps_tool_output() {
        let err = ManagerError::Erase {
            path: "/dev/vg0/lv1".to_string(),
            source: ToolError::retryable("shred --iterations=1 /dev/vg0/lv1", "I/O error"),
        };
        assert_eq!(err.tool_output(), Some("I/O error"));
        assert!(err.to_string().contains("/dev/vg0/lv1"));
        assert_eq!(ManagerError::NotFound("x".into()).tool_output(), None);
    }
}
