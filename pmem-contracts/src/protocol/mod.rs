// SPDX-License-Identifier: GPL-3.0-only

pub mod error;
pub mod output;

pub use error::{TopologyError, ToolError, ToolFailureKind};
pub use output::{ToolOutput, render};
