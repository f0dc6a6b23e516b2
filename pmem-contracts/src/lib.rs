// SPDX-License-Identifier: GPL-3.0-only

pub mod protocol;
pub mod traits;

pub use protocol::{TopologyError, ToolError, ToolFailureKind, ToolOutput, render};
pub use traits::{TopologySource, VolumeBackend};
