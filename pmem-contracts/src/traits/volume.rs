// SPDX-License-Identifier: GPL-3.0-only

use crate::{ToolError, ToolOutput};

/// Capability to drive the volume-management and overwrite tools.
///
/// Implementations return the tools' raw text; parsing and policy live with
/// the caller. Every call blocks until the underlying invocation finishes.
pub trait VolumeBackend: Send + Sync {
    /// Report `name total free` per line, in bytes without unit suffix, for
    /// exactly the given volume groups.
    fn query_volume_groups(&self, groups: &[String]) -> Result<ToolOutput, ToolError>;

    /// Report `name path size` per line, in bytes without unit suffix, for the
    /// logical volumes of the given volume groups.
    fn list_volumes(&self, groups: &[String]) -> Result<ToolOutput, ToolError>;

    /// Create logical volume `name` of `size_mib` MiB in `group`.
    fn create_volume(&self, name: &str, size_mib: u64, group: &str)
    -> Result<ToolOutput, ToolError>;

    /// Force-remove the logical volume at `path` without prompting.
    fn remove_volume(&self, path: &str) -> Result<ToolOutput, ToolError>;

    /// Overwrite the device at `path` with a single pass.
    fn wipe_device(&self, path: &str) -> Result<ToolOutput, ToolError>;
}
