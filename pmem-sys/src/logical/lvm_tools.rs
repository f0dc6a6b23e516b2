// SPDX-License-Identifier: GPL-3.0-only

//! LVM and shred command-line operations
//!
//! `LvmCli` is the production `VolumeBackend`: every call shells out to the
//! corresponding tool and hands the raw output back to the caller.

use std::path::{Path, PathBuf};

use pmem_contracts::{ToolError, ToolOutput, VolumeBackend};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::command;
use crate::{Result, SysError};

/// Binary names or paths of the external tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    pub vgs: PathBuf,
    pub lvs: PathBuf,
    pub lvcreate: PathBuf,
    pub lvremove: PathBuf,
    pub shred: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            vgs: PathBuf::from("vgs"),
            lvs: PathBuf::from("lvs"),
            lvcreate: PathBuf::from("lvcreate"),
            lvremove: PathBuf::from("lvremove"),
            shred: PathBuf::from("shred"),
        }
    }
}

fn vgs_args(groups: &[String]) -> Vec<String> {
    let mut args: Vec<String> = [
        "--noheadings",
        "--nosuffix",
        "-o",
        "vg_name,vg_size,vg_free",
        "--units",
        "B",
    ]
    .iter()
    .map(|arg| arg.to_string())
    .collect();
    args.extend(groups.iter().cloned());
    args
}

fn lvs_args(groups: &[String]) -> Vec<String> {
    let mut args: Vec<String> = [
        "--noheadings",
        "--nosuffix",
        "-o",
        "lv_name,lv_path,lv_size",
        "--units",
        "B",
    ]
    .iter()
    .map(|arg| arg.to_string())
    .collect();
    args.extend(groups.iter().cloned());
    args
}

fn lvcreate_args(name: &str, size_mib: u64, group: &str) -> Vec<String> {
    // lvcreate reads a bare -L value as MiB
    vec![
        "-L".to_string(),
        size_mib.to_string(),
        "-n".to_string(),
        name.to_string(),
        group.to_string(),
    ]
}

fn lvremove_args(path: &str) -> Vec<String> {
    vec!["-fy".to_string(), path.to_string()]
}

fn shred_args(path: &str) -> Vec<String> {
    vec!["--iterations=1".to_string(), path.to_string()]
}

/// A name clash fails identically in every volume group.
fn classify_create_failure(error: ToolError) -> ToolError {
    if error.kind.is_retryable() && error.output.contains("already exists") {
        return ToolError::fatal(error.command, error.output);
    }
    error
}

/// LVM/shred CLI wrapper
#[derive(Debug, Clone)]
pub struct LvmCli {
    vgs: PathBuf,
    lvs: PathBuf,
    lvcreate: PathBuf,
    lvremove: PathBuf,
    shred: PathBuf,
}

impl LvmCli {
    /// Resolve every tool binary up front.
    ///
    /// Returns an error if any of them is not installed.
    pub fn new(paths: &ToolPaths) -> Result<Self> {
        if !cfg!(feature = "lvm-tools") {
            return Err(SysError::LvmDisabled);
        }

        let cli = Self {
            vgs: Self::find_tool(&paths.vgs)?,
            lvs: Self::find_tool(&paths.lvs)?,
            lvcreate: Self::find_tool(&paths.lvcreate)?,
            lvremove: Self::find_tool(&paths.lvremove)?,
            shred: Self::find_tool(&paths.shred)?,
        };
        info!(
            "Using vgs={:?} lvs={:?} lvcreate={:?} lvremove={:?} shred={:?}",
            cli.vgs, cli.lvs, cli.lvcreate, cli.lvremove, cli.shred
        );
        Ok(cli)
    }

    /// Find a tool binary in PATH, or check an explicit path
    pub fn find_tool(tool: &Path) -> Result<PathBuf> {
        which::which(tool).map_err(|e| SysError::ToolNotFound {
            tool: tool.display().to_string(),
            reason: e.to_string(),
        })
    }
}

impl VolumeBackend for LvmCli {
    fn query_volume_groups(&self, groups: &[String]) -> std::result::Result<ToolOutput, ToolError> {
        command::run(&self.vgs, &vgs_args(groups))
    }

    fn list_volumes(&self, groups: &[String]) -> std::result::Result<ToolOutput, ToolError> {
        command::run(&self.lvs, &lvs_args(groups))
    }

    fn create_volume(
        &self,
        name: &str,
        size_mib: u64,
        group: &str,
    ) -> std::result::Result<ToolOutput, ToolError> {
        command::run(&self.lvcreate, &lvcreate_args(name, size_mib, group)).map_err(|error| {
            let error = classify_create_failure(error);
            warn!("lvcreate in {group} failed: {}", error.output);
            error
        })
    }

    fn remove_volume(&self, path: &str) -> std::result::Result<ToolOutput, ToolError> {
        command::run(&self.lvremove, &lvremove_args(path))
    }

    fn wipe_device(&self, path: &str) -> std::result::Result<ToolOutput, ToolError> {
        command::run(&self.shred, &shred_args(path))
    }
}
