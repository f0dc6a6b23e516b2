// SPDX-License-Identifier: GPL-3.0-only

//! Low-level system operations for PMEM device management
//!
//! This crate provides the production adapters behind the device manager's
//! contracts:
//! - LVM command-line operations (`vgs`, `lvs`, `lvcreate`, `lvremove`)
//! - Single-pass device overwrite with `shred`
//! - PMEM bus/region discovery from sysfs
//!
//! These operations require elevated privileges.

pub mod command;
pub mod error;
pub mod logical;
pub mod topology;

pub use error::{Result, SysError};
pub use logical::lvm_tools::{LvmCli, ToolPaths};
pub use topology::SysfsTopology;
