// SPDX-License-Identifier: GPL-3.0-only

//! LVM types
//!
//! Types for the volume groups backing PMEM regions and the logical volumes
//! handed out as devices.

use serde::{Deserialize, Serialize};

/// Volume group information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeGroupInfo {
    /// Volume group name
    pub name: String,

    /// Total size in bytes
    pub total_bytes: u64,

    /// Free space in bytes
    pub free_bytes: u64,
}

impl VolumeGroupInfo {
    pub fn new(name: impl Into<String>, total_bytes: u64, free_bytes: u64) -> Self {
        Self {
            name: name.into(),
            total_bytes,
            free_bytes,
        }
    }

    /// Get used space in bytes
    pub fn used(&self) -> u64 {
        self.total_bytes.saturating_sub(self.free_bytes)
    }

    /// Get usage percentage (0-100)
    pub fn usage_percent(&self) -> u32 {
        if self.total_bytes == 0 {
            0
        } else {
            ((self.used() as f64 / self.total_bytes as f64) * 100.0) as u32
        }
    }

    /// Whether a single device of `size_bytes` fits in the free space
    pub fn fits(&self, size_bytes: u64) -> bool {
        self.free_bytes >= size_bytes
    }
}

/// A provisioned device (LVM logical volume)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Logical volume name
    pub name: String,

    /// Device node path (e.g., "/dev/ndbus0region0/pvc-1")
    pub path: String,

    /// Size in bytes
    pub size_bytes: u64,
}

impl DeviceInfo {
    pub fn new(name: impl Into<String>, path: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size_bytes,
        }
    }
}
