// SPDX-License-Identifier: GPL-3.0-only

//! Canonical domain models for the PMEM device manager
//!
//! These types are shared by every layer of the stack:
//!
//! - **pmem-sys**: builds them from sysfs and LVM tool output
//! - **pmem-manager**: returns them from its public API
//! - **pmem-testing**: constructs them in fixtures and assertions
//!
//! ## Model
//!
//! - `VolumeGroupInfo` → a capacity pool carved out of one PMEM region
//! - `DeviceInfo` → a logical volume provisioned inside one of those pools
//! - `RegionRef` → a (bus, region) pair reported by the topology source

pub mod common;
pub mod lvm;
pub mod topology;

pub use common::{MIB, bytes_to_pretty, bytes_to_whole_mib, parse_size};
pub use lvm::{DeviceInfo, VolumeGroupInfo};
pub use topology::RegionRef;
