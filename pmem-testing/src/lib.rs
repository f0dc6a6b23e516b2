// SPDX-License-Identifier: GPL-3.0-only

//! Test doubles for the PMEM device manager
//!
//! [`FakeVolumeBackend`] keeps volume groups and logical volumes in memory
//! and answers with the same text shapes `vgs` and `lvs` print, so parsing
//! and allocation run exactly as they do against real tools.

pub mod backend;
pub mod topology;

pub use backend::{Call, EXTENT_MIB, FakeVolumeBackend};
pub use topology::StaticTopology;
