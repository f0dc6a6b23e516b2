// SPDX-License-Identifier: GPL-3.0-only

pub mod topology;
pub mod volume;

pub use topology::TopologySource;
pub use volume::VolumeBackend;
