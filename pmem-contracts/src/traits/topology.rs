// SPDX-License-Identifier: GPL-3.0-only

use pmem_types::RegionRef;

use crate::TopologyError;

/// Source of the PMEM bus/region layout, consulted once when a device
/// manager is built.
pub trait TopologySource: Send + Sync {
    /// Active regions in discovery order: buses in order, regions of each bus
    /// in order.
    fn active_regions(&self) -> Result<Vec<RegionRef>, TopologyError>;
}
