//! PMEM topology types

use serde::{Deserialize, Serialize};

/// An active region together with the bus it hangs off, as reported by the
/// topology source (e.g., `ndbus0` / `region1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionRef {
    pub bus: String,
    pub region: String,
}

impl RegionRef {
    pub fn new(bus: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            bus: bus.into(),
            region: region.into(),
        }
    }

    /// Name of the volume group that backs this region: the bus device name
    /// followed by the region device name.
    pub fn volume_group_name(&self) -> String {
        format!("{}{}", self.bus, self.region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_group_name_concatenates_bus_and_region() {
        let region = RegionRef::new("ndbus0", "region1");
        assert_eq!(region.volume_group_name(), "ndbus0region1");
    }
}
