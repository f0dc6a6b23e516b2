// SPDX-License-Identifier: GPL-3.0-only

use pmem_contracts::{TopologyError, TopologySource};
use pmem_types::RegionRef;

/// Fixed topology, or one that always fails to load.
#[derive(Debug, Clone)]
pub struct StaticTopology {
    regions: Option<Vec<RegionRef>>,
}

impl StaticTopology {
    pub fn new<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            regions: Some(
                pairs
                    .into_iter()
                    .map(|(bus, region)| RegionRef::new(bus, region))
                    .collect(),
            ),
        }
    }

    pub fn failing() -> Self {
        Self { regions: None }
    }
}

impl TopologySource for StaticTopology {
    fn active_regions(&self) -> Result<Vec<RegionRef>, TopologyError> {
        self.regions
            .clone()
            .ok_or_else(|| TopologyError::Unavailable("static topology".to_string()))
    }
}
