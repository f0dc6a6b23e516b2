// SPDX-License-Identifier: GPL-3.0-only

//! PMEM topology discovery from the nvdimm sysfs tree

use std::fs;
use std::path::{Path, PathBuf};

use pmem_contracts::{TopologyError, TopologySource};
use pmem_types::RegionRef;
use tracing::{debug, info};

const BUS_PREFIX: &str = "ndbus";
const REGION_PREFIX: &str = "region";

/// Reads `<root>/bus/nd/devices/ndbusN/regionM` entries. A region counts as
/// active when a driver is bound to it.
#[derive(Debug, Clone)]
pub struct SysfsTopology {
    root: PathBuf,
}

impl SysfsTopology {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn devices_dir(&self) -> PathBuf {
        self.root.join("bus").join("nd").join("devices")
    }
}

impl Default for SysfsTopology {
    fn default() -> Self {
        Self::new("/sys")
    }
}

/// Numeric suffix of `name` after `prefix`, so `region10` sorts after `region2`.
fn index_of(name: &str, prefix: &str) -> Option<u32> {
    name.strip_prefix(prefix)?.parse().ok()
}

fn indexed_entries(dir: &Path, prefix: &str) -> Result<Vec<(u32, String)>, TopologyError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| TopologyError::Read(format!("{}: {e}", dir.display())))?;

    let mut found: Vec<(u32, String)> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            index_of(&name, prefix).map(|index| (index, name))
        })
        .collect();
    found.sort();
    Ok(found)
}

impl TopologySource for SysfsTopology {
    fn active_regions(&self) -> Result<Vec<RegionRef>, TopologyError> {
        let devices = self.devices_dir();
        if !devices.is_dir() {
            return Err(TopologyError::Unavailable(devices.display().to_string()));
        }

        let mut regions = Vec::new();
        for (_, bus) in indexed_entries(&devices, BUS_PREFIX)? {
            info!("Bus: {bus}");
            let bus_dir = devices.join(&bus);
            for (_, region) in indexed_entries(&bus_dir, REGION_PREFIX)? {
                if !bus_dir.join(&region).join("driver").exists() {
                    debug!("Skipping inactive region {region} on {bus}");
                    continue;
                }
                info!("Region: {region}");
                regions.push(RegionRef::new(bus.clone(), region));
            }
        }

        Ok(regions)
    }
}
