// SPDX-License-Identifier: GPL-3.0-only

//! LVM-based PMEM device manager
//!
//! Prerequisite: every PMEM region to be managed has been divided into
//! namespaces and grouped into a volume group named `<bus><region>`.

use pmem_contracts::{TopologySource, VolumeBackend};
use pmem_types::{DeviceInfo, VolumeGroupInfo, bytes_to_whole_mib};
use tracing::{debug, info, warn};

use crate::eraser::SecureEraser;
use crate::inventory::VolumeGroupInventory;
use crate::pools::PoolSet;
use crate::table::{ParsePolicy, TableError, parse_table};
use crate::{ManagerError, Result};

/// Parse `lv_name lv_path lv_size` lines, skipping anything else.
pub fn parse_lvs(output: &str) -> std::result::Result<Vec<DeviceInfo>, TableError> {
    parse_table(output, 3, ParsePolicy::Lenient, |cols| {
        let size: u64 = cols[2].parse().ok()?;
        Some(DeviceInfo::new(cols[0], cols[1], size))
    })
}

#[derive(Debug)]
pub struct DeviceManager<B> {
    pools: PoolSet,
    backend: B,
}

impl<B: VolumeBackend> DeviceManager<B> {
    /// Build a manager for every active region reported by `topology`.
    pub fn new<T: TopologySource + ?Sized>(topology: &T, backend: B) -> Result<Self> {
        let regions = topology.active_regions()?;
        let pools = PoolSet::from_regions(&regions);
        info!("Managing volume groups: {:?}", pools.as_slice());
        Ok(Self::with_pools(pools, backend))
    }

    pub fn with_pools(pools: PoolSet, backend: B) -> Self {
        Self { pools, backend }
    }

    pub fn pools(&self) -> &PoolSet {
        &self.pools
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Current size and free space of the managed volume groups.
    pub fn volume_groups(&self) -> Result<Vec<VolumeGroupInfo>> {
        VolumeGroupInventory::new(&self.backend).query(self.pools.as_slice())
    }

    /// Largest free space of any single managed volume group.
    ///
    /// A device never spans volume groups, so free space is not summed.
    pub fn get_capacity(&self) -> Result<u64> {
        let vgs = self.volume_groups()?;
        Ok(vgs.iter().map(|vg| vg.free_bytes).max().unwrap_or(0))
    }

    /// Create device `name` in the first volume group, in pool order, that
    /// has at least `size_bytes` free and accepts the request.
    pub fn create_device(&self, name: &str, size_bytes: u64) -> Result<()> {
        let vgs = self.volume_groups()?;
        let size_mib = bytes_to_whole_mib(size_bytes);

        // vgs sorts its output by name; allocation follows pool order
        let candidates = self
            .pools
            .iter()
            .filter_map(|pool| vgs.iter().find(|vg| vg.name == pool))
            .filter(|vg| vg.fits(size_bytes));

        let mut attempts = Vec::new();
        for vg in candidates {
            match self.backend.create_volume(name, size_mib, &vg.name) {
                Ok(output) => {
                    info!("Created device {name} ({size_mib} MiB) in {}", vg.name);
                    debug!("{} output: {}", output.command, output.combined());
                    return Ok(());
                }
                Err(error) if error.kind.is_retryable() => {
                    info!(
                        "Creating {name} in {} failed, trying next free region: {}",
                        vg.name, error.output
                    );
                    attempts.push(error);
                }
                Err(source) => {
                    return Err(ManagerError::Creation {
                        name: name.to_string(),
                        source,
                    });
                }
            }
        }

        warn!("No volume group could hold {name} ({size_bytes} bytes)");
        Err(ManagerError::Capacity {
            requested: size_bytes,
            attempts,
        })
    }

    /// Remove device `name`, wiping it first when `secure_erase` is set.
    ///
    /// A failed wipe aborts the removal: the device stays in place rather
    /// than releasing space whose contents were not confirmed erased.
    pub fn delete_device(&self, name: &str, secure_erase: bool) -> Result<()> {
        let device = self.get_device(name)?;
        info!(
            "DeleteDevice: matching LV path {} erase: {secure_erase}",
            device.path
        );

        if secure_erase {
            self.eraser().erase(&device)?;
        }

        let output = self
            .backend
            .remove_volume(&device.path)
            .map_err(|source| ManagerError::Removal {
                path: device.path.clone(),
                source,
            })?;
        debug!("{} output: {}", output.command, output.combined());
        Ok(())
    }

    /// Wipe device `name` in place.
    pub fn flush_device_data(&self, name: &str) -> Result<()> {
        let device = self.get_device(name)?;
        self.eraser().erase(&device)
    }

    pub fn get_device(&self, name: &str) -> Result<DeviceInfo> {
        self.list_devices()?
            .into_iter()
            .find(|dev| dev.name == name)
            .ok_or_else(|| ManagerError::NotFound(name.to_string()))
    }

    /// Logical volumes of the managed volume groups.
    pub fn list_devices(&self) -> Result<Vec<DeviceInfo>> {
        if self.pools.is_empty() {
            return Ok(Vec::new());
        }

        let output = self
            .backend
            .list_volumes(self.pools.as_slice())
            .map_err(ManagerError::Query)?;

        parse_lvs(&output.stdout).map_err(|source| ManagerError::Parse {
            command: output.command.clone(),
            source,
        })
    }

    fn eraser(&self) -> SecureEraser<'_, B> {
        SecureEraser::new(&self.backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmem_contracts::{ToolError, ToolFailureKind};
    use pmem_testing::{Call, FakeVolumeBackend, StaticTopology};
    use pmem_types::MIB;

    const GIB: u64 = 1024 * MIB;

    fn manager(backend: FakeVolumeBackend) -> DeviceManager<FakeVolumeBackend> {
        let pools = backend.group_names().into_iter().collect();
        DeviceManager::with_pools(pools, backend)
    }

    #[test]
    fn parses_lvs_with_header_line() {
        let devices = parse_lvs("  LV Path LSize Extra\n  lv1 /dev/vg0/lv1 104857600\n")
            .expect("lenient parse");
        assert_eq!(devices, vec![DeviceInfo::new("lv1", "/dev/vg0/lv1", 104857600)]);
    }

    #[test]
    fn builds_pools_from_topology() {
        let topology = StaticTopology::new([("ndbus0", "region0"), ("ndbus0", "region1")]);
        let dm = DeviceManager::new(&topology, FakeVolumeBackend::new()).expect("topology");
        assert_eq!(dm.pools().as_slice(), ["ndbus0region0", "ndbus0region1"]);
    }

    #[test]
    fn topology_failure_is_initialization_error() {
        let err = DeviceManager::new(&StaticTopology::failing(), FakeVolumeBackend::new())
            .err()
            .expect("construction fails");
        assert!(matches!(err, ManagerError::Initialization(_)));
    }

    #[test]
    fn capacity_is_largest_free_space() {
        let dm = manager(
            FakeVolumeBackend::new()
                .with_group("vg0", 4 * GIB, GIB)
                .with_group("vg1", 4 * GIB, 3 * GIB),
        );
        assert_eq!(dm.get_capacity().expect("capacity"), 3 * GIB);
    }

    #[test]
    fn empty_pool_set_reports_nothing_without_tools() {
        let dm = DeviceManager::with_pools(PoolSet::default(), FakeVolumeBackend::new());
        assert_eq!(dm.get_capacity().expect("capacity"), 0);
        assert!(dm.list_devices().expect("list").is_empty());
        assert!(dm.backend().calls().is_empty());
    }

    #[test]
    fn creation_follows_pool_order_not_tool_order() {
        let backend = FakeVolumeBackend::new()
            .with_group("vg_b", 4 * GIB, 2 * GIB)
            .with_group("vg_a", 4 * GIB, 2 * GIB);
        let pools: PoolSet = ["vg_b".to_string(), "vg_a".to_string()].into_iter().collect();
        let dm = DeviceManager::with_pools(pools, backend);

        dm.create_device("d1", GIB).expect("create");
        assert_eq!(dm.get_device("d1").expect("present").path, "/dev/vg_b/d1");
    }

    #[test]
    fn creation_falls_back_on_retryable_failure() {
        let backend = FakeVolumeBackend::new()
            .with_group("vg0", 4 * GIB, 2 * GIB)
            .with_group("vg1", 4 * GIB, 2 * GIB);
        backend.fail_create_in(
            "vg0",
            ToolError::retryable("lvcreate", "insufficient free extents"),
        );
        let dm = manager(backend);

        dm.create_device("d1", GIB).expect("second pool accepts");
        assert_eq!(dm.get_device("d1").expect("present").path, "/dev/vg1/d1");
        assert_eq!(
            dm.backend().create_attempts(),
            vec!["vg0".to_string(), "vg1".to_string()]
        );
    }

    #[test]
    fn fatal_create_failure_stops_iteration() {
        let backend = FakeVolumeBackend::new()
            .with_group("vg0", 4 * GIB, 2 * GIB)
            .with_group("vg1", 4 * GIB, 2 * GIB);
        backend.fail_create_in("vg0", ToolError::fatal("lvcreate", "No such file"));
        let dm = manager(backend);

        let err = dm.create_device("d1", GIB).unwrap_err();
        assert!(matches!(
            err,
            ManagerError::Creation { ref source, .. } if source.kind == ToolFailureKind::Fatal
        ));
        assert_eq!(dm.backend().create_attempts(), vec!["vg0".to_string()]);
    }

    #[test]
    fn duplicate_name_is_creation_error() {
        let dm = manager(FakeVolumeBackend::new().with_group("vg0", 4 * GIB, 2 * GIB));
        dm.create_device("d1", 4 * MIB).expect("first create");
        let err = dm.create_device("d1", 4 * MIB).unwrap_err();
        assert!(matches!(err, ManagerError::Creation { ref name, .. } if name == "d1"));
    }

    #[test]
    fn all_candidates_failing_is_capacity_error() {
        let backend = FakeVolumeBackend::new()
            .with_group("vg0", 4 * GIB, 2 * GIB)
            .with_group("vg1", 4 * GIB, 2 * GIB);
        backend.fail_create_in("vg0", ToolError::retryable("lvcreate", "race"));
        backend.fail_create_in("vg1", ToolError::retryable("lvcreate", "race"));
        let dm = manager(backend);

        let err = dm.create_device("d1", GIB).unwrap_err();
        assert!(matches!(err, ManagerError::Capacity { ref attempts, .. } if attempts.len() == 2));
    }

    #[test]
    fn size_is_passed_in_whole_mib() {
        let dm = manager(FakeVolumeBackend::new().with_group("vg0", 4 * GIB, 2 * GIB));
        dm.create_device("d1", 100 * MIB + 5).expect("create");
        assert!(
            dm.backend()
                .calls()
                .contains(&Call::Create {
                    name: "d1".to_string(),
                    size_mib: 100,
                    group: "vg0".to_string(),
                })
        );
    }

    #[test]
    fn delete_wipes_before_removing() {
        let dm = manager(FakeVolumeBackend::new().with_group("vg0", 4 * GIB, 2 * GIB));
        dm.create_device("d1", GIB).expect("create");
        dm.delete_device("d1", true).expect("delete");

        let tail: Vec<Call> = dm
            .backend()
            .calls()
            .into_iter()
            .filter(|call| matches!(call, Call::Wipe { .. } | Call::Remove { .. }))
            .collect();
        assert_eq!(
            tail,
            vec![
                Call::Wipe {
                    path: "/dev/vg0/d1".to_string()
                },
                Call::Remove {
                    path: "/dev/vg0/d1".to_string()
                },
            ]
        );
    }

    #[test]
    fn failed_wipe_keeps_the_device() {
        let backend = FakeVolumeBackend::new().with_group("vg0", 4 * GIB, 2 * GIB);
        let dm = manager(backend);
        dm.create_device("d1", GIB).expect("create");
        dm.backend()
            .fail_wipe(ToolError::retryable("shred", "shred: /dev/vg0/d1: I/O error"));

        let err = dm.delete_device("d1", true).unwrap_err();
        assert!(matches!(err, ManagerError::Erase { .. }));
        assert_eq!(err.tool_output(), Some("shred: /dev/vg0/d1: I/O error"));
        assert!(dm.get_device("d1").is_ok());
        assert!(
            !dm.backend()
                .calls()
                .iter()
                .any(|call| matches!(call, Call::Remove { .. }))
        );
    }

    #[test]
    fn flush_wipes_without_removing() {
        let dm = manager(FakeVolumeBackend::new().with_group("vg0", 4 * GIB, 2 * GIB));
        dm.create_device("d1", GIB).expect("create");
        dm.flush_device_data("d1").expect("flush");
        assert!(dm.get_device("d1").is_ok());
        assert!(dm.backend().calls().contains(&Call::Wipe {
            path: "/dev/vg0/d1".to_string()
        }));
    }

    #[test]
    fn removal_failure_is_reported() {
        let dm = manager(FakeVolumeBackend::new().with_group("vg0", 4 * GIB, 2 * GIB));
        dm.create_device("d1", GIB).expect("create");
        dm.backend()
            .fail_remove(ToolError::retryable("lvremove", "Logical volume in use"));
        let err = dm.delete_device("d1", false).unwrap_err();
        assert!(matches!(err, ManagerError::Removal { ref path, .. } if path == "/dev/vg0/d1"));
    }

    #[test]
    fn missing_device_is_not_found() {
        let dm = manager(FakeVolumeBackend::new().with_group("vg0", 4 * GIB, 2 * GIB));
        assert!(matches!(
            dm.flush_device_data("missing"),
            Err(ManagerError::NotFound(ref name)) if name == "missing"
        ));
    }

    #[test]
    fn listing_failure_is_query_error() {
        let dm = manager(FakeVolumeBackend::new().with_group("vg0", 4 * GIB, 2 * GIB));
        dm.backend().fail_list(ToolError::retryable("lvs", "locking failed"));
        assert!(matches!(dm.list_devices(), Err(ManagerError::Query(_))));
    }
}
