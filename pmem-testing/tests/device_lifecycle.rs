use std::collections::BTreeSet;

use pmem_contracts::ToolError;
use pmem_manager::{DeviceInfo, DeviceManager, ManagerError};
use pmem_testing::{Call, EXTENT_MIB, FakeVolumeBackend, StaticTopology};
use pmem_types::MIB;

const GIB: u64 = 1024 * MIB;

fn two_region_manager() -> DeviceManager<FakeVolumeBackend> {
    let topology = StaticTopology::new([("ndbus0", "region0"), ("ndbus0", "region1")]);
    let backend = FakeVolumeBackend::new()
        .with_group("ndbus0region0", 8 * GIB, 2 * GIB)
        .with_group("ndbus0region1", 8 * GIB, 6 * GIB);
    DeviceManager::new(&topology, backend).expect("static topology")
}

fn as_set(devices: Vec<DeviceInfo>) -> BTreeSet<DeviceInfo> {
    devices.into_iter().collect()
}

#[test]
fn inventory_never_reports_more_free_than_total() {
    let dm = two_region_manager();
    dm.create_device("d1", GIB).expect("create");
    for vg in dm.volume_groups().expect("inventory") {
        assert!(vg.free_bytes <= vg.total_bytes, "{vg:?}");
    }
}

#[test]
fn capacity_is_max_free_not_sum() {
    let dm = two_region_manager();
    assert_eq!(dm.get_capacity().expect("capacity"), 6 * GIB);
}

#[test]
fn capacity_propagates_query_failure() {
    let dm = two_region_manager();
    dm.backend()
        .fail_query(ToolError::retryable("vgs", "Cannot process volume group"));
    assert!(matches!(dm.get_capacity(), Err(ManagerError::Query(_))));
}

#[test]
fn capacity_of_empty_topology_is_zero() {
    let topology = StaticTopology::new(Vec::<(&str, &str)>::new());
    let dm = DeviceManager::new(&topology, FakeVolumeBackend::new()).expect("empty topology");
    assert_eq!(dm.get_capacity().expect("capacity"), 0);
}

#[test]
fn create_list_delete_roundtrip() {
    let dm = two_region_manager();
    let size = 101 * MIB;

    dm.create_device("d1", size).expect("fits in the largest pool");
    let d1 = dm.get_device("d1").expect("listed after create");
    let extent = EXTENT_MIB * MIB;
    assert!(d1.size_bytes >= size.div_ceil(extent) * extent);
    assert_eq!(d1.size_bytes % extent, 0);

    dm.delete_device("d1", false).expect("delete");
    assert!(dm.list_devices().expect("list").iter().all(|d| d.name != "d1"));
    assert!(matches!(dm.get_device("d1"), Err(ManagerError::NotFound(_))));
}

#[test]
fn unaligned_size_is_floored_to_whole_mib() {
    let dm = two_region_manager();
    let size = 100 * MIB + 1;

    dm.create_device("d1", size).expect("create");
    assert!(dm.backend().calls().iter().any(|call| matches!(
        call,
        Call::Create { name, size_mib: 100, .. } if name == "d1"
    )));
    // 100 MiB is already extent-aligned, so the sub-MiB remainder is lost
    assert_eq!(dm.get_device("d1").expect("present").size_bytes, 100 * MIB);
}

#[test]
fn first_fit_uses_first_pool_with_room() {
    let dm = two_region_manager();
    dm.create_device("small", GIB).expect("create");
    dm.create_device("large", 3 * GIB).expect("create");

    assert_eq!(
        dm.get_device("small").expect("present").path,
        "/dev/ndbus0region0/small"
    );
    assert_eq!(
        dm.get_device("large").expect("present").path,
        "/dev/ndbus0region1/large"
    );
    assert_eq!(
        dm.backend().create_attempts(),
        vec!["ndbus0region0".to_string(), "ndbus0region1".to_string()]
    );
}

#[test]
fn oversized_request_is_capacity_error_and_changes_nothing() {
    let dm = two_region_manager();
    dm.create_device("d1", GIB).expect("create");
    let before = as_set(dm.list_devices().expect("list"));

    let err = dm.create_device("d2", 7 * GIB).unwrap_err();
    assert!(matches!(
        err,
        ManagerError::Capacity { requested, ref attempts } if requested == 7 * GIB && attempts.is_empty()
    ));
    assert!(dm.backend().calls().iter().all(|call| !matches!(
        call,
        Call::Create { name, .. } if name == "d2"
    )));
    assert_eq!(as_set(dm.list_devices().expect("list")), before);
}

#[test]
fn deleting_missing_device_touches_no_tools() {
    let dm = two_region_manager();
    for erase in [true, false] {
        let err = dm.delete_device("missing", erase).unwrap_err();
        assert!(matches!(err, ManagerError::NotFound(ref name) if name == "missing"));
    }
    assert!(
        dm.backend()
            .calls()
            .iter()
            .all(|call| !matches!(call, Call::Wipe { .. } | Call::Remove { .. }))
    );
}

#[test]
fn erase_failure_aborts_delete_until_erase_succeeds() {
    let dm = two_region_manager();
    dm.create_device("d1", GIB).expect("create");

    dm.backend()
        .fail_wipe(ToolError::retryable("shred", "shred: write error"));
    assert!(matches!(
        dm.delete_device("d1", true),
        Err(ManagerError::Erase { .. })
    ));
    assert!(dm.get_device("d1").is_ok());

    dm.backend().clear_failures();
    dm.delete_device("d1", true).expect("delete after wipe recovers");
    assert!(dm.get_device("d1").is_err());
}

#[test]
fn repeated_listing_is_stable() {
    let dm = two_region_manager();
    dm.create_device("a", GIB).expect("create");
    dm.create_device("b", 2 * GIB).expect("create");

    let first = as_set(dm.list_devices().expect("list"));
    let second = as_set(dm.list_devices().expect("list"));
    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[test]
fn space_is_reusable_after_delete() {
    let dm = two_region_manager();
    dm.create_device("d1", 6 * GIB).expect("fills region1");
    assert_eq!(dm.get_capacity().expect("capacity"), 2 * GIB);

    dm.delete_device("d1", true).expect("delete");
    assert_eq!(dm.get_capacity().expect("capacity"), 6 * GIB);
}
