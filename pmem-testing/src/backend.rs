// SPDX-License-Identifier: GPL-3.0-only

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use pmem_contracts::{ToolError, ToolOutput, VolumeBackend, render};
use pmem_types::MIB;
use tracing::debug;

/// Allocation granularity, matching LVM's default extent size.
pub const EXTENT_MIB: u64 = 4;

/// One recorded backend invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    QueryGroups { groups: Vec<String> },
    ListVolumes { groups: Vec<String> },
    Create { name: String, size_mib: u64, group: String },
    Remove { path: String },
    Wipe { path: String },
}

#[derive(Debug, Clone)]
struct Group {
    total: u64,
    free: u64,
}

#[derive(Debug, Clone)]
struct Volume {
    group: String,
    size: u64,
}

#[derive(Debug, Default)]
struct State {
    order: Vec<String>,
    groups: BTreeMap<String, Group>,
    volumes: BTreeMap<String, Volume>,
    calls: Vec<Call>,
    create_failures: BTreeMap<String, ToolError>,
    query_failure: Option<ToolError>,
    list_failure: Option<ToolError>,
    remove_failure: Option<ToolError>,
    wipe_failure: Option<ToolError>,
    vgs_override: Option<String>,
    lvs_override: Option<String>,
}

impl State {
    fn path_of(group: &str, name: &str) -> String {
        format!("/dev/{group}/{name}")
    }

    fn volume_at(&self, path: &str) -> Option<String> {
        self.volumes
            .iter()
            .find(|(name, volume)| Self::path_of(&volume.group, name) == path)
            .map(|(name, _)| name.clone())
    }
}

/// In-memory stand-in for the LVM and shred tools.
///
/// Failures injected with the `fail_*` methods persist until
/// [`FakeVolumeBackend::clear_failures`] is called.
#[derive(Debug, Default)]
pub struct FakeVolumeBackend {
    state: Mutex<State>,
}

impl FakeVolumeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a volume group of `total` bytes of which `free` are unallocated.
    pub fn with_group(self, name: &str, total: u64, free: u64) -> Self {
        {
            let mut state = self.state();
            state.order.push(name.to_string());
            state
                .groups
                .insert(name.to_string(), Group { total, free });
        }
        self
    }

    /// Volume group names in the order they were added.
    pub fn group_names(&self) -> Vec<String> {
        self.state().order.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    /// Volume groups that received a create call, in call order.
    pub fn create_attempts(&self) -> Vec<String> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Create { group, .. } => Some(group.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn free_bytes(&self, group: &str) -> Option<u64> {
        self.state().groups.get(group).map(|g| g.free)
    }

    pub fn fail_create_in(&self, group: &str, error: ToolError) {
        self.state()
            .create_failures
            .insert(group.to_string(), error);
    }

    pub fn fail_query(&self, error: ToolError) {
        self.state().query_failure = Some(error);
    }

    pub fn fail_list(&self, error: ToolError) {
        self.state().list_failure = Some(error);
    }

    pub fn fail_remove(&self, error: ToolError) {
        self.state().remove_failure = Some(error);
    }

    pub fn fail_wipe(&self, error: ToolError) {
        self.state().wipe_failure = Some(error);
    }

    pub fn clear_failures(&self) {
        let mut state = self.state();
        state.create_failures.clear();
        state.query_failure = None;
        state.list_failure = None;
        state.remove_failure = None;
        state.wipe_failure = None;
    }

    /// Answer volume group queries with `text` instead of the modelled state.
    pub fn override_vgs_output(&self, text: &str) {
        self.state().vgs_override = Some(text.to_string());
    }

    /// Answer volume listings with `text` instead of the modelled state.
    pub fn override_lvs_output(&self, text: &str) {
        self.state().lvs_override = Some(text.to_string());
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl VolumeBackend for FakeVolumeBackend {
    fn query_volume_groups(&self, groups: &[String]) -> Result<ToolOutput, ToolError> {
        let mut state = self.state();
        state.calls.push(Call::QueryGroups {
            groups: groups.to_vec(),
        });
        let command = render("vgs", groups);

        if let Some(error) = state.query_failure.clone() {
            return Err(error);
        }
        if let Some(text) = state.vgs_override.clone() {
            return Ok(ToolOutput::new(command, text));
        }

        let mut stdout = String::new();
        // vgs reports in name order regardless of argument order
        for (name, group) in &state.groups {
            if groups.contains(name) {
                stdout.push_str(&format!("  {name} {} {}\n", group.total, group.free));
            }
        }
        if let Some(missing) = groups.iter().find(|g| !state.groups.contains_key(*g)) {
            return Err(ToolError::retryable(
                command,
                format!("Volume group \"{missing}\" not found"),
            ));
        }

        Ok(ToolOutput::new(command, stdout))
    }

    fn list_volumes(&self, groups: &[String]) -> Result<ToolOutput, ToolError> {
        let mut state = self.state();
        state.calls.push(Call::ListVolumes {
            groups: groups.to_vec(),
        });
        let command = render("lvs", groups);

        if let Some(error) = state.list_failure.clone() {
            return Err(error);
        }
        if let Some(text) = state.lvs_override.clone() {
            return Ok(ToolOutput::new(command, text));
        }

        let mut stdout = String::new();
        for (name, volume) in &state.volumes {
            if groups.contains(&volume.group) {
                stdout.push_str(&format!(
                    "  {name} {} {}\n",
                    State::path_of(&volume.group, name),
                    volume.size
                ));
            }
        }

        Ok(ToolOutput::new(command, stdout))
    }

    fn create_volume(
        &self,
        name: &str,
        size_mib: u64,
        group: &str,
    ) -> Result<ToolOutput, ToolError> {
        let mut state = self.state();
        state.calls.push(Call::Create {
            name: name.to_string(),
            size_mib,
            group: group.to_string(),
        });
        let command = format!("lvcreate -L {size_mib} -n {name} {group}");

        if let Some(error) = state.create_failures.get(group).cloned() {
            return Err(error);
        }
        if state.volumes.contains_key(name) {
            return Err(ToolError::fatal(
                command,
                format!("Logical Volume \"{name}\" already exists in volume group \"{group}\""),
            ));
        }

        let size = size_mib.div_ceil(EXTENT_MIB) * EXTENT_MIB * MIB;
        let Some(vg) = state.groups.get_mut(group) else {
            return Err(ToolError::retryable(
                command,
                format!("Volume group \"{group}\" not found"),
            ));
        };
        if vg.free < size {
            return Err(ToolError::retryable(
                command,
                format!("Volume group \"{group}\" has insufficient free space"),
            ));
        }
        vg.free -= size;

        state.volumes.insert(
            name.to_string(),
            Volume {
                group: group.to_string(),
                size,
            },
        );
        debug!("fake: created {name} ({size} bytes) in {group}");

        Ok(ToolOutput::new(
            command,
            format!("  Logical volume \"{name}\" created.\n"),
        ))
    }

    fn remove_volume(&self, path: &str) -> Result<ToolOutput, ToolError> {
        let mut state = self.state();
        state.calls.push(Call::Remove {
            path: path.to_string(),
        });
        let command = format!("lvremove -fy {path}");

        if let Some(error) = state.remove_failure.clone() {
            return Err(error);
        }
        let Some(name) = state.volume_at(path) else {
            return Err(ToolError::retryable(
                command,
                format!("Failed to find logical volume \"{path}\""),
            ));
        };

        if let Some(volume) = state.volumes.remove(&name) {
            if let Some(vg) = state.groups.get_mut(&volume.group) {
                vg.free += volume.size;
            }
        }

        Ok(ToolOutput::new(
            command,
            format!("  Logical volume \"{name}\" successfully removed.\n"),
        ))
    }

    fn wipe_device(&self, path: &str) -> Result<ToolOutput, ToolError> {
        let mut state = self.state();
        state.calls.push(Call::Wipe {
            path: path.to_string(),
        });
        let command = format!("shred --iterations=1 {path}");

        if let Some(error) = state.wipe_failure.clone() {
            return Err(error);
        }
        if state.volume_at(path).is_none() {
            return Err(ToolError::retryable(
                command,
                format!("shred: {path}: failed to open for writing: No such file or directory"),
            ));
        }

        Ok(ToolOutput::new(command, String::new()))
    }
}
