// SPDX-License-Identifier: GPL-3.0-only

//! Volume group capacity queries

use pmem_contracts::VolumeBackend;
use pmem_types::VolumeGroupInfo;
use tracing::debug;

use crate::table::{ParsePolicy, TableError, parse_table};
use crate::{ManagerError, Result};

/// Parse `vg_name vg_size vg_free` lines.
///
/// Capacity decisions need every line intact, so any malformed line,
/// including one reporting more free than total space, fails the parse.
pub fn parse_vgs(output: &str) -> std::result::Result<Vec<VolumeGroupInfo>, TableError> {
    parse_table(output, 3, ParsePolicy::Strict, |cols| {
        let total: u64 = cols[1].parse().ok()?;
        let free: u64 = cols[2].parse().ok()?;
        (free <= total).then(|| VolumeGroupInfo::new(cols[0], total, free))
    })
}

pub struct VolumeGroupInventory<'a, B: ?Sized> {
    backend: &'a B,
}

impl<'a, B: VolumeBackend + ?Sized> VolumeGroupInventory<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Query size and free space of exactly `pools`.
    ///
    /// Every pool must appear in the output; a missing one would silently
    /// drop out of capacity and allocation.
    ///
    /// An empty pool list yields no records without invoking the tool, since
    /// an unscoped query would report every volume group on the host.
    pub fn query(&self, pools: &[String]) -> Result<Vec<VolumeGroupInfo>> {
        if pools.is_empty() {
            return Ok(Vec::new());
        }

        let output = self
            .backend
            .query_volume_groups(pools)
            .map_err(ManagerError::Query)?;

        let vgs = parse_vgs(&output.stdout).map_err(|source| ManagerError::Parse {
            command: output.command.clone(),
            source,
        })?;

        let missing: Vec<String> = pools
            .iter()
            .filter(|pool| !vgs.iter().any(|vg| &vg.name == *pool))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ManagerError::Incomplete {
                command: output.command,
                missing,
            });
        }

        debug!("Found {} volume groups", vgs.len());
        Ok(vgs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vgs_line() {
        let vgs = parse_vgs("  vg0 1073741824 536870912\n").expect("valid vgs output");
        assert_eq!(vgs, vec![VolumeGroupInfo::new("vg0", 1073741824, 536870912)]);
    }

    #[test]
    fn garbage_line_fails_the_query() {
        let err = parse_vgs("  vg0 1073741824 536870912\ngarbage\n").unwrap_err();
        assert_eq!(err.line, "garbage");
    }

    #[test]
    fn rejects_free_above_total() {
        assert!(parse_vgs("vg0 100 200\n").is_err());
        assert!(parse_vgs("vg0 100 100\n").is_ok());
    }

    #[test]
    fn rejects_unit_suffixes() {
        assert!(parse_vgs("vg0 1073741824B 536870912B\n").is_err());
    }
}
