// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;

use pmem_types::RegionRef;

/// Ordered, immutable set of volume-group names managed by one device
/// manager. The order is the allocation order used when creating devices.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PoolSet {
    names: Arc<[String]>,
}

impl PoolSet {
    pub fn from_regions(regions: &[RegionRef]) -> Self {
        regions.iter().map(RegionRef::volume_group_name).collect()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<String> for PoolSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}
