// SPDX-License-Identifier: GPL-3.0-only

use pmem_contracts::VolumeBackend;
use pmem_types::DeviceInfo;
use tracing::{debug, info};

use crate::{ManagerError, Result};

/// Overwrites device contents with a single pass.
///
/// One pass instead of shred's default of three: the media never leaves the
/// administrative domain it was provisioned in.
pub struct SecureEraser<'a, B: ?Sized> {
    backend: &'a B,
}

impl<'a, B: VolumeBackend + ?Sized> SecureEraser<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    pub fn erase(&self, device: &DeviceInfo) -> Result<()> {
        info!("Wiping data of {} at {}", device.name, device.path);
        let output = self
            .backend
            .wipe_device(&device.path)
            .map_err(|source| ManagerError::Erase {
                path: device.path.clone(),
                source,
            })?;
        debug!("{} output: {}", output.command, output.combined());
        Ok(())
    }
}
