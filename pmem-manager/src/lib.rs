// SPDX-License-Identifier: GPL-3.0-only

//! LVM-backed device manager for persistent-memory regions
//!
//! Every PMEM region is expected to be grouped into its own LVM volume group,
//! named after the bus and region it belongs to. The [`DeviceManager`] carves
//! logical volumes out of those groups, reports capacity, and wipes volumes
//! before handing their space back.
//!
//! All external tools are reached through [`VolumeBackend`]; the production
//! implementation is [`pmem_sys::LvmCli`].

pub mod config;
pub mod eraser;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod manager;
pub mod pools;
pub mod table;

pub use config::{LoggingLevel, ManagerConfig};
pub use eraser::SecureEraser;
pub use error::{ManagerError, Result};
pub use inventory::VolumeGroupInventory;
pub use manager::DeviceManager;
pub use pools::PoolSet;
pub use table::{ParsePolicy, TableError};

pub use pmem_contracts::{TopologySource, VolumeBackend};
pub use pmem_types::{DeviceInfo, VolumeGroupInfo};
