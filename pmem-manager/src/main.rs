// SPDX-License-Identifier: GPL-3.0-only

//! PMEM device manager command-line front-end

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pmem_manager::{DeviceManager, ManagerConfig, VolumeBackend, logging};
use pmem_sys::{LvmCli, SysfsTopology};
use pmem_types::{bytes_to_pretty, parse_size};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "pmem-device-manager")]
#[command(about = "Provision LVM logical volumes on persistent-memory regions")]
#[command(version)]
struct Args {
    /// Configuration file (defaults to $PMEM_MANAGER_CONFIG, then /etc/pmem-device-manager/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Largest device that can currently be created
    Capacity,
    /// Managed volume groups with their size and free space
    Pools,
    /// Devices in the managed volume groups
    List,
    /// Show one device
    Get { name: String },
    /// Create a device; size in bytes or with a K/M/G/T suffix
    Create {
        name: String,
        #[arg(value_parser = parse_size_arg)]
        size: u64,
    },
    /// Remove a device, wiping it first by default
    Delete {
        name: String,
        /// Wipe before removal even if disabled in the configuration
        #[arg(long, conflicts_with = "no_erase")]
        erase: bool,
        /// Skip the wipe
        #[arg(long)]
        no_erase: bool,
    },
    /// Wipe a device without removing it
    Flush { name: String },
}

fn parse_size_arg(value: &str) -> std::result::Result<u64, String> {
    parse_size(value).map_err(|e| e.to_string())
}

fn print<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

fn run<B: VolumeBackend>(
    manager: &DeviceManager<B>,
    command: Command,
    json: bool,
    config: &ManagerConfig,
) -> Result<()> {
    match command {
        Command::Capacity => {
            let capacity = manager.get_capacity()?;
            print(json, &capacity, || bytes_to_pretty(&capacity, true))
        }
        Command::Pools => {
            let vgs = manager.volume_groups()?;
            print(json, &vgs, || {
                vgs.iter()
                    .map(|vg| {
                        format!(
                            "{}\t{} free of {} ({}% used)",
                            vg.name,
                            bytes_to_pretty(&vg.free_bytes, false),
                            bytes_to_pretty(&vg.total_bytes, false),
                            vg.usage_percent()
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Command::List => {
            let devices = manager.list_devices()?;
            print(json, &devices, || {
                devices
                    .iter()
                    .map(|dev| {
                        format!(
                            "{}\t{}\t{}",
                            dev.name,
                            dev.path,
                            bytes_to_pretty(&dev.size_bytes, false)
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Command::Get { name } => {
            let dev = manager.get_device(&name)?;
            print(json, &dev, || {
                format!(
                    "{}\t{}\t{}",
                    dev.name,
                    dev.path,
                    bytes_to_pretty(&dev.size_bytes, true)
                )
            })
        }
        Command::Create { name, size } => {
            manager.create_device(&name, size)?;
            let dev = manager.get_device(&name)?;
            print(json, &dev, || format!("created {} at {}", dev.name, dev.path))
        }
        Command::Delete {
            name,
            erase,
            no_erase,
        } => {
            let secure_erase = erase || (config.erase_on_delete && !no_erase);
            manager.delete_device(&name, secure_erase)?;
            print(json, &name, || format!("deleted {name}"))
        }
        Command::Flush { name } => {
            manager.flush_device_data(&name)?;
            print(json, &name, || format!("flushed {name}"))
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config =
        ManagerConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    logging::init(&config.logging);

    tracing::debug!(
        "Starting pmem-device-manager v{}",
        env!("CARGO_PKG_VERSION")
    );

    if unsafe { libc::geteuid() } != 0 {
        tracing::error!("pmem-device-manager must run as root");
        anyhow::bail!("LVM operations require root privileges");
    }

    let backend = LvmCli::new(&config.tools).context("LVM tools unavailable")?;
    let topology = SysfsTopology::new(&config.topology.sysfs_root);
    let manager = DeviceManager::new(&topology, backend)?;

    run(&manager, args.command, args.json, &config)
}
