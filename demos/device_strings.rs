//! Decoding and re-encoding Proxmox device strings.
//!
//! Run with: RUST_LOG=debug cargo run --example device_strings

use pve_conf::{disk_size_gib, from_conf_str, parse_pm_conf, to_conf_string, ConfOptions};
use serde::{Deserialize, Serialize};
use std::error::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Serialize, Deserialize)]
struct Disk {
    volume: String,
    size: String,
    cache: Option<String>,
    #[serde(default)]
    ssd: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let scsi0 = "local-lvm:vm-100-disk-0,cache=writeback,iothread=1,size=32G";
    let record = parse_pm_conf(scsi0, "volume");
    println!("scsi0 as a record:");
    for (key, value) in &record {
        println!("  {:<10} {:<8} {}", key, value.type_name(), value);
    }

    // A bare token in the middle is dropped (logged at debug level)
    let sloppy = parse_pm_conf("local-lvm:vm-100-disk-1,backup,size=8G", "volume");
    println!("\nkeys of a string with a bare token: {:?}", sloppy.keys().collect::<Vec<_>>());

    let options = ConfOptions::pve().with_implicit_first_key("volume");
    let mut disk: Disk = from_conf_str(scsi0, &options)?;
    println!("\ntyped: {:?}", disk);
    println!("size in GiB: {}", disk_size_gib(disk.size.as_str())?);

    disk.ssd = true;
    disk.size = "64G".to_string();
    println!("re-encoded: {}", to_conf_string(&disk, &options)?);

    // Unknown units are passed through unscaled (logged at warn level)
    println!("\n\"512B\" in GiB: {}", disk_size_gib("512B")?);

    Ok(())
}
