//! # pve_conf
//!
//! A codec for the flat configuration strings used throughout the Proxmox VE
//! API.
//!
//! ## What does it handle?
//!
//! Proxmox encodes device descriptors (disks, network interfaces, PCI
//! passthrough, ...) as `key=value` lists joined by commas:
//!
//! ```text
//! local-lvm:vm-100-disk-0,cache=writeback,size=32G
//! ```
//!
//! This crate decodes such strings into typed records, normalizes disk sizes
//! with SI and IEC suffixes to gibibytes, converts comma-joined lists, and
//! checks membership of users and API tokens in decoded list responses.
//!
//! ## Key Features
//!
//! - **Generic dialect**: separators and the implicit first key are configurable
//! - **Typed values**: every value is narrowed to integer, boolean or text
//! - **Serde bridge**: read device strings straight into your own structs and
//!   write them back
//! - **No panics on input**: every failure is an [`Error`]
//!
//! ## Quick Start
//!
//! ```rust
//! use pve_conf::{parse_pm_conf, disk_size_gib, Scalar};
//!
//! let disk = parse_pm_conf("local-lvm:vm-100-disk-0,cache=writeback,size=32G,ssd=1", "volume");
//!
//! assert_eq!(disk.get_str("volume"), Some("local-lvm:vm-100-disk-0"));
//! assert_eq!(disk.get("ssd"), Some(&Scalar::Integer(1)));
//!
//! let size = disk.get_str("size").unwrap();
//! assert_eq!(disk_size_gib(size).unwrap(), 32.0);
//! ```
//!
//! ### Typed devices
//!
//! ```rust
//! use pve_conf::{from_conf_str, to_conf_string, ConfOptions};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct HostPci {
//!     host: String,
//!     pcie: bool,
//!     #[serde(rename = "x-vga")]
//!     x_vga: Option<bool>,
//! }
//!
//! let options = ConfOptions::pve().with_implicit_first_key("host");
//! let pci: HostPci = from_conf_str("0000:01:00.0,pcie=1", &options).unwrap();
//! assert!(pci.pcie);
//! assert_eq!(to_conf_string(&pci, &options).unwrap(), "0000:01:00.0,pcie=1");
//! ```
//!
//! ### Users and API tokens
//!
//! ```rust
//! use pve_conf::{item_in_key_of_array, ApiValue};
//!
//! let users: ApiValue = serde_json::from_str(
//!     r#"[{"userid": "alice@pve", "tokens": [{"tokenid": "ci"}]}]"#,
//! ).unwrap();
//! let users = users.as_array().unwrap();
//!
//! assert!(item_in_key_of_array(users, "userid", "alice@pve!ci").unwrap());
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (`debug` for dropped tokens, `warn` for
//! unknown size units) and never installs a subscriber.
//!
//! ## Format
//!
//! See the [`format`] module for the grammar.

pub mod csv;
pub mod de;
pub mod device;
pub mod error;
pub mod format;
pub mod lookup;
pub mod macros;
pub mod map;
pub mod options;
pub mod parse;
pub mod ser;
pub mod size;
pub mod value;

pub use csv::{
    add_to_list, array_to_csv, array_to_string_type, csv_to_array, parse_header_list,
    values_to_csv,
};
pub use de::{from_conf_str, from_device, DeviceDeserializer};
pub use device::{Device, Scalar};
pub use error::{Error, Result};
pub use lookup::{extract_token_id, item_in_key_of_array};
pub use map::ApiMap;
pub use options::ConfOptions;
pub use parse::{coerce, parse_bool, parse_conf, parse_conf_strict, parse_pm_conf, parse_sub_conf};
pub use ser::{to_conf_string, to_device, to_value, ApiValueSerializer};
pub use size::{disk_size_gib, disk_size_gib_value, DiskSize, SizeUnit};
pub use value::{ApiValue, Number};
