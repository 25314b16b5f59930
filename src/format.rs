//! Proxmox flat configuration format
//!
//! This module documents the string formats handled by this crate. It
//! contains no code.
//!
//! # Device strings
//!
//! Proxmox stores most device options in a single string per device:
//!
//! ```text
//! scsi0: local-lvm:vm-100-disk-0,cache=writeback,discard=on,size=32G
//! net0:  virtio=BC:24:11:2E:2B:6A,bridge=vmbr0,firewall=1,tag=20
//! ```
//!
//! ## Grammar
//!
//! ```text
//! conf   = token *( SEP token )
//! token  = key SUB value / bare
//! key    = <any text not containing SUB>
//! value  = <any text not containing SEP>
//! bare   = <any text not containing SUB>
//! ```
//!
//! `SEP` defaults to `,` and `SUB` to `=`. Both are configurable through
//! [`ConfOptions`](crate::ConfOptions) so other dialects (`a:1;b:2`) parse
//! with the same rules.
//!
//! **Rules**:
//! - A token is split on the **first** `SUB` only: `args=-cpu=host` has the
//!   key `args` and the value `-cpu=host`
//! - A `bare` token is only meaningful in first position, and only when an
//!   implicit first key is configured (`storage`, `model`, `volume`, ...)
//! - Anywhere else a bare token is dropped by
//!   [`parse_conf`](crate::parse_conf) and rejected by
//!   [`parse_conf_strict`](crate::parse_conf_strict)
//! - Empty tokens from `,,` or a trailing `,` are ignored
//! - A token with an empty key (`=orphan`) counts as bare, so keys are never empty
//! - A repeated key keeps its last value
//!
//! ## Values
//!
//! | Raw | Scalar | Notes |
//! |-----|--------|-------|
//! | `20`, `-1`, `+3` | `Integer` | full signed 64-bit parse |
//! | `1`, `0` | `Integer` | integer rule wins over boolean |
//! | `t`, `true`, `TRUE`, `True`, `f`, `false`, `FALSE`, `False`, `T`, `F` | `Bool` | |
//! | `1.5`, `32G`, `writeback` | `Text` | no float inference |
//!
//! When a record is written back, booleans become `1`/`0` and the implicit
//! key's value goes first without a key.
//!
//! # Disk sizes
//!
//! ```text
//! size   = 1*DIGIT [ suffix ]
//! suffix = "T" / "TiB" / "G" / "GiB" / "M" / "MiB" / "K" / "KiB"
//!        / "TB" / "GB" / "MB" / "KB"
//! ```
//!
//! Suffixes are case-insensitive. The single-letter and `iB` forms are binary
//! (1024-based); the `B` forms are decimal. A size without a suffix is already
//! in gibibytes.
//!
//! # Lists
//!
//! List parameters are joined with `,` and never trimmed:
//!
//! ```text
//! groups: admins,ops
//! ```
//!
//! Header lists alternate names and values:
//!
//! ```text
//! X-Request-Source,automation,X-Team,infra
//! ```
//!
//! # API tokens
//!
//! An API token id has the form `user@realm!tokenid`. Only lowercase letters
//! and digits are recognized in each part when extracting the token id.
