//! Disk-size normalization.
//!
//! Proxmox reports disk sizes either as strings with a unit suffix (`32G`,
//! `500MB`, `1TiB`) or as plain numbers. [`disk_size_gib`] brings both to a
//! common unit, gibibytes, so sizes can be compared and summed.
//!
//! ## Units
//!
//! | Suffix | Bytes | Family |
//! |--------|-------|--------|
//! | `T`, `TiB` | 2^40 | IEC |
//! | `G`, `GiB` | 2^30 | IEC |
//! | `M`, `MiB` | 2^20 | IEC |
//! | `K`, `KiB` | 2^10 | IEC |
//! | `TB` | 10^12 | SI |
//! | `GB` | 10^9 | SI |
//! | `MB` | 10^6 | SI |
//! | `KB` | 10^3 | SI |
//!
//! Suffixes are matched case-insensitively. A string without a suffix is
//! already in gibibytes. A suffix outside the table leaves the magnitude
//! unscaled, so `"512B"` normalizes to `512.0`; this is logged at `warn` level
//! and kept because callers depend on the reported numbers.
//!
//! ## Examples
//!
//! ```rust
//! use pve_conf::disk_size_gib;
//!
//! assert_eq!(disk_size_gib("1GiB").unwrap(), 1.0);
//! assert_eq!(disk_size_gib("1024M").unwrap(), 1.0);
//! assert_eq!(disk_size_gib(2.5).unwrap(), 2.5);
//! assert_eq!(disk_size_gib("10").unwrap(), 10.0);
//! ```

use crate::{ApiValue, Error, Result};
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

/// Bytes in one gibibyte.
pub const GIB: f64 = 1_073_741_824.0;

static SIZE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)([A-Z]*)$").expect("size pattern is valid"));

/// A size-bearing value as it arrives from the API.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DiskSize<'a> {
    /// Magnitude with an optional unit suffix.
    Text(&'a str),
    /// A number already expressed in gibibytes.
    Gib(f64),
}

impl<'a> From<&'a str> for DiskSize<'a> {
    fn from(value: &'a str) -> Self {
        DiskSize::Text(value)
    }
}

impl<'a> From<&'a String> for DiskSize<'a> {
    fn from(value: &'a String) -> Self {
        DiskSize::Text(value)
    }
}

impl From<f64> for DiskSize<'_> {
    fn from(value: f64) -> Self {
        DiskSize::Gib(value)
    }
}

/// A recognized unit suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeUnit {
    TiB,
    GiB,
    MiB,
    KiB,
    TB,
    GB,
    MB,
    KB,
}

impl SizeUnit {
    /// Resolves an uppercased suffix. `G` and `GB` are different units.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pve_conf::SizeUnit;
    ///
    /// assert_eq!(SizeUnit::from_suffix("G"), Some(SizeUnit::GiB));
    /// assert_eq!(SizeUnit::from_suffix("GIB"), Some(SizeUnit::GiB));
    /// assert_eq!(SizeUnit::from_suffix("GB"), Some(SizeUnit::GB));
    /// assert_eq!(SizeUnit::from_suffix("B"), None);
    /// ```
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "T" | "TIB" => Some(SizeUnit::TiB),
            "G" | "GIB" => Some(SizeUnit::GiB),
            "M" | "MIB" => Some(SizeUnit::MiB),
            "K" | "KIB" => Some(SizeUnit::KiB),
            "TB" => Some(SizeUnit::TB),
            "GB" => Some(SizeUnit::GB),
            "MB" => Some(SizeUnit::MB),
            "KB" => Some(SizeUnit::KB),
            _ => None,
        }
    }

    /// Number of bytes in one unit.
    #[must_use]
    pub const fn bytes(self) -> f64 {
        match self {
            SizeUnit::TiB => 1_099_511_627_776.0,
            SizeUnit::GiB => 1_073_741_824.0,
            SizeUnit::MiB => 1_048_576.0,
            SizeUnit::KiB => 1_024.0,
            SizeUnit::TB => 1_000_000_000_000.0,
            SizeUnit::GB => 1_000_000_000.0,
            SizeUnit::MB => 1_000_000.0,
            SizeUnit::KB => 1_000.0,
        }
    }
}

/// Converts a disk size to gibibytes.
///
/// Numbers are returned unchanged. Strings are parsed as
/// `<digits><optional suffix>`, see the [module docs](self) for the unit table.
/// Whitespace around the string is ignored; whitespace inside it is not.
///
/// # Errors
///
/// Returns [`Error::Parse`] when the string has no numeric magnitude or
/// contains anything besides digits followed by letters.
///
/// # Examples
///
/// ```rust
/// use pve_conf::disk_size_gib;
///
/// let si = disk_size_gib("1GB").unwrap();
/// assert!((si - 0.9313).abs() < 1e-4);
/// assert_eq!(disk_size_gib("2t").unwrap(), 2048.0);
/// assert!(disk_size_gib("GiB").is_err());
/// ```
pub fn disk_size_gib<'a>(size: impl Into<DiskSize<'a>>) -> Result<f64> {
    let text = match size.into() {
        DiskSize::Gib(gib) => return Ok(gib),
        DiskSize::Text(text) => text,
    };

    let upper = text.trim().to_uppercase();
    let caps = SIZE_PATTERN
        .captures(&upper)
        .ok_or_else(|| Error::parse(text, "expected digits followed by an optional unit"))?;

    let magnitude: f64 = caps[1]
        .parse()
        .map_err(|_| Error::parse(text, "magnitude is not a number"))?;
    let suffix = &caps[2];

    if suffix.is_empty() {
        return Ok(magnitude);
    }
    match SizeUnit::from_suffix(suffix) {
        Some(unit) => Ok(magnitude * unit.bytes() / GIB),
        None => {
            warn!(
                size = text,
                suffix, "unknown size unit, treating magnitude as GiB"
            );
            Ok(magnitude)
        }
    }
}

/// Converts a size taken from a decoded API payload.
///
/// Accepts the `String` and `Number` variants.
///
/// # Errors
///
/// Returns [`Error::Type`] for any other variant, or the errors of
/// [`disk_size_gib`] for a malformed string.
///
/// # Examples
///
/// ```rust
/// use pve_conf::{disk_size_gib_value, ApiValue};
///
/// assert_eq!(disk_size_gib_value(&ApiValue::from("512M")).unwrap(), 0.5);
/// assert_eq!(disk_size_gib_value(&ApiValue::from(8)).unwrap(), 8.0);
/// assert!(disk_size_gib_value(&ApiValue::Null).is_err());
/// ```
pub fn disk_size_gib_value(value: &ApiValue) -> Result<f64> {
    match value {
        ApiValue::String(s) => disk_size_gib(s.as_str()),
        ApiValue::Number(n) => disk_size_gib(n.as_f64()),
        other => Err(Error::type_mismatch("string or number", other.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iec_units() {
        assert_eq!(disk_size_gib("1T").unwrap(), 1024.0);
        assert_eq!(disk_size_gib("1TiB").unwrap(), 1024.0);
        assert_eq!(disk_size_gib("32G").unwrap(), 32.0);
        assert_eq!(disk_size_gib("1024MiB").unwrap(), 1.0);
        assert_eq!(disk_size_gib("1048576K").unwrap(), 1.0);
        assert_eq!(disk_size_gib("1048576kib").unwrap(), 1.0);
    }

    #[test]
    fn test_si_units_differ_from_iec() {
        let gb = disk_size_gib("1GB").unwrap();
        let g = disk_size_gib("1G").unwrap();
        assert!((gb - 1e9 / GIB).abs() < f64::EPSILON);
        assert!(gb < g);

        assert!((disk_size_gib("1TB").unwrap() - 1e12 / GIB).abs() < 1e-9);
        assert!((disk_size_gib("500MB").unwrap() - 5e8 / GIB).abs() < 1e-12);
        assert!((disk_size_gib("2kb").unwrap() - 2e3 / GIB).abs() < 1e-15);
    }

    #[test]
    fn test_unitless_and_numeric_passthrough() {
        assert_eq!(disk_size_gib("10").unwrap(), 10.0);
        assert_eq!(disk_size_gib(" 10 ").unwrap(), 10.0);
        assert_eq!(disk_size_gib(0.25).unwrap(), 0.25);
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(disk_size_gib(" 32G\n").unwrap(), 32.0);
        assert_eq!(disk_size_gib("\t1TiB").unwrap(), 1024.0);
        assert!(matches!(disk_size_gib("3 2G"), Err(Error::Parse { .. })));
        assert!(matches!(disk_size_gib("32 G"), Err(Error::Parse { .. })));
        assert!(matches!(disk_size_gib("   "), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_numeric_output_is_fixed_point() {
        let once = disk_size_gib("3072M").unwrap();
        assert_eq!(disk_size_gib(once).unwrap(), once);
    }

    #[test]
    fn test_unknown_suffix_is_unscaled() {
        assert_eq!(disk_size_gib("512B").unwrap(), 512.0);
        assert_eq!(disk_size_gib("7PB").unwrap(), 7.0);
    }

    #[test]
    fn test_malformed_magnitude() {
        assert!(matches!(disk_size_gib(""), Err(Error::Parse { .. })));
        assert!(matches!(disk_size_gib("G"), Err(Error::Parse { .. })));
        assert!(matches!(disk_size_gib("1.5G"), Err(Error::Parse { .. })));
        assert!(matches!(disk_size_gib("-4G"), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_api_value_variants() {
        assert_eq!(disk_size_gib_value(&ApiValue::from("2G")).unwrap(), 2.0);
        assert_eq!(disk_size_gib_value(&ApiValue::from(1.5)).unwrap(), 1.5);
        assert_eq!(
            disk_size_gib_value(&ApiValue::Bool(true)).unwrap_err(),
            Error::type_mismatch("string or number", "bool")
        );
    }
}
