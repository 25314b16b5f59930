//! Flat configuration string parsing.
//!
//! Proxmox describes devices with strings such as
//! `local-lvm:vm-100-disk-0,cache=writeback,size=32G`. This module splits such
//! strings into a [`Device`] record:
//!
//! 1. the input is split on the top-level separator (`,`),
//! 2. an unlabeled first token is stored under the implicit key, if one is
//!    configured,
//! 3. every other token is split once on the sub-separator (`=`) and its
//!    value coerced with [`coerce`].
//!
//! ## Value coercion
//!
//! | Raw value | Result |
//! |-----------|--------|
//! | full signed base-10 integer (`42`, `-1`, `0`) | [`Scalar::Integer`] |
//! | `t`, `T`, `TRUE`, `true`, `True`, `f`, `F`, `FALSE`, `false`, `False` | [`Scalar::Bool`] |
//! | anything else (`32G`, `1.5`, `writeback`) | [`Scalar::Text`] |
//!
//! `1` and `0` are boolean literals too, but the integer rule runs first. No
//! float inference is done, so values like `1.50` keep their exact text.

use crate::{ConfOptions, Device, Error, Result, Scalar};
use tracing::debug;

/// Parses a boolean literal.
///
/// Accepts exactly `1`, `t`, `T`, `TRUE`, `true`, `True`, `0`, `f`, `F`,
/// `FALSE`, `false` and `False`.
///
/// # Examples
///
/// ```rust
/// use pve_conf::parse_bool;
///
/// assert_eq!(parse_bool("True"), Some(true));
/// assert_eq!(parse_bool("f"), Some(false));
/// assert_eq!(parse_bool("tRuE"), None);
/// assert_eq!(parse_bool("yes"), None);
/// ```
#[must_use]
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Narrows a raw value to the most specific scalar type.
///
/// # Examples
///
/// ```rust
/// use pve_conf::{coerce, Scalar};
///
/// assert_eq!(coerce("42"), Scalar::Integer(42));
/// assert_eq!(coerce("true"), Scalar::Bool(true));
/// assert_eq!(coerce("hello"), Scalar::Text("hello".to_string()));
/// assert_eq!(coerce("12abc"), Scalar::Text("12abc".to_string()));
/// ```
#[must_use]
pub fn coerce(raw: &str) -> Scalar {
    if let Ok(i) = raw.parse::<i64>() {
        Scalar::Integer(i)
    } else if let Some(b) = parse_bool(raw) {
        Scalar::Bool(b)
    } else {
        Scalar::Text(raw.to_string())
    }
}

/// Splits one `key=value` token on the first occurrence of `sub_separator`.
///
/// Returns `None` when the token does not contain the separator, when the
/// separator is empty, or when the key in front of it is empty. Such a token
/// has no key and no determinable value.
///
/// # Examples
///
/// ```rust
/// use pve_conf::{parse_sub_conf, Scalar};
///
/// assert_eq!(
///     parse_sub_conf("size=32G", "="),
///     Some(("size".to_string(), Scalar::Text("32G".to_string())))
/// );
/// assert_eq!(
///     parse_sub_conf("mbps_rd=100", "="),
///     Some(("mbps_rd".to_string(), Scalar::Integer(100)))
/// );
/// assert_eq!(parse_sub_conf("virtio", "="), None);
/// assert_eq!(parse_sub_conf("=orphan", "="), None);
/// ```
#[must_use]
pub fn parse_sub_conf(token: &str, sub_separator: &str) -> Option<(String, Scalar)> {
    if sub_separator.is_empty() {
        return None;
    }
    match token.split_once(sub_separator)? {
        ("", _) => None,
        (key, raw) => Some((key.to_string(), coerce(raw))),
    }
}

pub(crate) fn split_tokens<'a>(input: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        vec![input]
    } else {
        input.split(separator).collect()
    }
}

/// Splits off the implicit first value, returning the remaining tokens.
fn take_implicit<'a, 'b>(
    tokens: &'b [&'a str],
    options: &ConfOptions,
    device: &mut Device,
) -> &'b [&'a str] {
    if let (Some(key), Some(first)) = (options.implicit_key(), tokens.first()) {
        if options.sub_separator.is_empty() || !first.contains(options.sub_separator.as_str()) {
            device.insert(key.to_string(), Scalar::Text((*first).to_string()));
            return &tokens[1..];
        }
    }
    tokens
}

/// Parses a composite configuration string into a [`Device`].
///
/// Tokens without the sub-separator or with an empty key (including the empty
/// tokens produced by consecutive or trailing separators) are dropped. Repeated keys keep the
/// last value.
///
/// # Examples
///
/// ```rust
/// use pve_conf::{parse_conf, ConfOptions, Scalar};
///
/// let options = ConfOptions::new().with_implicit_first_key("storage");
/// let disk = parse_conf("local-lvm,format=qcow2", &options);
///
/// assert_eq!(disk.len(), 2);
/// assert_eq!(disk.get_str("storage"), Some("local-lvm"));
/// assert_eq!(disk.get_str("format"), Some("qcow2"));
/// ```
#[must_use]
pub fn parse_conf(input: &str, options: &ConfOptions) -> Device {
    let tokens = split_tokens(input, &options.separator);
    let mut device = Device::new();
    let rest = take_implicit(&tokens, options, &mut device);

    for token in rest {
        match parse_sub_conf(token, &options.sub_separator) {
            Some((key, value)) => {
                device.insert(key, value);
            }
            None => debug!(token = *token, "dropping token without key separator"),
        }
    }
    device
}

/// Parses a Proxmox device string (`,` between tokens, `=` between key and value).
///
/// An empty `implicit_first_key` disables the implicit key.
///
/// # Examples
///
/// ```rust
/// use pve_conf::parse_pm_conf;
///
/// let hostpci = parse_pm_conf("0000:01:00.0,pcie=1,x-vga=1", "host");
/// assert_eq!(hostpci.get_str("host"), Some("0000:01:00.0"));
/// assert_eq!(hostpci.get_bool("pcie"), Some(true));
/// ```
#[must_use]
pub fn parse_pm_conf(input: &str, implicit_first_key: &str) -> Device {
    parse_conf(
        input,
        &ConfOptions::pve().with_implicit_first_key(implicit_first_key),
    )
}

/// Parses a composite configuration string, rejecting bare tokens.
///
/// Same grammar as [`parse_conf`], except that a non-empty token without the
/// sub-separator or with an empty key, other than the implicit first value,
/// is an error. Empty
/// tokens are still skipped.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] naming the first offending token.
///
/// # Examples
///
/// ```rust
/// use pve_conf::{parse_conf_strict, ConfOptions, Error};
///
/// let options = ConfOptions::pve();
/// assert!(parse_conf_strict("bridge=vmbr0,", &options).is_ok());
/// assert!(matches!(
///     parse_conf_strict("bridge=vmbr0,firewall", &options),
///     Err(Error::MalformedInput { .. })
/// ));
/// ```
pub fn parse_conf_strict(input: &str, options: &ConfOptions) -> Result<Device> {
    let tokens = split_tokens(input, &options.separator);
    let mut device = Device::new();
    let rest = take_implicit(&tokens, options, &mut device);

    for token in rest.iter().filter(|token| !token.is_empty()) {
        let (key, value) = parse_sub_conf(token, &options.sub_separator).ok_or_else(|| {
            Error::malformed(
                token,
                &format!("expected key{}value", options.sub_separator),
            )
        })?;
        device.insert(key, value);
    }
    Ok(device)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_precedence() {
        assert_eq!(coerce("1"), Scalar::Integer(1));
        assert_eq!(coerce("0"), Scalar::Integer(0));
        assert_eq!(coerce("-7"), Scalar::Integer(-7));
        assert_eq!(coerce("T"), Scalar::Bool(true));
        assert_eq!(coerce("False"), Scalar::Bool(false));
        assert_eq!(coerce("1.5"), Scalar::Text("1.5".to_string()));
        assert_eq!(coerce(""), Scalar::Text(String::new()));
    }

    #[test]
    fn test_coerce_integer_overflow_stays_text() {
        assert_eq!(
            coerce("99999999999999999999"),
            Scalar::Text("99999999999999999999".to_string())
        );
    }

    #[test]
    fn test_sub_conf_splits_on_first_separator() {
        assert_eq!(
            parse_sub_conf("args=-cpu=host", "="),
            Some(("args".to_string(), Scalar::Text("-cpu=host".to_string())))
        );
        assert_eq!(
            parse_sub_conf("empty=", "="),
            Some(("empty".to_string(), Scalar::Text(String::new())))
        );
        assert_eq!(parse_sub_conf("anything", ""), None);
    }

    #[test]
    fn test_empty_key_dropped_and_rejected() {
        assert_eq!(parse_sub_conf("=1", "="), None);
        assert_eq!(parse_sub_conf("==", "="), None);

        let device = parse_pm_conf("=orphan,size=4G", "");
        assert!(!device.contains_key(""));
        assert_eq!(device.len(), 1);

        let err = parse_conf_strict("size=4G,=orphan", &ConfOptions::pve()).unwrap_err();
        assert_eq!(err, Error::malformed("=orphan", "expected key=value"));
    }

    #[test]
    fn test_parse_conf_trailing_and_repeated() {
        let device = parse_pm_conf("a=1,,b=x,a=2,", "");
        assert_eq!(device.len(), 2);
        assert_eq!(device.get_i64("a"), Some(2));
        assert_eq!(device.get_str("b"), Some("x"));
    }

    #[test]
    fn test_parse_conf_drops_bare_first_token_without_implicit_key() {
        let device = parse_pm_conf("local-lvm,format=qcow2", "");
        assert_eq!(device.len(), 1);
        assert!(!device.contains_key("local-lvm"));
        assert!(!device.contains_key(""));
    }

    #[test]
    fn test_implicit_key_skipped_when_first_token_is_keyed() {
        let device = parse_pm_conf("file=local:iso/x.iso,media=cdrom", "file");
        assert_eq!(device.get_str("file"), Some("local:iso/x.iso"));
        assert_eq!(device.get_str("media"), Some("cdrom"));
    }

    #[test]
    fn test_empty_input_with_implicit_key() {
        let device = parse_pm_conf("", "storage");
        assert_eq!(device.get_str("storage"), Some(""));
        assert!(parse_pm_conf("", "").is_empty());
    }

    #[test]
    fn test_custom_dialect() {
        let options = ConfOptions::new()
            .with_separator(";")
            .with_sub_separator(":")
            .with_implicit_first_key("name");
        let device = parse_conf("eth0;mtu:1500;up:true", &options);
        assert_eq!(device.get_str("name"), Some("eth0"));
        assert_eq!(device.get_i64("mtu"), Some(1500));
        assert_eq!(device.get("up"), Some(&Scalar::Bool(true)));
    }

    #[test]
    fn test_strict_reports_token() {
        let err = parse_conf_strict("a=1,oops,b=2", &ConfOptions::pve()).unwrap_err();
        assert_eq!(err, Error::malformed("oops", "expected key=value"));
    }

    #[test]
    fn test_strict_accepts_implicit_value() {
        let options = ConfOptions::pve().with_implicit_first_key("model");
        let device = parse_conf_strict("e1000,bridge=vmbr1", &options).unwrap();
        assert_eq!(device.get_str("model"), Some("e1000"));
        assert_eq!(device.get_str("bridge"), Some("vmbr1"));
    }
}
