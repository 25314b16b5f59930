//! Device records decoded from flat configuration strings.
//!
//! A [`Device`] maps keys to [`Scalar`] values. The Proxmox API returns every
//! sub-option of a device string as text; the parser narrows each value to the
//! most specific scalar type it can (integer, then boolean, then text).
//!
//! ## Examples
//!
//! ```rust
//! use pve_conf::{parse_pm_conf, Scalar};
//!
//! let net = parse_pm_conf("virtio=BC:24:11:2E:2B:6A,bridge=vmbr0,tag=20,firewall=1", "");
//!
//! assert_eq!(net.get_str("bridge"), Some("vmbr0"));
//! assert_eq!(net.get("tag"), Some(&Scalar::Integer(20)));
//! assert_eq!(net.get_bool("firewall"), Some(true));
//! ```

use crate::parse::split_tokens;
use crate::{ApiMap, ApiValue, ConfOptions, Error};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// A single coerced value in a device record.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scalar {
    Integer(i64),
    Bool(bool),
    Text(String),
}

impl Scalar {
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Integer(i) => Some(*i),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a boolean.
    ///
    /// Proxmox writes flags as `0`/`1`, which the parser reads as integers, so
    /// `Integer(1)` and `Integer(0)` count as booleans here.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pve_conf::Scalar;
    ///
    /// assert_eq!(Scalar::Bool(false).as_bool(), Some(false));
    /// assert_eq!(Scalar::Integer(1).as_bool(), Some(true));
    /// assert_eq!(Scalar::Integer(2).as_bool(), None);
    /// assert_eq!(Scalar::Text("on".into()).as_bool(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            Scalar::Integer(1) => Some(true),
            Scalar::Integer(0) => Some(false),
            _ => None,
        }
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Scalar::Integer(_) => "integer",
            Scalar::Bool(_) => "bool",
            Scalar::Text(_) => "string",
        }
    }

    /// Renders the value the way Proxmox writes it into a config string.
    ///
    /// Booleans become `1`/`0`.
    #[must_use]
    pub fn to_conf_value(&self) -> String {
        match self {
            Scalar::Integer(i) => i.to_string(),
            Scalar::Bool(b) => (if *b { "1" } else { "0" }).to_string(),
            Scalar::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Text(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Scalar::Integer(i) => serializer.serialize_i64(*i),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<Scalar> for ApiValue {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Integer(i) => ApiValue::from(i),
            Scalar::Bool(b) => ApiValue::Bool(b),
            Scalar::Text(s) => ApiValue::String(s),
        }
    }
}

/// A decoded device record: unique keys mapped to coerced scalar values.
///
/// Records are built fresh by every parse call and belong to the caller.
/// Iteration follows insertion order, so re-encoding is deterministic.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Device(IndexMap<String, Scalar>);

impl Device {
    #[must_use]
    pub fn new() -> Self {
        Device(IndexMap::new())
    }

    /// Inserts a value, returning the previous value for the key.
    pub fn insert(&mut self, key: String, value: Scalar) -> Option<Scalar> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.0.get(key)
    }

    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Scalar::as_str)
    }

    #[must_use]
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Scalar::as_i64)
    }

    /// Looks up a flag. See [`Scalar::as_bool`] for the accepted forms.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Scalar::as_bool)
    }

    pub fn remove(&mut self, key: &str) -> Option<Scalar> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Scalar> {
        self.0.keys()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Scalar> {
        self.0.iter()
    }

    /// Encodes the record back into a flat configuration string.
    ///
    /// When `options` names an implicit first key and the record holds it,
    /// that value is written first without a key. The output always parses
    /// back to the same set of keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedInput`] when a key is empty or contains the
    /// sub-separator, when a value contains the separator, or when the
    /// implicit value contains the sub-separator.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pve_conf::{parse_conf, ConfOptions};
    ///
    /// let options = ConfOptions::pve().with_implicit_first_key("storage");
    /// let disk = parse_conf("local-lvm,format=qcow2,ssd=1", &options);
    /// assert_eq!(disk.to_conf_string(&options).unwrap(), "local-lvm,format=qcow2,ssd=1");
    /// ```
    pub fn to_conf_string(&self, options: &ConfOptions) -> crate::Result<String> {
        let implicit = options
            .implicit_key()
            .and_then(|key| self.get(key).map(|value| (key, value)));

        let mut tokens = Vec::with_capacity(self.len());
        if let Some((_, value)) = implicit {
            let token = value.to_conf_value();
            if separates(&token, &options.sub_separator) {
                return Err(Error::malformed(
                    &token,
                    "implicit value contains the key separator",
                ));
            }
            tokens.push(token);
        }
        for (key, value) in self.iter() {
            if implicit.is_some_and(|(implicit_key, _)| implicit_key == key) {
                continue;
            }
            tokens.push(keyed_token(key, value, options)?);
        }

        let encoded = tokens.join(&options.separator);
        if !tokens.is_empty() && split_tokens(&encoded, &options.separator) != tokens {
            let token = tokens
                .iter()
                .find(|token| separates(token, &options.separator))
                .unwrap_or(&encoded);
            return Err(Error::malformed(token, "value contains the separator"));
        }
        Ok(encoded)
    }
}

fn separates(text: &str, separator: &str) -> bool {
    !separator.is_empty() && text.contains(separator)
}

/// Writes `key<sub>value`, checking that the first sub-separator ends the key.
fn keyed_token(key: &str, value: &Scalar, options: &ConfOptions) -> crate::Result<String> {
    let sub = options.sub_separator.as_str();
    if key.is_empty() {
        return Err(Error::malformed(key, "empty key"));
    }
    if sub.is_empty() {
        return Err(Error::malformed(key, "empty key separator"));
    }
    let token = format!("{}{}{}", key, sub, value.to_conf_value());
    if token.find(sub) != Some(key.len()) {
        return Err(Error::malformed(key, "key contains the key separator"));
    }
    Ok(token)
}

impl Serialize for Device {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl IntoIterator for Device {
    type Item = (String, Scalar);
    type IntoIter = indexmap::map::IntoIter<String, Scalar>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Device {
    type Item = (&'a String, &'a Scalar);
    type IntoIter = indexmap::map::Iter<'a, String, Scalar>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Scalar)> for Device {
    fn from_iter<T: IntoIterator<Item = (String, Scalar)>>(iter: T) -> Self {
        Device(IndexMap::from_iter(iter))
    }
}

impl From<Device> for ApiValue {
    fn from(device: Device) -> Self {
        ApiValue::Object(
            device
                .into_iter()
                .map(|(k, v)| (k, ApiValue::from(v)))
                .collect::<ApiMap>(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Device {
        [
            ("storage".to_string(), Scalar::from("local-lvm")),
            ("size".to_string(), Scalar::from("32G")),
            ("iothread".to_string(), Scalar::Bool(true)),
            ("cache".to_string(), Scalar::Integer(0)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_accessors() {
        let device = sample();
        assert_eq!(device.len(), 4);
        assert_eq!(device.get_str("size"), Some("32G"));
        assert_eq!(device.get_i64("cache"), Some(0));
        assert_eq!(device.get_bool("cache"), Some(false));
        assert_eq!(device.get_bool("iothread"), Some(true));
        assert_eq!(device.get_str("missing"), None);
    }

    #[test]
    fn test_to_conf_string_without_implicit_key() {
        let device = sample();
        assert_eq!(
            device.to_conf_string(&ConfOptions::pve()).unwrap(),
            "storage=local-lvm,size=32G,iothread=1,cache=0"
        );
    }

    #[test]
    fn test_to_conf_string_moves_implicit_key_first() {
        let mut device = Device::new();
        device.insert("format".to_string(), Scalar::from("raw"));
        device.insert("file".to_string(), Scalar::from("local:iso/debian.iso"));

        let options = ConfOptions::pve().with_implicit_first_key("file");
        assert_eq!(
            device.to_conf_string(&options).unwrap(),
            "local:iso/debian.iso,format=raw"
        );
    }

    #[test]
    fn test_to_conf_string_rejects_separator_in_value() {
        let mut device = Device::new();
        device.insert("bridge".to_string(), Scalar::from("vmbr0,firewall=1"));
        device.insert("tag".to_string(), Scalar::Integer(5));

        assert_eq!(
            device.to_conf_string(&ConfOptions::pve()),
            Err(Error::malformed(
                "bridge=vmbr0,firewall=1",
                "value contains the separator"
            ))
        );
    }

    #[test]
    fn test_to_conf_string_rejects_key_separator_in_implicit_value() {
        let mut device = Device::new();
        device.insert("file".to_string(), Scalar::from("local:iso/a=b.iso"));
        device.insert("media".to_string(), Scalar::from("cdrom"));

        let options = ConfOptions::pve().with_implicit_first_key("file");
        assert!(matches!(
            device.to_conf_string(&options),
            Err(Error::MalformedInput { .. })
        ));

        // the same value is fine once it carries its key
        assert_eq!(
            device.to_conf_string(&ConfOptions::pve()).unwrap(),
            "file=local:iso/a=b.iso,media=cdrom"
        );
    }

    #[test]
    fn test_to_conf_string_rejects_bad_keys() {
        let options = ConfOptions::pve();
        for key in ["", "a=b", "a,b"] {
            let device: Device = [(key.to_string(), Scalar::Integer(1))].into_iter().collect();
            assert!(
                matches!(device.to_conf_string(&options), Err(Error::MalformedInput { .. })),
                "{:?}",
                key
            );
        }
    }

    #[test]
    fn test_to_conf_string_multi_character_separator_overlap() {
        // "x===v" would split as "x" / "==v" under a "==" separator
        let options = ConfOptions::new().with_sub_separator("==");
        let device: Device = [("x=".to_string(), Scalar::from("v"))].into_iter().collect();
        assert!(device.to_conf_string(&options).is_err());
    }

    #[test]
    fn test_remove_and_into_api_value() {
        let mut device = sample();
        assert_eq!(device.remove("cache"), Some(Scalar::Integer(0)));
        assert!(!device.contains_key("cache"));

        let value = ApiValue::from(device);
        assert_eq!(value.get("iothread"), Some(&ApiValue::Bool(true)));
        assert_eq!(
            value.get("storage").and_then(|v| v.as_str()),
            Some("local-lvm")
        );
    }

    #[test]
    fn test_serialize_to_json() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"storage":"local-lvm","size":"32G","iothread":true,"cache":0}"#
        );
    }
}
