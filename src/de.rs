//! Typed deserialization of device records.
//!
//! [`from_device`] feeds a parsed [`Device`] to any `T: Deserialize`, so a
//! device string can be read straight into a struct:
//!
//! ```rust
//! use pve_conf::{from_conf_str, ConfOptions};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Disk {
//!     volume: String,
//!     size: String,
//!     #[serde(default)]
//!     ssd: bool,
//!     iops_rd: Option<u32>,
//! }
//!
//! let options = ConfOptions::pve().with_implicit_first_key("volume");
//! let disk: Disk = from_conf_str("local-lvm:vm-100-disk-0,size=32G,ssd=1", &options).unwrap();
//!
//! assert_eq!(disk.volume, "local-lvm:vm-100-disk-0");
//! assert!(disk.ssd);
//! assert_eq!(disk.iops_rd, None);
//! ```
//!
//! ## Widening rules
//!
//! Parsed values are already narrowed (`1` is an integer, `writeback` is
//! text). The deserializer widens them back where Proxmox is loose:
//!
//! - `bool` fields accept `Bool` and the integers `0`/`1`
//! - string fields accept any scalar, rendered as text
//! - float fields accept integers and numeric text (`rate=1.5`)
//! - unit enum variants are read from text

use crate::{parse_conf, ConfOptions, Device, Error, Result, Scalar};
use serde::de::value::StringDeserializer;
use serde::de::{self, IntoDeserializer, Unexpected};
use serde::forward_to_deserialize_any;

/// Deserializes a `T` from a device record.
///
/// # Errors
///
/// Returns an error if a field is missing or a value cannot be widened to the
/// field's type.
pub fn from_device<T>(device: Device) -> Result<T>
where
    T: de::DeserializeOwned,
{
    T::deserialize(DeviceDeserializer::new(device))
}

/// Parses a configuration string and deserializes a `T` from it.
///
/// # Errors
///
/// See [`from_device`].
pub fn from_conf_str<T>(input: &str, options: &ConfOptions) -> Result<T>
where
    T: de::DeserializeOwned,
{
    from_device(parse_conf(input, options))
}

/// Deserializer over a whole record, presented as a map.
pub struct DeviceDeserializer {
    device: Device,
}

impl DeviceDeserializer {
    #[must_use]
    pub fn new(device: Device) -> Self {
        DeviceDeserializer { device }
    }
}

impl<'de> de::Deserializer<'de> for DeviceDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_map(DeviceMapAccess::new(self.device))
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

struct DeviceMapAccess {
    iter: indexmap::map::IntoIter<String, Scalar>,
    value: Option<Scalar>,
}

impl DeviceMapAccess {
    fn new(device: Device) -> Self {
        DeviceMapAccess {
            iter: device.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for DeviceMapAccess {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                let key: StringDeserializer<Error> = key.into_deserializer();
                seed.deserialize(key).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ScalarDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

/// Deserializer for one scalar value, applying the widening rules.
struct ScalarDeserializer {
    value: Scalar,
}

impl ScalarDeserializer {
    fn new(value: Scalar) -> Self {
        ScalarDeserializer { value }
    }

    fn unexpected(&self) -> Unexpected<'_> {
        match &self.value {
            Scalar::Integer(i) => Unexpected::Signed(*i),
            Scalar::Bool(b) => Unexpected::Bool(*b),
            Scalar::Text(s) => Unexpected::Str(s),
        }
    }

    fn integer<'de, V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Scalar::Integer(i) => visitor.visit_i64(i),
            // Coercion leaves values above i64::MAX as text
            Scalar::Text(ref s) => match s.parse::<u64>() {
                Ok(u) => visitor.visit_u64(u),
                Err(_) => Err(de::Error::invalid_type(self.unexpected(), &visitor)),
            },
            Scalar::Bool(_) => Err(de::Error::invalid_type(self.unexpected(), &visitor)),
        }
    }

    fn float<'de, V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Scalar::Integer(i) => visitor.visit_f64(i as f64),
            Scalar::Text(ref s) => match s.parse::<f64>() {
                Ok(f) => visitor.visit_f64(f),
                Err(_) => Err(de::Error::invalid_type(self.unexpected(), &visitor)),
            },
            Scalar::Bool(_) => Err(de::Error::invalid_type(self.unexpected(), &visitor)),
        }
    }
}

impl<'de> de::Deserializer<'de> for ScalarDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Scalar::Integer(i) => visitor.visit_i64(i),
            Scalar::Bool(b) => visitor.visit_bool(b),
            Scalar::Text(s) => visitor.visit_string(s),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value.as_bool() {
            Some(b) => visitor.visit_bool(b),
            None => Err(de::Error::invalid_type(self.unexpected(), &visitor)),
        }
    }

    fn deserialize_i8<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_i16<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_i32<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_i64<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_u8<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_u16<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_u32<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_u64<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_f32<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.float(visitor)
    }

    fn deserialize_f64<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.float(visitor)
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Scalar::Text(s) => visitor.visit_string(s),
            other => visitor.visit_string(other.to_string()),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let variant: StringDeserializer<Error> = match self.value {
            Scalar::Text(s) => s.into_deserializer(),
            other => other.to_string().into_deserializer(),
        };
        visitor.visit_enum(variant)
    }

    forward_to_deserialize_any! {
        i128 u128 char bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}
