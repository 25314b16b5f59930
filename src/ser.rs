//! Serialization into API values and configuration strings.
//!
//! [`ApiValueSerializer`] turns any `T: Serialize` into an [`ApiValue`].
//! [`to_device`] and [`to_conf_string`] build on it to encode a flat struct
//! as a Proxmox device string:
//!
//! ```rust
//! use pve_conf::{to_conf_string, ConfOptions};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Net {
//!     model: &'static str,
//!     bridge: &'static str,
//!     tag: Option<u16>,
//!     firewall: bool,
//! }
//!
//! let net = Net { model: "virtio", bridge: "vmbr0", tag: None, firewall: true };
//! let options = ConfOptions::pve().with_implicit_first_key("model");
//!
//! assert_eq!(to_conf_string(&net, &options).unwrap(), "virtio,bridge=vmbr0,firewall=1");
//! ```
//!
//! `None` fields are left out; booleans are written as `1`/`0`.

use crate::{ApiMap, ApiValue, ConfOptions, Device, Error, Number, Result, Scalar};
use serde::{ser, Serialize};

/// Converts any `T: Serialize` to an [`ApiValue`].
///
/// # Examples
///
/// ```rust
/// use pve_conf::{to_value, ApiValue};
///
/// let value = to_value(&vec!["pve1", "pve2"]).unwrap();
/// assert_eq!(value, ApiValue::Array(vec!["pve1".into(), "pve2".into()]));
/// ```
///
/// # Errors
///
/// Returns an error for map keys that are not strings and for enum variants
/// carrying data.
pub fn to_value<T>(value: &T) -> Result<ApiValue>
where
    T: ?Sized + Serialize,
{
    value.serialize(ApiValueSerializer)
}

/// Converts a flat `T: Serialize` into a [`Device`] record.
///
/// # Errors
///
/// Returns [`Error::Type`] if `T` does not serialize to an object or one of its
/// fields is an array or object.
pub fn to_device<T>(value: &T) -> Result<Device>
where
    T: ?Sized + Serialize,
{
    let fields = match to_value(value)? {
        ApiValue::Object(fields) => fields,
        other => return Err(Error::type_mismatch("object", other.type_name())),
    };

    let mut device = Device::new();
    for (key, field) in fields {
        let scalar = match field {
            ApiValue::Null => continue,
            ApiValue::Bool(b) => Scalar::Bool(b),
            ApiValue::Number(Number::Integer(i)) => Scalar::Integer(i),
            ApiValue::Number(Number::Float(f)) => Scalar::Text(f.to_string()),
            ApiValue::String(s) => Scalar::Text(s),
            other => return Err(Error::type_mismatch("scalar", other.type_name())),
        };
        device.insert(key, scalar);
    }
    Ok(device)
}

/// Encodes a flat `T: Serialize` as a configuration string.
///
/// # Errors
///
/// See [`to_device`] and [`Device::to_conf_string`]. A field whose text would
/// add or hide a key in the output is [`Error::MalformedInput`].
pub fn to_conf_string<T>(value: &T, options: &ConfOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_device(value)?.to_conf_string(options)
}

/// Serializer producing [`ApiValue`] trees.
pub struct ApiValueSerializer;

pub struct SerializeVec {
    vec: Vec<ApiValue>,
}

pub struct SerializeMap {
    map: ApiMap,
    current_key: Option<String>,
}

impl ser::Serializer for ApiValueSerializer {
    type Ok = ApiValue;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = ser::Impossible<ApiValue, Error>;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = ser::Impossible<ApiValue, Error>;

    fn serialize_bool(self, v: bool) -> Result<ApiValue> {
        Ok(ApiValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<ApiValue> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<ApiValue> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<ApiValue> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<ApiValue> {
        Ok(ApiValue::Number(Number::Integer(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<ApiValue> {
        self.serialize_i64(v as i64)
    }

    fn serialize_u16(self, v: u16) -> Result<ApiValue> {
        self.serialize_i64(v as i64)
    }

    fn serialize_u32(self, v: u32) -> Result<ApiValue> {
        self.serialize_i64(v as i64)
    }

    fn serialize_u64(self, v: u64) -> Result<ApiValue> {
        if v <= i64::MAX as u64 {
            Ok(ApiValue::Number(Number::Integer(v as i64)))
        } else {
            Ok(ApiValue::Number(Number::Float(v as f64)))
        }
    }

    fn serialize_f32(self, v: f32) -> Result<ApiValue> {
        Ok(ApiValue::Number(Number::Float(v as f64)))
    }

    fn serialize_f64(self, v: f64) -> Result<ApiValue> {
        Ok(ApiValue::Number(Number::Float(v)))
    }

    fn serialize_char(self, v: char) -> Result<ApiValue> {
        Ok(ApiValue::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<ApiValue> {
        Ok(ApiValue::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<ApiValue> {
        Ok(ApiValue::Array(
            v.iter().map(|&b| ApiValue::from(b as i64)).collect(),
        ))
    }

    fn serialize_none(self) -> Result<ApiValue> {
        Ok(ApiValue::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<ApiValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<ApiValue> {
        Ok(ApiValue::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<ApiValue> {
        Ok(ApiValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<ApiValue> {
        Ok(ApiValue::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<ApiValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<ApiValue>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::custom(format!(
            "newtype variant `{}` is not supported",
            variant
        )))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::custom(format!(
            "tuple variant `{}` is not supported",
            variant
        )))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::custom(format!(
            "struct variant `{}` is not supported",
            variant
        )))
    }
}

impl SerializeVec {
    fn with_capacity(capacity: usize) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
        }
    }
}

impl SerializeMap {
    fn new() -> Self {
        SerializeMap {
            map: ApiMap::new(),
            current_key: None,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = ApiValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<ApiValue> {
        Ok(ApiValue::Array(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = ApiValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<ApiValue> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = ApiValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<ApiValue> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = ApiValue;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_value(key)? {
            ApiValue::String(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            other => Err(Error::type_mismatch("string key", other.type_name())),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<ApiValue> {
        Ok(ApiValue::Object(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = ApiValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<ApiValue> {
        Ok(ApiValue::Object(self.map))
    }
}
