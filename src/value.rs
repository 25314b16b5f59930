//! Dynamic value representation for decoded API payloads.
//!
//! The Proxmox API answers with schema-less JSON. [`ApiValue`] is the
//! recursive tree those answers decode into, so every lookup against them is
//! a structural match instead of an unchecked cast.
//!
//! ## Creating Values
//!
//! ```rust
//! use pve_conf::{api, ApiValue};
//!
//! let null = ApiValue::Null;
//! let text = ApiValue::from("local-lvm");
//!
//! let user = api!({
//!     "userid": "alice@pve",
//!     "tokens": [{ "tokenid": "ci" }]
//! });
//! assert!(user.is_object());
//! ```
//!
//! ## Decoding with any serde format
//!
//! ```rust
//! use pve_conf::ApiValue;
//!
//! let value: ApiValue = serde_json::from_str(r#"{"size": 34359738368}"#).unwrap();
//! assert_eq!(value.get("size").and_then(|v| v.as_i64()), Some(34359738368));
//! ```

use crate::ApiMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed API value.
///
/// # Examples
///
/// ```rust
/// use pve_conf::{ApiValue, Number};
///
/// let num = ApiValue::Number(Number::Integer(42));
/// let text = ApiValue::String("vmbr0".to_string());
///
/// assert!(num.is_number());
/// assert!(text.is_string());
/// assert_eq!(text.type_name(), "string");
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum ApiValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<ApiValue>),
    Object(ApiMap),
}

/// A numeric API value.
///
/// # Examples
///
/// ```rust
/// use pve_conf::Number;
///
/// assert_eq!(Number::Integer(42).as_i64(), Some(42));
/// assert_eq!(Number::Float(2.5).as_f64(), 2.5);
/// assert_eq!(Number::Float(2.5).as_i64(), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Converts this number to an `i64` if it has no fractional part and fits.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{}", fl),
        }
    }
}

impl ApiValue {
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, ApiValue::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, ApiValue::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, ApiValue::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, ApiValue::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, ApiValue::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, ApiValue::Object(_))
    }

    /// Name of the variant, used in type mismatch errors.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            ApiValue::Null => "null",
            ApiValue::Bool(_) => "bool",
            ApiValue::Number(_) => "number",
            ApiValue::String(_) => "string",
            ApiValue::Array(_) => "array",
            ApiValue::Object(_) => "object",
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ApiValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it. Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pve_conf::ApiValue;
    ///
    /// assert_eq!(ApiValue::from("vmbr0").as_str(), Some("vmbr0"));
    /// assert_eq!(ApiValue::from(42).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ApiValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ApiValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ApiValue::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<ApiValue>> {
        match self {
            ApiValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&ApiMap> {
        match self {
            ApiValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Looks up a field when the value is an object.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pve_conf::api;
    ///
    /// let node = api!({ "node": "pve1" });
    /// assert_eq!(node.get("node").and_then(|v| v.as_str()), Some("pve1"));
    /// assert!(node.get("status").is_none());
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ApiValue> {
        self.as_object().and_then(|obj| obj.get(key))
    }
}

impl fmt::Display for ApiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiValue::Null => write!(f, "null"),
            ApiValue::Bool(b) => write!(f, "{}", b),
            ApiValue::Number(n) => write!(f, "{}", n),
            ApiValue::String(s) => write!(f, "{}", s),
            ApiValue::Array(arr) => {
                write!(
                    f,
                    "[{}]",
                    arr.iter()
                        .map(|v| v.to_string())
                        .collect::<Vec<_>>()
                        .join(",")
                )
            }
            ApiValue::Object(obj) => {
                write!(
                    f,
                    "{{{}}}",
                    obj.iter()
                        .map(|(k, v)| format!("{}:{}", k, v))
                        .collect::<Vec<_>>()
                        .join(",")
                )
            }
        }
    }
}

impl Serialize for ApiValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ApiValue::Null => serializer.serialize_unit(),
            ApiValue::Bool(b) => serializer.serialize_bool(*b),
            ApiValue::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            ApiValue::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            ApiValue::String(s) => serializer.serialize_str(s),
            ApiValue::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            ApiValue::Object(obj) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for ApiValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ApiValueVisitor;

        impl<'de> Visitor<'de> for ApiValueVisitor {
            type Value = ApiValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any API value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(ApiValue::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(ApiValue::Number(Number::Integer(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                if value <= i64::MAX as u64 {
                    Ok(ApiValue::Number(Number::Integer(value as i64)))
                } else {
                    Ok(ApiValue::Number(Number::Float(value as f64)))
                }
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(ApiValue::Number(Number::Float(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(ApiValue::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(ApiValue::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(ApiValue::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(ApiValue::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(ApiValue::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = ApiMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(ApiValue::Object(values))
            }
        }

        deserializer.deserialize_any(ApiValueVisitor)
    }
}

impl TryFrom<ApiValue> for i64 {
    type Error = crate::Error;

    fn try_from(value: ApiValue) -> crate::Result<Self> {
        match value {
            ApiValue::Number(n) => n
                .as_i64()
                .ok_or_else(|| crate::Error::type_mismatch("integer", "float")),
            other => Err(crate::Error::type_mismatch("integer", other.type_name())),
        }
    }
}

impl TryFrom<ApiValue> for f64 {
    type Error = crate::Error;

    fn try_from(value: ApiValue) -> crate::Result<Self> {
        match value {
            ApiValue::Number(n) => Ok(n.as_f64()),
            other => Err(crate::Error::type_mismatch("number", other.type_name())),
        }
    }
}

impl TryFrom<ApiValue> for bool {
    type Error = crate::Error;

    fn try_from(value: ApiValue) -> crate::Result<Self> {
        match value {
            ApiValue::Bool(b) => Ok(b),
            other => Err(crate::Error::type_mismatch("bool", other.type_name())),
        }
    }
}

impl TryFrom<ApiValue> for String {
    type Error = crate::Error;

    fn try_from(value: ApiValue) -> crate::Result<Self> {
        match value {
            ApiValue::String(s) => Ok(s),
            other => Err(crate::Error::type_mismatch("string", other.type_name())),
        }
    }
}

impl From<bool> for ApiValue {
    fn from(value: bool) -> Self {
        ApiValue::Bool(value)
    }
}

impl From<i32> for ApiValue {
    fn from(value: i32) -> Self {
        ApiValue::Number(Number::Integer(value as i64))
    }
}

impl From<i64> for ApiValue {
    fn from(value: i64) -> Self {
        ApiValue::Number(Number::Integer(value))
    }
}

impl From<u32> for ApiValue {
    fn from(value: u32) -> Self {
        ApiValue::Number(Number::Integer(value as i64))
    }
}

impl From<f64> for ApiValue {
    fn from(value: f64) -> Self {
        ApiValue::Number(Number::Float(value))
    }
}

impl From<String> for ApiValue {
    fn from(value: String) -> Self {
        ApiValue::String(value)
    }
}

impl From<&str> for ApiValue {
    fn from(value: &str) -> Self {
        ApiValue::String(value.to_string())
    }
}

impl From<Vec<ApiValue>> for ApiValue {
    fn from(value: Vec<ApiValue>) -> Self {
        ApiValue::Array(value)
    }
}

impl From<ApiMap> for ApiValue {
    fn from(value: ApiMap) -> Self {
        ApiValue::Object(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tryfrom_i64() {
        let result: i64 = i64::try_from(ApiValue::Number(Number::Float(42.0))).unwrap();
        assert_eq!(result, 42);

        let err = i64::try_from(ApiValue::from("42")).unwrap_err();
        assert_eq!(err, crate::Error::type_mismatch("integer", "string"));
    }

    #[test]
    fn test_tryfrom_string() {
        let result = String::try_from(ApiValue::from("pve1")).unwrap();
        assert_eq!(result, "pve1");
        assert!(String::try_from(ApiValue::Null).is_err());
    }

    #[test]
    fn test_deserialize_from_json() {
        let value: ApiValue = serde_json::from_str(
            r#"[{"userid":"root@pam","enable":1,"expire":null,"ratio":0.5}]"#,
        )
        .unwrap();

        let users = value.as_array().unwrap();
        assert_eq!(users.len(), 1);
        let root = &users[0];
        assert_eq!(root.get("userid").and_then(|v| v.as_str()), Some("root@pam"));
        assert_eq!(root.get("enable").and_then(|v| v.as_i64()), Some(1));
        assert_eq!(root.get("expire"), Some(&ApiValue::Null));
        assert_eq!(root.get("ratio").and_then(|v| v.as_f64()), Some(0.5));
    }

    #[test]
    fn test_serialize_keeps_field_order() {
        let mut obj = ApiMap::new();
        obj.insert("vmid".to_string(), ApiValue::from(100));
        obj.insert("name".to_string(), ApiValue::from("web"));
        let json = serde_json::to_string(&ApiValue::Object(obj)).unwrap();
        assert_eq!(json, r#"{"vmid":100,"name":"web"}"#);
    }

    #[test]
    fn test_display() {
        let value = ApiValue::Array(vec![ApiValue::from("a"), ApiValue::from(1)]);
        assert_eq!(value.to_string(), "[a,1]");
    }
}
