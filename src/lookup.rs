//! Membership checks over API list responses.
//!
//! Proxmox lists users together with the API tokens that belong to them:
//!
//! ```text
//! [{"userid": "alice@pve", "tokens": [{"tokenid": "ci"}]}]
//! ```
//!
//! A token is addressed as `user@realm!tokenid`. [`item_in_key_of_array`]
//! answers "does this id exist" for both forms with one call.

use crate::{ApiValue, Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Field holding the sub-records scanned for token ids.
pub const TOKENS_FIELD: &str = "tokens";

static USER_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[a-z0-9]+@[a-z0-9]+!([a-z0-9]+)").expect("user token pattern is valid")
});

/// Extracts the token id from a `user@realm!tokenid` string.
///
/// Only lowercase alphanumerics match; the pattern is not anchored.
///
/// # Examples
///
/// ```rust
/// use pve_conf::extract_token_id;
///
/// assert_eq!(extract_token_id("alice@pve!tok1"), Some("tok1"));
/// assert_eq!(extract_token_id("Alice@pve!tok1"), Some("tok1"));
/// assert_eq!(extract_token_id("ALICE@PVE!TOK1"), None);
/// assert_eq!(extract_token_id("alice@pve"), None);
/// ```
#[must_use]
pub fn extract_token_id(value: &str) -> Option<&str> {
    USER_TOKEN
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Reports whether any record has `key` equal to `value`, or owns a token
/// whose id matches the token part of `value`.
///
/// Records without the field, or with a non-string field, do not match. A
/// `null` or missing `tokens` field is skipped.
///
/// # Errors
///
/// Returns [`Error::Type`] if a record is not an object, or if `value` is a
/// token id and a `tokens` field is neither `null` nor an array of objects.
///
/// # Examples
///
/// ```rust
/// use pve_conf::{api, item_in_key_of_array};
///
/// let users = api!([{ "userid": "alice@pve", "tokens": [{ "tokenid": "tok1" }] }]);
/// let users = users.as_array().unwrap();
///
/// assert!(item_in_key_of_array(users, "userid", "alice@pve").unwrap());
/// assert!(item_in_key_of_array(users, "userid", "alice@pve!tok1").unwrap());
/// assert!(!item_in_key_of_array(users, "userid", "bob@pve").unwrap());
/// ```
pub fn item_in_key_of_array(records: &[ApiValue], key: &str, value: &str) -> Result<bool> {
    let token_id = extract_token_id(value);

    for record in records {
        let fields = record
            .as_object()
            .ok_or_else(|| Error::type_mismatch("object", record.type_name()))?;

        if fields.get(key).and_then(ApiValue::as_str) == Some(value) {
            return Ok(true);
        }

        let Some(token_id) = token_id else {
            continue;
        };
        let tokens = match fields.get(TOKENS_FIELD) {
            None | Some(ApiValue::Null) => continue,
            Some(ApiValue::Array(tokens)) => tokens,
            Some(other) => return Err(Error::type_mismatch("array", other.type_name())),
        };

        for token in tokens {
            let token_fields = token
                .as_object()
                .ok_or_else(|| Error::type_mismatch("object", token.type_name()))?;
            if token_fields
                .values()
                .any(|field| field.as_str() == Some(token_id))
            {
                return Ok(true);
            }
        }
    }
    Ok(false)
}
