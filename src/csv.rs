//! Comma-separated lists.
//!
//! The Proxmox API passes many list-valued parameters (groups, tags, allowed
//! nodes) as a single comma-joined string. These helpers move between that
//! form and Rust sequences.
//!
//! [`csv_to_array`] never trims and always yields at least one element, and
//! [`add_to_list`] uses the same `,` separator, so a list built item by item
//! splits back into exactly the items that went in.
//!
//! ```rust
//! use pve_conf::{add_to_list, csv_to_array};
//!
//! let mut groups = String::new();
//! for group in ["admins", "ops", "dev"] {
//!     groups = add_to_list(&groups, group);
//! }
//! assert_eq!(groups, "admins,ops,dev");
//! assert_eq!(csv_to_array(&groups), vec!["admins", "ops", "dev"]);
//! ```

use crate::{ApiValue, Error, Result};

/// Separator between items of a comma-joined list.
pub const LIST_SEPARATOR: &str = ",";

/// Joins strings with `,`.
///
/// # Examples
///
/// ```rust
/// use pve_conf::array_to_csv;
///
/// assert_eq!(array_to_csv(["pve1", "pve2"]), "pve1,pve2");
/// assert_eq!(array_to_csv(Vec::<String>::new()), "");
/// ```
#[must_use]
pub fn array_to_csv<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

/// Narrows untyped API values to strings.
///
/// # Errors
///
/// Returns [`Error::Type`] for the first element that is not a string.
///
/// # Examples
///
/// ```rust
/// use pve_conf::{api, array_to_string_type};
///
/// let nodes = api!(["pve1", "pve2"]);
/// let nodes = array_to_string_type(nodes.as_array().unwrap()).unwrap();
/// assert_eq!(nodes, vec!["pve1", "pve2"]);
/// ```
pub fn array_to_string_type(values: &[ApiValue]) -> Result<Vec<String>> {
    values
        .iter()
        .map(|value| match value {
            ApiValue::String(s) => Ok(s.clone()),
            other => Err(Error::type_mismatch("string", other.type_name())),
        })
        .collect()
}

/// Joins untyped API values with `,`. Every element must be a string.
///
/// # Errors
///
/// Returns [`Error::Type`] if any element is not a string.
///
/// # Examples
///
/// ```rust
/// use pve_conf::{values_to_csv, ApiValue};
///
/// let tags = vec![ApiValue::from("web"), ApiValue::from("prod")];
/// assert_eq!(values_to_csv(&tags).unwrap(), "web,prod");
///
/// let mixed = vec![ApiValue::from("web"), ApiValue::from(1)];
/// assert!(values_to_csv(&mixed).is_err());
/// ```
pub fn values_to_csv(values: &[ApiValue]) -> Result<String> {
    Ok(array_to_csv(array_to_string_type(values)?))
}

/// Splits a comma-joined list. Always returns at least one element.
///
/// # Examples
///
/// ```rust
/// use pve_conf::csv_to_array;
///
/// assert_eq!(csv_to_array("a, b"), vec!["a", " b"]);
/// assert_eq!(csv_to_array(""), vec![""]);
/// ```
#[must_use]
pub fn csv_to_array(csv: &str) -> Vec<String> {
    csv.split(LIST_SEPARATOR).map(str::to_string).collect()
}

/// Appends an item to a comma-joined list.
///
/// # Examples
///
/// ```rust
/// use pve_conf::add_to_list;
///
/// assert_eq!(add_to_list("", "first"), "first");
/// assert_eq!(add_to_list("first", "second"), "first,second");
/// ```
#[must_use]
pub fn add_to_list(list: &str, new_item: &str) -> String {
    if list.is_empty() {
        new_item.to_string()
    } else {
        format!("{}{}{}", list, LIST_SEPARATOR, new_item)
    }
}

/// Parses a header list of the form `name1,value1,name2,value2`.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] when the fields do not pair up.
///
/// # Examples
///
/// ```rust
/// use pve_conf::parse_header_list;
///
/// let headers = parse_header_list("X-Trace,1,User-Agent,pve-client").unwrap();
/// assert_eq!(headers[1], ("User-Agent".to_string(), "pve-client".to_string()));
/// assert!(parse_header_list("").unwrap().is_empty());
/// assert!(parse_header_list("X-Trace").is_err());
/// ```
pub fn parse_header_list(list: &str) -> Result<Vec<(String, String)>> {
    if list.is_empty() {
        return Ok(Vec::new());
    }
    let fields = csv_to_array(list);
    if fields.len() % 2 != 0 {
        return Err(Error::malformed(
            list,
            "header names and values are not even",
        ));
    }
    Ok(fields
        .chunks_exact(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_simple() {
        let items = vec!["local".to_string(), "local-lvm".to_string()];
        assert_eq!(csv_to_array(&array_to_csv(&items)), items);
    }

    #[test]
    fn test_values_to_csv_reports_variant() {
        let values = vec![ApiValue::from("a"), ApiValue::Null];
        assert_eq!(
            values_to_csv(&values).unwrap_err(),
            Error::type_mismatch("string", "null")
        );
    }

    #[test]
    fn test_empty_items_survive_split() {
        assert_eq!(csv_to_array("a,,b,"), vec!["a", "", "b", ""]);
    }

    #[test]
    fn test_header_pairs() {
        let headers = parse_header_list("A,1,B,2").unwrap();
        assert_eq!(
            headers,
            vec![
                ("A".to_string(), "1".to_string()),
                ("B".to_string(), "2".to_string())
            ]
        );
        assert!(matches!(
            parse_header_list("A,1,B"),
            Err(Error::MalformedInput { .. })
        ));
    }
}
