/// Builds an [`ApiValue`](crate::ApiValue) from a JSON-like literal.
///
/// # Examples
///
/// ```rust
/// use pve_conf::{api, ApiValue};
///
/// let users = api!([
///     { "userid": "alice@pve", "tokens": [{ "tokenid": "ci" }] },
///     { "userid": "bob@pve", "tokens": null }
/// ]);
/// assert_eq!(users.as_array().map(Vec::len), Some(2));
/// ```
#[macro_export]
macro_rules! api {
    (null) => {
        $crate::ApiValue::Null
    };

    (true) => {
        $crate::ApiValue::Bool(true)
    };

    (false) => {
        $crate::ApiValue::Bool(false)
    };

    ([]) => {
        $crate::ApiValue::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::ApiValue::Array(vec![$($crate::api!($elem)),*])
    };

    ({}) => {
        $crate::ApiValue::Object($crate::ApiMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::ApiMap::new();
        $(
            object.insert($key.to_string(), $crate::api!($value));
        )*
        $crate::ApiValue::Object(object)
    }};

    // Any other expression goes through the value serializer
    ($s:expr) => {
        $crate::to_value(&$s).unwrap_or($crate::ApiValue::Null)
    };
}
