//! Parser configuration.
//!
//! [`ConfOptions`] selects the dialect of a flat configuration string: the
//! top-level separator between tokens, the separator between a key and its
//! value, and an optional implicit key for an unlabeled first token.
//!
//! ## Examples
//!
//! ```rust
//! use pve_conf::{parse_conf, ConfOptions};
//!
//! // Proxmox disk strings start with the volume, which has no key
//! let options = ConfOptions::pve().with_implicit_first_key("volume");
//! let disk = parse_conf("local-lvm:vm-100-disk-0,size=32G", &options);
//! assert_eq!(disk.get_str("volume"), Some("local-lvm:vm-100-disk-0"));
//!
//! // A different dialect: `a:1;b:2`
//! let options = ConfOptions::new().with_separator(";").with_sub_separator(":");
//! let record = parse_conf("a:1;b:2", &options);
//! assert_eq!(record.get_i64("b"), Some(2));
//! ```

/// Separator used between tokens in Proxmox device strings.
pub const PVE_SEPARATOR: &str = ",";

/// Separator used between a key and its value in Proxmox device strings.
pub const PVE_SUB_SEPARATOR: &str = "=";

/// Configuration for parsing and encoding flat configuration strings.
///
/// # Examples
///
/// ```rust
/// use pve_conf::ConfOptions;
///
/// let options = ConfOptions::new();
/// assert_eq!(options.separator, ",");
/// assert_eq!(options.sub_separator, "=");
/// assert!(options.implicit_first_key.is_none());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ConfOptions {
    pub separator: String,
    pub sub_separator: String,
    pub implicit_first_key: Option<String>,
}

impl Default for ConfOptions {
    fn default() -> Self {
        ConfOptions {
            separator: PVE_SEPARATOR.to_string(),
            sub_separator: PVE_SUB_SEPARATOR.to_string(),
            implicit_first_key: None,
        }
    }
}

impl ConfOptions {
    /// Creates default options (the Proxmox `,` / `=` dialect, no implicit key).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for Proxmox device strings. Same as [`ConfOptions::new`].
    #[must_use]
    pub fn pve() -> Self {
        Self::default()
    }

    /// Sets the top-level separator between tokens.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pve_conf::ConfOptions;
    ///
    /// let options = ConfOptions::new().with_separator(";");
    /// assert_eq!(options.separator, ";");
    /// ```
    #[must_use]
    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    /// Sets the separator between a key and its value.
    #[must_use]
    pub fn with_sub_separator(mut self, sub_separator: &str) -> Self {
        self.sub_separator = sub_separator.to_string();
        self
    }

    /// Names the key that receives an unlabeled first token.
    ///
    /// An empty name disables the implicit key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pve_conf::ConfOptions;
    ///
    /// let options = ConfOptions::pve().with_implicit_first_key("model");
    /// assert_eq!(options.implicit_key(), Some("model"));
    ///
    /// let options = ConfOptions::pve().with_implicit_first_key("");
    /// assert_eq!(options.implicit_key(), None);
    /// ```
    #[must_use]
    pub fn with_implicit_first_key(mut self, key: &str) -> Self {
        self.implicit_first_key = Some(key.to_string());
        self
    }

    /// Returns the implicit first key, if one is configured and non-empty.
    #[must_use]
    pub fn implicit_key(&self) -> Option<&str> {
        self.implicit_first_key
            .as_deref()
            .filter(|key| !key.is_empty())
    }
}
