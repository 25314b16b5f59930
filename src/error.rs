//! Error types for the Proxmox configuration codec.
//!
//! Every failure is returned to the caller as an [`Error`]; nothing in this
//! crate terminates the process on bad input.
//!
//! ## Error Categories
//!
//! - **Malformed input**: a token could not be split into `key=value` where a
//!   split was required
//! - **Type mismatches**: an API value had an unexpected variant (for example
//!   a number inside a list that must contain only strings)
//! - **Parse errors**: a disk-size string has no numeric magnitude
//!
//! ## Examples
//!
//! ```rust
//! use pve_conf::{disk_size_gib, Error};
//!
//! let result = disk_size_gib("large");
//! assert!(matches!(result, Err(Error::Parse { .. })));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised by the codec.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A token could not be decomposed where decomposition was required
    #[error("malformed token {token:?}: {msg}")]
    MalformedInput { token: String, msg: String },

    /// A value had a different variant than the operation requires
    #[error("type mismatch: expected {expected}, found {found}")]
    Type { expected: String, found: String },

    /// A numeric field could not be parsed
    #[error("cannot parse {input:?}: {msg}")]
    Parse { input: String, msg: String },

    /// Custom error raised through serde
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a malformed-input error for the offending token.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pve_conf::Error;
    ///
    /// let err = Error::malformed("virtio", "missing '='");
    /// assert!(err.to_string().contains("virtio"));
    /// ```
    pub fn malformed(token: &str, msg: &str) -> Self {
        Error::MalformedInput {
            token: token.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates a type mismatch error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pve_conf::Error;
    ///
    /// let err = Error::type_mismatch("string", "number");
    /// assert!(err.to_string().contains("expected string"));
    /// ```
    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        Error::Type {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates a parse error for the given input.
    pub fn parse(input: &str, msg: &str) -> Self {
        Error::Parse {
            input: input.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
