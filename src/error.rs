//! Error types for building and rendering Fusion tables.
//!
//! Rendering is all-or-nothing: a graph either produces text that follows the
//! table grammar or it produces an [`Error`]. There is no partial output.
//!
//! ## Error Categories
//!
//! - **Unsupported values**: a value the grammar has no spelling for
//!   (non-finite floats, nested tables inside point tuples, ...)
//! - **Not implemented**: curve shapes that exist in the catalog but have no algorithm yet
//! - **Composition errors**: unknown tool names, rendering an empty composition
//! - **I/O errors**: writing the rendered text to a file or writer
//!
//! ## Examples
//!
//! ```rust
//! use fusion_table::{Curve, Error};
//!
//! let err = Curve::smooth().unwrap_err();
//! assert!(matches!(err, Error::NotImplemented(_)));
//! assert!(err.to_string().contains("smooth"));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised while building or rendering tables.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A value that cannot be written in the table grammar
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    /// A catalogued feature without an implementation
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// A tool name that is not part of the composition
    #[error("Unknown tool: {0} is not one of the tools in this composition")]
    UnknownTool(String),

    /// A composition with no tools or modifiers
    #[error("Composition is empty: add at least one tool before rendering")]
    EmptyComposition,

    /// IO error during writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an unsupported value error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fusion_table::Error;
    ///
    /// let err = Error::unsupported_value("NaN");
    /// assert_eq!(err.to_string(), "Unsupported value: NaN");
    /// ```
    pub fn unsupported_value<T: fmt::Display>(msg: T) -> Self {
        Error::UnsupportedValue(msg.to_string())
    }

    /// Creates a not-implemented error.
    pub fn not_implemented<T: fmt::Display>(msg: T) -> Self {
        Error::NotImplemented(msg.to_string())
    }

    /// Creates an unknown tool error.
    pub fn unknown_tool(name: &str) -> Self {
        Error::UnknownTool(name.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for file writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            Error::unknown_tool("Blur1").to_string(),
            "Unknown tool: Blur1 is not one of the tools in this composition"
        );
        assert!(Error::not_implemented("smooth curve")
            .to_string()
            .starts_with("Not implemented"));
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(ref msg) if msg.contains("missing")));
    }
}
