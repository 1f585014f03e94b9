//! Error types for data access and the binary codec.
//!
//! ## Error Categories
//!
//! - **Mutability**: a setter or `clear` was called on a frozen node
//! - **Parsing**: a typed getter could not read a string payload as the
//!   requested type
//! - **Format**: the decoder met malformed, truncated or oversized input
//! - **I/O**: the underlying stream failed; the original error is kept
//!
//! Lookups never fail: a missing key or index yields the shared null node.
//!
//! ## Examples
//!
//! ```rust
//! use generic_data::{Data, Error, GenericData};
//!
//! let mut node = GenericData::new();
//! node.set_string("abc").unwrap();
//!
//! match node.get_i64() {
//!     Err(Error::Parse { input, target }) => {
//!         assert_eq!(input, "abc");
//!         assert_eq!(target, "i64");
//!     }
//!     other => panic!("unexpected result: {other:?}"),
//! }
//! ```

use std::io;
use thiserror::Error;

/// Represents all possible errors raised by data nodes and the codec.
#[derive(Debug, Error)]
pub enum Error {
    /// A mutating operation was attempted on an immutable node
    #[error("data is immutable")]
    Immutable,

    /// A string payload could not be parsed as the requested scalar type
    #[error("cannot parse {input:?} as {target}")]
    Parse { input: String, target: &'static str },

    /// The underlying stream failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The encoded input does not follow the binary layout
    #[error("invalid data format at byte {offset}: {msg}")]
    InvalidFormat { offset: u64, msg: String },

    /// The encoded input ended in the middle of a value
    #[error("unexpected end of input at byte {offset}, expected {expected}")]
    UnexpectedEof { offset: u64, expected: &'static str },

    /// Nesting exceeded the configured depth limit
    #[error("nesting depth exceeds the limit of {0}")]
    DepthLimitExceeded(usize),

    /// A string, key or collection exceeded the configured length limit
    #[error("length {len} exceeds the limit of {limit}")]
    LengthLimitExceeded { len: u64, limit: u64 },
}

impl Error {
    /// Creates a parse error for a string payload that could not be read as `target`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use generic_data::Error;
    ///
    /// let err = Error::parse("x1", "i32");
    /// assert_eq!(err.to_string(), "cannot parse \"x1\" as i32");
    /// ```
    pub fn parse(input: &str, target: &'static str) -> Self {
        Error::Parse {
            input: input.to_string(),
            target,
        }
    }

    /// Creates a format error located at `offset` bytes into the input.
    pub fn invalid_format<T: std::fmt::Display>(offset: u64, msg: T) -> Self {
        Error::InvalidFormat {
            offset,
            msg: msg.to_string(),
        }
    }

    /// Creates an end-of-input error located at `offset` bytes into the input.
    pub fn unexpected_eof(offset: u64, expected: &'static str) -> Self {
        Error::UnexpectedEof { offset, expected }
    }

    /// Returns `true` if this error was caused by mutating a frozen node.
    #[must_use]
    pub const fn is_immutable(&self) -> bool {
        matches!(self, Error::Immutable)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_is_kept() {
        let err = Error::from(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        match err {
            Error::Io(inner) => assert_eq!(inner.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn test_messages() {
        assert_eq!(Error::Immutable.to_string(), "data is immutable");
        assert!(Error::invalid_format(7, "bad tag")
            .to_string()
            .contains("byte 7"));
        assert!(Error::unexpected_eof(3, "string bytes")
            .to_string()
            .contains("expected string bytes"));
        assert!(Error::Immutable.is_immutable());
        assert!(!Error::parse("a", "bool").is_immutable());
    }
}
