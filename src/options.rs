//! Configuration options for the binary codec.
//!
//! [`CodecOptions`] bounds what the decoder accepts and controls whether
//! frozen flags travel with the data.
//!
//! ## Examples
//!
//! ```rust
//! use generic_data::{data, from_slice_with_options, to_vec_with_options, CodecOptions};
//!
//! let tree = data!({ "a": [1, 2, 3] });
//!
//! let options = CodecOptions::new().with_max_depth(8).with_max_length(1024);
//! let bytes = to_vec_with_options(&tree, &options).unwrap();
//! let back = from_slice_with_options(&bytes, &options).unwrap();
//! assert_eq!(back, tree);
//! ```

/// Configuration options for encoding and decoding data trees.
///
/// # Examples
///
/// ```rust
/// use generic_data::CodecOptions;
///
/// let options = CodecOptions::new();
/// assert_eq!(options.max_depth, 512);
/// assert!(options.preserve_mutability);
///
/// let options = CodecOptions::new()
///     .with_max_depth(32)
///     .with_preserve_mutability(false);
/// assert_eq!(options.max_depth, 32);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodecOptions {
    /// Deepest nesting accepted. The root node is at depth 1. Empty array
    /// slots are not nodes and do not count.
    pub max_depth: usize,
    /// Largest string or key byte length and largest entry or slot count.
    /// The encoder refuses to write what the decoder would refuse to read.
    pub max_length: usize,
    /// Whether frozen flags are written and honored.
    pub preserve_mutability: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        CodecOptions {
            max_depth: 512,
            max_length: 64 * 1024 * 1024,
            preserve_mutability: true,
        }
    }
}

impl CodecOptions {
    /// Creates default options (depth 512, 64 MiB lengths, frozen flags kept).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// When disabled, the encoder writes every node as mutable and the
    /// decoder ignores frozen flags in its input.
    #[must_use]
    pub fn with_preserve_mutability(mut self, preserve: bool) -> Self {
        self.preserve_mutability = preserve;
        self
    }
}
