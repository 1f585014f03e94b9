//! # generic_data
//!
//! A format-agnostic, loosely typed data tree.
//!
//! ## What is it?
//!
//! A node is empty, holds one scalar (boolean, integral, numeric or string),
//! holds an ordered list of nodes or holds an ordered set of named nodes.
//! Readers ask for the type they want and the node coerces; writers set
//! values by key or position and the node promotes itself to an object or
//! array as needed. Text formats sit above the contract rather than inside
//! it.
//!
//! ## Key Features
//!
//! - **One contract**: the [`Data`] and [`DataFactory`] traits describe every
//!   node implementation; [`GenericData`] is the canonical one
//! - **Lenient reads**: getters coerce between scalar types and lookups never
//!   fail, a miss yields the shared [`NULL`] node
//! - **Freezing**: immutable copies reject every write with
//!   [`Error::Immutable`]
//! - **Binary codec**: a compact tag and length-prefixed layout, bounded by
//!   [`CodecOptions`]
//! - **Serde bridge**: [`GenericData`] implements `Serialize` and
//!   `Deserialize`, so any serde format can carry it
//!
//! ## Quick Start
//!
//! ```rust
//! use generic_data::{data, from_slice, to_vec, Data, GenericData};
//!
//! let mut config = GenericData::new();
//! config
//!     .set_string_at("name", "edge-1")?
//!     .set_i32_at("port", 8443)?;
//! config.set_at("peers", data!(["edge-2", "edge-3"]))?;
//!
//! assert_eq!(config.get_string_at("port").as_deref(), Some("8443"));
//! assert_eq!(config.get("peers").size(), 2);
//!
//! let bytes = to_vec(&config)?;
//! let back = from_slice(&bytes)?;
//! assert_eq!(back, config);
//! # Ok::<(), generic_data::Error>(())
//! ```
//!
//! ### Promotion
//!
//! ```rust
//! use generic_data::{Data, GenericData, Kind};
//!
//! let mut node = GenericData::new();
//! node.set_i64(5)?;
//! node.set_bool_at(2, true)?;
//!
//! assert_eq!(node.kind(), Kind::Array);
//! assert_eq!(node.get_i64_at(0)?, 5);
//! assert!(node.get(1).is_null());
//! # Ok::<(), generic_data::Error>(())
//! ```
//!
//! ### Working through the factory
//!
//! Code written against the traits does not name the concrete node type:
//!
//! ```rust
//! use generic_data::{data, Data, DataFactory};
//!
//! fn roundtrip<D: Data>(node: &D) -> generic_data::Result<D> {
//!     let factory = node.data_factory();
//!     let mut buffer = Vec::new();
//!     factory.serialize(node, &mut buffer)?;
//!     factory.deserialize(buffer.as_slice())
//! }
//!
//! let tree = data!({ "a": [1, 2.5, "x"] });
//! assert_eq!(roundtrip(&tree).unwrap(), tree);
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events: `debug` at the codec boundary and
//! `trace` when a node changes kind or an array grows. No subscriber is
//! installed.

pub mod data;
pub mod de;
pub mod error;
pub mod factory;
mod interop;
pub mod macros;
pub mod map;
pub mod options;
pub mod ser;
mod tag;
pub mod value;

pub use data::{structural_eq, structural_hash, Data, Index, Key, Scalar};
pub use de::Decoder;
pub use error::{Error, Result};
pub use factory::DataFactory;
pub use map::DataMap;
pub use options::CodecOptions;
pub use ser::Encoder;
pub use value::{GenericData, Kind, NULL};

use std::io;
use tracing::debug;

/// Encodes `data` to a writer with default options.
///
/// # Examples
///
/// ```rust
/// use generic_data::{to_writer, GenericData};
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &GenericData::from(42)).unwrap();
/// assert_eq!(buffer.len(), 14);
/// ```
///
/// # Errors
///
/// Returns an error if the tree exceeds the default depth or length limits,
/// or if writing fails.
pub fn to_writer<W>(writer: W, data: &GenericData) -> Result<()>
where
    W: io::Write,
{
    to_writer_with_options(writer, data, &CodecOptions::default())
}

/// Encodes `data` to a writer with custom options.
///
/// # Errors
///
/// Returns an error if the tree exceeds the configured depth or length
/// limits, or if writing fails.
pub fn to_writer_with_options<W>(
    writer: W,
    data: &GenericData,
    options: &CodecOptions,
) -> Result<()>
where
    W: io::Write,
{
    let mut encoder = Encoder::new(writer, options.clone());
    encoder.encode_document(data)?;
    debug!(
        bytes = encoder.bytes_written(),
        nodes = encoder.nodes_written(),
        kind = data.kind().name(),
        "encoded data tree"
    );
    Ok(())
}

/// Encodes `data` into a new byte vector.
///
/// # Errors
///
/// Returns an error if the tree exceeds the default depth or length limits.
pub fn to_vec(data: &GenericData) -> Result<Vec<u8>> {
    to_vec_with_options(data, &CodecOptions::default())
}

/// Encodes `data` into a new byte vector with custom options.
///
/// # Errors
///
/// Returns an error if the tree exceeds the configured depth or length
/// limits.
pub fn to_vec_with_options(data: &GenericData, options: &CodecOptions) -> Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(64);
    to_writer_with_options(&mut buffer, data, options)?;
    Ok(buffer)
}

/// Decodes one tree from a reader with default options.
///
/// The reader is consumed up to the end of the tree; anything after it is
/// left unread.
///
/// # Examples
///
/// ```rust
/// use generic_data::{data, from_reader, to_vec};
/// use std::io::Cursor;
///
/// let bytes = to_vec(&data!([true, null, 3])).unwrap();
/// let tree = from_reader(Cursor::new(bytes)).unwrap();
/// assert_eq!(tree, data!([true, null, 3]));
/// ```
///
/// # Errors
///
/// Returns an error if the input is malformed, truncated or over the default
/// limits, or if reading fails.
pub fn from_reader<R>(reader: R) -> Result<GenericData>
where
    R: io::Read,
{
    from_reader_with_options(reader, &CodecOptions::default())
}

/// Decodes one tree from a reader with custom options.
///
/// # Errors
///
/// Returns an error if the input is malformed, truncated or over the
/// configured limits, or if reading fails.
pub fn from_reader_with_options<R>(reader: R, options: &CodecOptions) -> Result<GenericData>
where
    R: io::Read,
{
    let mut decoder = Decoder::new(reader, options.clone());
    let data = decoder.decode_document()?;
    debug!(
        bytes = decoder.bytes_read(),
        nodes = decoder.nodes_read(),
        kind = data.kind().name(),
        "decoded data tree"
    );
    Ok(data)
}

/// Decodes one tree from a byte slice with default options.
///
/// # Errors
///
/// Returns an error if the bytes are malformed, truncated or over the default
/// limits, or if bytes remain after the tree.
pub fn from_slice(bytes: &[u8]) -> Result<GenericData> {
    from_slice_with_options(bytes, &CodecOptions::default())
}

/// Decodes one tree from a byte slice with custom options.
///
/// # Errors
///
/// Returns an error if the bytes are malformed, truncated or over the
/// configured limits, or if bytes remain after the tree.
pub fn from_slice_with_options(bytes: &[u8], options: &CodecOptions) -> Result<GenericData> {
    let mut decoder = Decoder::new(bytes, options.clone());
    let data = decoder.decode_document()?;
    let consumed = decoder.bytes_read();
    if consumed != bytes.len() as u64 {
        return Err(Error::invalid_format(
            consumed,
            format_args!("{} trailing bytes", bytes.len() as u64 - consumed),
        ));
    }
    debug!(
        bytes = consumed,
        nodes = decoder.nodes_read(),
        kind = data.kind().name(),
        "decoded data tree"
    );
    Ok(data)
}
