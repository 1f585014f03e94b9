//! Binary encoding of data trees.
//!
//! The [`Encoder`] writes the private layout described in the `tag` module.
//! Most callers go through [`to_writer`](crate::to_writer),
//! [`to_vec`](crate::to_vec) or [`DataFactory::serialize`](crate::DataFactory::serialize).
//!
//! ## Direct Encoder Usage
//!
//! ```rust
//! use generic_data::{data, CodecOptions, Encoder};
//!
//! let tree = data!({ "id": 7, "tags": ["a", "b"] });
//!
//! let mut encoder = Encoder::new(Vec::new(), CodecOptions::new());
//! encoder.encode_document(&tree).unwrap();
//! assert_eq!(encoder.nodes_written(), 5);
//!
//! let bytes = encoder.into_inner();
//! assert_eq!(&bytes[..4], b"GDAT");
//! ```

use crate::tag::{Tag, TagKind, MAGIC, VERSION};
use crate::value::Value;
use crate::{CodecOptions, Error, GenericData, Result};
use std::io;

/// Writes data trees to a byte sink.
pub struct Encoder<W> {
    writer: W,
    options: CodecOptions,
    bytes: u64,
    nodes: usize,
}

impl<W: io::Write> Encoder<W> {
    pub fn new(writer: W, options: CodecOptions) -> Self {
        Encoder {
            writer,
            options,
            bytes: 0,
            nodes: 0,
        }
    }

    /// Writes the header followed by `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree is nested deeper than the configured
    /// limit, if a string, key or collection is longer than the configured
    /// limit, or if writing fails.
    pub fn encode_document(&mut self, data: &GenericData) -> Result<()> {
        self.write(&MAGIC)?;
        self.write(&[VERSION])?;
        self.encode_node(data, 1)
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }

    /// Number of nodes written so far, empty slots excluded.
    #[must_use]
    pub fn nodes_written(&self) -> usize {
        self.nodes
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn encode_node(&mut self, data: &GenericData, depth: usize) -> Result<()> {
        if depth > self.options.max_depth {
            return Err(Error::DepthLimitExceeded(self.options.max_depth));
        }
        self.nodes += 1;

        let frozen = self.options.preserve_mutability && !data.mutable;
        match &data.value {
            Value::Null => self.write(&[Tag::encode(TagKind::Null, frozen)]),
            Value::Boolean(b) => self.write(&[Tag::encode_bool(*b, frozen)]),
            Value::Integral(i) => {
                self.write(&[Tag::encode(TagKind::Integral, frozen)])?;
                self.write(&i.to_le_bytes())
            }
            Value::Numeric(f) => {
                self.write(&[Tag::encode(TagKind::Numeric, frozen)])?;
                self.write(&f.to_bits().to_le_bytes())
            }
            Value::String(s) => {
                self.write(&[Tag::encode(TagKind::String, frozen)])?;
                self.write_str(s)
            }
            Value::Object(map) => {
                self.write(&[Tag::encode(TagKind::Object, frozen)])?;
                self.write_len(map.len())?;
                for (key, child) in map {
                    self.write_str(key)?;
                    self.encode_node(child, depth + 1)?;
                }
                Ok(())
            }
            Value::Array(slots) => {
                self.write(&[Tag::encode(TagKind::Array, frozen)])?;
                self.write_len(slots.len())?;
                for slot in slots {
                    match slot {
                        Some(child) => self.encode_node(child, depth + 1)?,
                        None => self.write(&[Tag::encode(TagKind::EmptySlot, false)])?,
                    }
                }
                Ok(())
            }
        }
    }

    fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_len(s.len())?;
        self.write(s.as_bytes())
    }

    /// Writes a length prefix. Lengths the decoder would refuse under the
    /// same options are refused here.
    fn write_len(&mut self, len: usize) -> Result<()> {
        if len > self.options.max_length {
            return Err(Error::LengthLimitExceeded {
                len: len as u64,
                limit: self.options.max_length as u64,
            });
        }
        let encoded = u32::try_from(len).map_err(|_| Error::LengthLimitExceeded {
            len: len as u64,
            limit: u64::from(u32::MAX),
        })?;
        self.write(&encoded.to_le_bytes())
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.bytes += bytes.len() as u64;
        Ok(())
    }
}
