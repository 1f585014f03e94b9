//! Binary decoding of data trees.
//!
//! The [`Decoder`] reads the layout written by the [`Encoder`](crate::Encoder)
//! and rejects anything the encoder could not have produced: unknown tags,
//! empty collections, duplicate keys, misplaced empty slots and invalid
//! UTF-8. Lengths and nesting are bounded by [`CodecOptions`].
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use generic_data::{data, from_slice, to_vec};
//!
//! let tree = data!({ "name": "sensor", "readings": [1.5, 2.5] });
//! let bytes = to_vec(&tree).unwrap();
//! assert_eq!(from_slice(&bytes).unwrap(), tree);
//! ```
//!
//! ## Error Locations
//!
//! Format errors carry the byte offset at which the offending element
//! starts; truncation errors carry the offset at which the input ran out:
//!
//! ```rust
//! use generic_data::{from_slice, Error};
//!
//! let err = from_slice(b"GDAT\x01\x04\x05\x00\x00\x00ab").unwrap_err();
//! assert!(matches!(err, Error::UnexpectedEof { offset: 12, .. }));
//! ```

use crate::map::DataMap;
use crate::tag::{Tag, TagKind, MAGIC, VERSION};
use crate::value::Value;
use crate::{CodecOptions, Error, GenericData, Result};
use std::io::{self, Read};

/// Reads data trees from a byte source.
pub struct Decoder<R> {
    reader: R,
    options: CodecOptions,
    offset: u64,
    nodes: usize,
}

impl<R: io::Read> Decoder<R> {
    pub fn new(reader: R, options: CodecOptions) -> Self {
        Decoder {
            reader,
            options,
            offset: 0,
            nodes: 0,
        }
    }

    /// Reads the header and one tree.
    ///
    /// Bytes following the tree are left in the reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the header is wrong, if the input is malformed,
    /// truncated or over the configured limits, or if reading fails.
    pub fn decode_document(&mut self) -> Result<GenericData> {
        let mut magic = [0u8; 4];
        self.read_exact(&mut magic, "magic bytes")?;
        if magic != MAGIC {
            return Err(Error::invalid_format(0, "missing GDAT magic bytes"));
        }

        let version = self.read_u8("version byte")?;
        if version != VERSION {
            return Err(Error::invalid_format(
                4,
                format_args!("unsupported version {version}"),
            ));
        }

        let start = self.offset;
        self.decode_node(1)?
            .ok_or_else(|| Error::invalid_format(start, "empty slot outside an array"))
    }

    /// Number of bytes consumed so far.
    #[must_use]
    pub fn bytes_read(&self) -> u64 {
        self.offset
    }

    /// Number of nodes decoded so far, empty slots excluded.
    #[must_use]
    pub fn nodes_read(&self) -> usize {
        self.nodes
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Decodes one node. `None` stands for an empty array slot.
    ///
    /// Empty slots are not nodes and do not count toward the depth limit.
    fn decode_node(&mut self, depth: usize) -> Result<Option<GenericData>> {
        let tag_offset = self.offset;
        let tag = Tag::from_byte(self.read_u8("tag byte")?, tag_offset)?;

        if tag.kind() == TagKind::EmptySlot {
            return Ok(None);
        }
        if depth > self.options.max_depth {
            return Err(Error::DepthLimitExceeded(self.options.max_depth));
        }

        let value = match tag.kind() {
            TagKind::EmptySlot => return Ok(None),
            TagKind::Null => Value::Null,
            TagKind::Boolean => Value::Boolean(tag.bool_value()),
            TagKind::Integral => {
                let mut buf = [0u8; 8];
                self.read_exact(&mut buf, "integral payload")?;
                Value::Integral(i64::from_le_bytes(buf))
            }
            TagKind::Numeric => {
                let mut buf = [0u8; 8];
                self.read_exact(&mut buf, "numeric payload")?;
                Value::Numeric(f64::from_bits(u64::from_le_bytes(buf)))
            }
            TagKind::String => Value::String(self.read_str("string bytes")?),
            TagKind::Object => {
                let count = self.read_len("entry count")?;
                if count == 0 {
                    return Err(Error::invalid_format(tag_offset, "empty object"));
                }
                let mut map = DataMap::with_capacity(count.min(1024));
                for _ in 0..count {
                    let key_offset = self.offset;
                    let key = self.read_str("property name")?;
                    if map.contains_key(&key) {
                        return Err(Error::invalid_format(
                            key_offset,
                            format_args!("duplicate property {key:?}"),
                        ));
                    }
                    let child_offset = self.offset;
                    let child = self.decode_node(depth + 1)?.ok_or_else(|| {
                        Error::invalid_format(child_offset, "empty slot outside an array")
                    })?;
                    map.insert(key, child);
                }
                Value::Object(map)
            }
            TagKind::Array => {
                let count = self.read_len("slot count")?;
                if count == 0 {
                    return Err(Error::invalid_format(tag_offset, "empty array"));
                }
                let mut slots = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    slots.push(self.decode_node(depth + 1)?);
                }
                Value::Array(slots)
            }
        };

        self.nodes += 1;
        Ok(Some(GenericData {
            value,
            mutable: !(self.options.preserve_mutability && tag.is_frozen()),
        }))
    }

    fn read_str(&mut self, expected: &'static str) -> Result<String> {
        let len = self.read_len(expected)?;
        let start = self.offset;

        let mut bytes = Vec::with_capacity(len.min(64 * 1024));
        let read = (&mut self.reader).take(len as u64).read_to_end(&mut bytes)?;
        self.offset += read as u64;
        if read < len {
            return Err(Error::unexpected_eof(self.offset, expected));
        }

        String::from_utf8(bytes).map_err(|err| {
            let valid = err.utf8_error().valid_up_to() as u64;
            Error::invalid_format(start + valid, "invalid UTF-8")
        })
    }

    fn read_len(&mut self, expected: &'static str) -> Result<usize> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf, expected)?;
        let len = u32::from_le_bytes(buf);
        match usize::try_from(len) {
            Ok(len) if len <= self.options.max_length => Ok(len),
            _ => Err(Error::LengthLimitExceeded {
                len: u64::from(len),
                limit: self.options.max_length as u64,
            }),
        }
    }

    fn read_u8(&mut self, expected: &'static str) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf, expected)?;
        Ok(buf[0])
    }

    fn read_exact(&mut self, buf: &mut [u8], expected: &'static str) -> Result<()> {
        match self.reader.read_exact(buf) {
            Ok(()) => {
                self.offset += buf.len() as u64;
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                Err(Error::unexpected_eof(self.offset, expected))
            }
            Err(err) => Err(Error::Io(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data, to_vec, Data, Encoder};

    fn decode(bytes: &[u8]) -> Result<GenericData> {
        Decoder::new(bytes, CodecOptions::new()).decode_document()
    }

    fn header(body: &[u8]) -> Vec<u8> {
        let mut bytes = b"GDAT\x01".to_vec();
        bytes.extend_from_slice(body);
        bytes
    }

    #[test]
    fn test_round_trip_counts() {
        let tree = data!({ "id": 7, "tags": ["a", "b"], "ok": true });
        let mut encoder = Encoder::new(Vec::new(), CodecOptions::new());
        encoder.encode_document(&tree).unwrap();
        let written = encoder.nodes_written();
        let bytes = encoder.into_inner();

        let mut decoder = Decoder::new(bytes.as_slice(), CodecOptions::new());
        let back = decoder.decode_document().unwrap();
        assert_eq!(back, tree);
        assert_eq!(decoder.nodes_read(), written);
        assert_eq!(decoder.bytes_read(), bytes.len() as u64);
    }

    #[test]
    fn test_rejects_bad_header() {
        assert!(matches!(
            decode(b"JSON\x01\x00"),
            Err(Error::InvalidFormat { offset: 0, .. })
        ));
        assert!(matches!(
            decode(b"GDAT\x02\x00"),
            Err(Error::InvalidFormat { offset: 4, .. })
        ));
        assert!(matches!(
            decode(b"GD"),
            Err(Error::UnexpectedEof { offset: 0, .. })
        ));
    }

    #[test]
    fn test_truncated_payloads() {
        let err = decode(&header(&[TagKind::Integral as u8, 1, 2])).unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof { offset: 6, expected: "integral payload" }));

        let err = decode(&header(&[TagKind::Array as u8, 2, 0, 0, 0, 0])).unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof { expected: "tag byte", .. }));
    }

    #[test]
    fn test_rejects_empty_collections() {
        let err = decode(&header(&[TagKind::Object as u8, 0, 0, 0, 0])).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { offset: 5, .. }));

        let err = decode(&header(&[TagKind::Array as u8, 0, 0, 0, 0])).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { offset: 5, .. }));
    }

    #[test]
    fn test_rejects_misplaced_empty_slots() {
        assert!(decode(&header(&[TagKind::EmptySlot as u8])).is_err());

        let mut body = vec![TagKind::Object as u8, 1, 0, 0, 0, 1, 0, 0, 0, b'k'];
        body.push(TagKind::EmptySlot as u8);
        let err = decode(&header(&body)).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { offset: 15, .. }));
    }

    #[test]
    fn test_rejects_duplicate_keys() {
        let mut body = vec![TagKind::Object as u8, 2, 0, 0, 0];
        for _ in 0..2 {
            body.extend_from_slice(&[1, 0, 0, 0, b'k', TagKind::Null as u8]);
        }
        let err = decode(&header(&body)).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { offset: 16, .. }));
    }

    #[test]
    fn test_rejects_invalid_utf8() {
        let body = [TagKind::String as u8, 2, 0, 0, 0, b'a', 0xFF];
        let err = decode(&header(&body)).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { offset: 11, .. }));
    }

    #[test]
    fn test_length_limit() {
        let bytes = to_vec(&GenericData::from("a longer string")).unwrap();
        let mut decoder = Decoder::new(bytes.as_slice(), CodecOptions::new().with_max_length(4));
        assert!(matches!(
            decoder.decode_document(),
            Err(Error::LengthLimitExceeded { len: 15, limit: 4 })
        ));
    }

    #[test]
    fn test_depth_limit() {
        let bytes = to_vec(&data!([[[1]]])).unwrap();
        let mut decoder = Decoder::new(bytes.as_slice(), CodecOptions::new().with_max_depth(3));
        assert!(matches!(
            decoder.decode_document(),
            Err(Error::DepthLimitExceeded(3))
        ));
    }

    #[test]
    fn test_empty_slots_do_not_count_toward_depth() {
        let mut node = GenericData::new();
        node.set_data(&data!([null])).unwrap();
        let options = CodecOptions::new().with_max_depth(1);

        let mut encoder = Encoder::new(Vec::new(), options.clone());
        encoder.encode_document(&node).unwrap();
        let bytes = encoder.into_inner();

        let back = Decoder::new(bytes.as_slice(), options).decode_document().unwrap();
        assert_eq!(back.size(), 1);
        assert!(back.get(0).is_null());
    }

    #[test]
    fn test_frozen_flags() {
        let bytes = to_vec(&data!({ "a": 1 }).frozen()).unwrap();

        let frozen = decode(&bytes).unwrap();
        assert!(!frozen.is_mutable());
        assert!(!frozen.get("a").is_mutable());

        let mut decoder = Decoder::new(
            bytes.as_slice(),
            CodecOptions::new().with_preserve_mutability(false),
        );
        let thawed = decoder.decode_document().unwrap();
        assert!(thawed.get("a").is_mutable());
    }

    #[test]
    fn test_leaves_trailing_bytes() {
        let mut bytes = to_vec(&GenericData::from(true)).unwrap();
        bytes.extend_from_slice(b"rest");

        let mut decoder = Decoder::new(bytes.as_slice(), CodecOptions::new());
        decoder.decode_document().unwrap();
        assert_eq!(decoder.into_inner(), b"rest");
    }
}
