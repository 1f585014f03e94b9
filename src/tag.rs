//! Tag byte parsing and encoding for the binary node layout.
//!
//! A document starts with the magic bytes `GDAT` and a version byte. Every
//! node then starts with a 1-byte tag:
//!
//! ```text
//!  7 6 5 4 3 2 1 0
//! +-----+-+-+-----+
//! |  0  |B|F|kind |
//! +-----+-+-+-----+
//! ```
//!
//! - `kind` (bits 0-2): null, boolean, integral, numeric, string, object,
//!   array, or an empty array slot
//! - `F` (bit 3): the node is frozen
//! - `B` (bit 4): boolean payload, only set for booleans
//! - bits 5-7 are reserved and must be zero
//!
//! Payloads follow the tag: 8 little endian bytes for integral and numeric
//! nodes, a `u32` little endian byte length and UTF-8 bytes for strings, a
//! `u32` count followed by the entries for objects (each a length-prefixed
//! key and a node) and arrays (one node per slot).

use crate::{Error, Result};

pub(crate) const MAGIC: [u8; 4] = *b"GDAT";
pub(crate) const VERSION: u8 = 1;

const KIND_MASK: u8 = 0b0000_0111;
const FROZEN_BIT: u8 = 0b0000_1000;
const BOOL_BIT: u8 = 0b0001_0000;
const RESERVED_MASK: u8 = 0b1110_0000;

/// Node type encoded in the bottom 3 bits of the tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum TagKind {
    Null = 0,
    Boolean = 1,
    Integral = 2,
    Numeric = 3,
    String = 4,
    Object = 5,
    Array = 6,
    EmptySlot = 7,
}

impl TagKind {
    #[inline]
    fn from_bits(bits: u8) -> Self {
        match bits & KIND_MASK {
            0 => TagKind::Null,
            1 => TagKind::Boolean,
            2 => TagKind::Integral,
            3 => TagKind::Numeric,
            4 => TagKind::String,
            5 => TagKind::Object,
            6 => TagKind::Array,
            7 => TagKind::EmptySlot,
            _ => unreachable!(),
        }
    }
}

/// Parsed tag byte.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Tag(u8);

impl Tag {
    /// Validates a raw tag byte read at `offset`.
    pub(crate) fn from_byte(byte: u8, offset: u64) -> Result<Self> {
        if byte & RESERVED_MASK != 0 {
            return Err(Error::invalid_format(
                offset,
                format_args!("reserved bits set in tag {byte:#04x}"),
            ));
        }
        let tag = Tag(byte);
        if byte & BOOL_BIT != 0 && tag.kind() != TagKind::Boolean {
            return Err(Error::invalid_format(
                offset,
                format_args!("boolean bit set on non-boolean tag {byte:#04x}"),
            ));
        }
        if byte & FROZEN_BIT != 0 && tag.kind() == TagKind::EmptySlot {
            return Err(Error::invalid_format(offset, "frozen flag on empty slot"));
        }
        Ok(tag)
    }

    #[inline]
    pub(crate) fn kind(self) -> TagKind {
        TagKind::from_bits(self.0)
    }

    #[inline]
    pub(crate) fn is_frozen(self) -> bool {
        self.0 & FROZEN_BIT != 0
    }

    /// Boolean payload. Only meaningful when `kind()` is `Boolean`.
    #[inline]
    pub(crate) fn bool_value(self) -> bool {
        self.0 & BOOL_BIT != 0
    }

    /// Encodes a tag for a node of `kind`.
    #[inline]
    pub(crate) const fn encode(kind: TagKind, frozen: bool) -> u8 {
        let mut byte = kind as u8;
        if frozen {
            byte |= FROZEN_BIT;
        }
        byte
    }

    /// Encodes a boolean tag carrying `value`.
    #[inline]
    pub(crate) const fn encode_bool(value: bool, frozen: bool) -> u8 {
        let byte = Self::encode(TagKind::Boolean, frozen);
        if value {
            byte | BOOL_BIT
        } else {
            byte
        }
    }
}
