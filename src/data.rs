//! The node contract shared by every data implementation.
//!
//! [`Data`] describes a loosely typed node: it may be empty, hold one scalar,
//! hold an ordered list of nodes or hold an ordered set of named nodes. Every
//! implementation exposes the same reads, writes and kind checks, so code written
//! against the trait does not care which concrete tree it is handed.
//!
//! ## Addressing children
//!
//! Keyed and indexed access share one entry point through the sealed
//! [`Index`] trait, in the style of `serde_json::Value::get`:
//!
//! ```rust
//! use generic_data::{data, Data};
//!
//! let node = data!({ "ports": [80, 443] });
//! assert_eq!(node.get("ports").get_i64_at(1).unwrap(), 443);
//! assert!(node.get("missing").is_null());
//! ```
//!
//! ## Typed reads
//!
//! Getters coerce between scalar representations. Only a string payload that
//! cannot be parsed fails; kind checks such as [`Data::is_integral`] never do.
//!
//! ```rust
//! use generic_data::{Data, GenericData};
//!
//! let mut node = GenericData::new();
//! node.set_string("42").unwrap();
//! assert!(node.is_integral());
//! assert_eq!(node.get_i64().unwrap(), 42);
//! assert_eq!(node.get_f64().unwrap(), 42.0);
//! ```

use crate::{DataFactory, Result};
use indexmap::IndexSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// A resolved child address: a property name or a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key<'a> {
    Name(&'a str),
    Position(usize),
}

/// Types usable to address a child of a [`Data`] node.
///
/// Implemented for `usize` (positions), `str` and `String` (property names),
/// and references to those. Positions are unsigned, so a negative index
/// cannot be expressed.
pub trait Index: private::Sealed {
    #[doc(hidden)]
    fn key(&self) -> Key<'_>;
}

impl Index for usize {
    fn key(&self) -> Key<'_> {
        Key::Position(*self)
    }
}

impl Index for str {
    fn key(&self) -> Key<'_> {
        Key::Name(self)
    }
}

impl Index for String {
    fn key(&self) -> Key<'_> {
        Key::Name(self.as_str())
    }
}

impl<T> Index for &T
where
    T: ?Sized + Index,
{
    fn key(&self) -> Key<'_> {
        (**self).key()
    }
}

mod private {
    pub trait Sealed {}
    impl Sealed for usize {}
    impl Sealed for str {}
    impl Sealed for String {}
    impl<T> Sealed for &T where T: ?Sized + Sealed {}
}

/// The capability set of a loosely typed data node.
///
/// Implementors provide the primitive reads, kind checks and writes; keyed and
/// indexed typed accessors are derived from them.
pub trait Data: Sized {
    /// The factory creating peers of this implementation.
    type Factory: DataFactory<Node = Self>;

    /// Returns `true` if the node holds exactly one value, looking through
    /// singleton objects and arrays.
    fn is_atomic(&self) -> bool;

    /// Returns `true` if the value reads as a boolean without error.
    fn is_boolean(&self) -> bool;

    /// Returns `true` if the value reads as an integer without error.
    fn is_integral(&self) -> bool;

    /// Returns `true` if the value reads as a floating point number without error.
    fn is_numeric(&self) -> bool;

    /// Number of first level values: 0 when empty, 1 for a scalar, the entry
    /// or slot count for composites.
    fn size(&self) -> usize;

    /// Property names in insertion order, empty unless the node is an object.
    fn key_set(&self) -> IndexSet<&str>;

    /// The factory that created this node.
    fn data_factory(&self) -> &Self::Factory;

    /// Returns the named child, or the null sentinel.
    fn get_key(&self, key: &str) -> &Self;

    /// Returns the child at `index`, or the null sentinel.
    fn get_index(&self, index: usize) -> &Self;

    fn get_bool(&self) -> Result<bool>;

    /// Text form of the value, `None` when empty. Never fails.
    fn get_string(&self) -> Option<String>;

    fn get_i64(&self) -> Result<i64>;
    fn get_i32(&self) -> Result<i32>;
    fn get_i16(&self) -> Result<i16>;
    fn get_i8(&self) -> Result<i8>;
    fn get_f64(&self) -> Result<f64>;
    fn get_f32(&self) -> Result<f32>;

    fn is_mutable(&self) -> bool;

    /// Resets the node to empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Immutable`](crate::Error::Immutable) if the node is
    /// frozen and not already empty.
    fn clear(&mut self) -> Result<()>;

    /// Replaces the whole content with a deep copy of `value`.
    ///
    /// # Errors
    ///
    /// Fails if this node is immutable.
    fn set_data<D: Data>(&mut self, value: &D) -> Result<&mut Self>;

    /// Attaches `value` under a property name or at a position, promoting
    /// the node to an object or array when needed.
    ///
    /// # Errors
    ///
    /// Fails if this node, or the child the write recurses into, is immutable.
    fn set_at<I: Index>(&mut self, at: I, value: Self) -> Result<&mut Self>;

    fn set_bool(&mut self, value: bool) -> Result<&mut Self>;
    fn set_string<S: Into<String>>(&mut self, value: S) -> Result<&mut Self>;
    fn set_i64(&mut self, value: i64) -> Result<&mut Self>;
    fn set_f64(&mut self, value: f64) -> Result<&mut Self>;

    fn set_i32(&mut self, value: i32) -> Result<&mut Self> {
        self.set_i64(i64::from(value))
    }

    fn set_i16(&mut self, value: i16) -> Result<&mut Self> {
        self.set_i64(i64::from(value))
    }

    fn set_i8(&mut self, value: i8) -> Result<&mut Self> {
        self.set_i64(i64::from(value))
    }

    fn set_f32(&mut self, value: f32) -> Result<&mut Self> {
        self.set_f64(f64::from(value))
    }

    /// Returns `true` if the node has at least one property.
    fn is_object(&self) -> bool {
        !self.key_set().is_empty()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Equivalent to [`Data::is_empty`].
    #[inline]
    fn is_null(&self) -> bool {
        self.is_empty()
    }

    /// Returns the child addressed by a property name or a position. Misses
    /// return the null sentinel.
    fn get<I: Index>(&self, at: I) -> &Self {
        match at.key() {
            Key::Name(name) => self.get_key(name),
            Key::Position(index) => self.get_index(index),
        }
    }

    fn get_bool_at<I: Index>(&self, at: I) -> Result<bool> {
        self.get(at).get_bool()
    }

    fn get_string_at<I: Index>(&self, at: I) -> Option<String> {
        self.get(at).get_string()
    }

    fn get_i64_at<I: Index>(&self, at: I) -> Result<i64> {
        self.get(at).get_i64()
    }

    fn get_i32_at<I: Index>(&self, at: I) -> Result<i32> {
        self.get(at).get_i32()
    }

    fn get_i16_at<I: Index>(&self, at: I) -> Result<i16> {
        self.get(at).get_i16()
    }

    fn get_i8_at<I: Index>(&self, at: I) -> Result<i8> {
        self.get(at).get_i8()
    }

    fn get_f64_at<I: Index>(&self, at: I) -> Result<f64> {
        self.get(at).get_f64()
    }

    fn get_f32_at<I: Index>(&self, at: I) -> Result<f32> {
        self.get(at).get_f32()
    }

    /// Reads the whole node as `T`.
    fn get_as<T: Scalar>(&self) -> Result<T> {
        T::read(self)
    }

    /// Reads the addressed child as `T`.
    fn get_as_at<T: Scalar, I: Index>(&self, at: I) -> Result<T> {
        T::read(self.get(at))
    }

    /// Reads the addressed child as `T`, or returns `default` when the child
    /// is missing or empty.
    ///
    /// ```rust
    /// use generic_data::{data, Data};
    ///
    /// let config = data!({ "port": "8080" });
    /// assert_eq!(config.get_or("port", 80i64).unwrap(), 8080);
    /// assert_eq!(config.get_or("timeout", 30i64).unwrap(), 30);
    /// ```
    fn get_or<T: Scalar, I: Index>(&self, at: I, default: T) -> Result<T> {
        let child = self.get(at);
        if child.is_null() {
            Ok(default)
        } else {
            T::read(child)
        }
    }

    fn set_bool_at<I: Index>(&mut self, at: I, value: bool) -> Result<&mut Self> {
        let mut child = self.data_factory().create_data();
        child.set_bool(value)?;
        self.set_at(at, child)
    }

    fn set_string_at<I: Index, S: Into<String>>(&mut self, at: I, value: S) -> Result<&mut Self> {
        let mut child = self.data_factory().create_data();
        child.set_string(value)?;
        self.set_at(at, child)
    }

    fn set_i64_at<I: Index>(&mut self, at: I, value: i64) -> Result<&mut Self> {
        let mut child = self.data_factory().create_data();
        child.set_i64(value)?;
        self.set_at(at, child)
    }

    fn set_i32_at<I: Index>(&mut self, at: I, value: i32) -> Result<&mut Self> {
        let mut child = self.data_factory().create_data();
        child.set_i32(value)?;
        self.set_at(at, child)
    }

    fn set_i16_at<I: Index>(&mut self, at: I, value: i16) -> Result<&mut Self> {
        let mut child = self.data_factory().create_data();
        child.set_i16(value)?;
        self.set_at(at, child)
    }

    fn set_i8_at<I: Index>(&mut self, at: I, value: i8) -> Result<&mut Self> {
        let mut child = self.data_factory().create_data();
        child.set_i8(value)?;
        self.set_at(at, child)
    }

    fn set_f64_at<I: Index>(&mut self, at: I, value: f64) -> Result<&mut Self> {
        let mut child = self.data_factory().create_data();
        child.set_f64(value)?;
        self.set_at(at, child)
    }

    fn set_f32_at<I: Index>(&mut self, at: I, value: f32) -> Result<&mut Self> {
        let mut child = self.data_factory().create_data();
        child.set_f32(value)?;
        self.set_at(at, child)
    }
}

/// Scalar types readable from any [`Data`] node through its coercing getters.
pub trait Scalar: Sized {
    /// Reads `data` as this type.
    ///
    /// # Errors
    ///
    /// Propagates the parse error of the matching getter.
    fn read<D: Data>(data: &D) -> Result<Self>;
}

impl Scalar for bool {
    fn read<D: Data>(data: &D) -> Result<Self> {
        data.get_bool()
    }
}

/// An empty node reads as the empty string.
impl Scalar for String {
    fn read<D: Data>(data: &D) -> Result<Self> {
        Ok(data.get_string().unwrap_or_default())
    }
}

impl Scalar for i64 {
    fn read<D: Data>(data: &D) -> Result<Self> {
        data.get_i64()
    }
}

impl Scalar for i32 {
    fn read<D: Data>(data: &D) -> Result<Self> {
        data.get_i32()
    }
}

impl Scalar for i16 {
    fn read<D: Data>(data: &D) -> Result<Self> {
        data.get_i16()
    }
}

impl Scalar for i8 {
    fn read<D: Data>(data: &D) -> Result<Self> {
        data.get_i8()
    }
}

impl Scalar for f64 {
    fn read<D: Data>(data: &D) -> Result<Self> {
        data.get_f64()
    }
}

impl Scalar for f32 {
    fn read<D: Data>(data: &D) -> Result<Self> {
        data.get_f32()
    }
}

/// Structural equality between any two [`Data`] implementations.
///
/// Two nodes are equal when both are empty, when both are atomic with the
/// same text form, when both are objects with the same key set and equal
/// values, or when both are positional with equal size and equal elements.
/// Key order and mutability are ignored.
pub fn structural_eq<A: Data, B: Data>(a: &A, b: &B) -> bool {
    if a.is_empty() || b.is_empty() {
        return a.is_empty() && b.is_empty();
    }

    match (a.is_atomic(), b.is_atomic()) {
        (true, true) => return a.get_string() == b.get_string(),
        (false, false) => {}
        _ => return false,
    }

    if a.size() != b.size() {
        return false;
    }

    let a_keys = a.key_set();
    let b_keys = b.key_set();
    if !a_keys.is_empty() || !b_keys.is_empty() {
        return a_keys.len() == b_keys.len()
            && a_keys
                .iter()
                .all(|key| b_keys.contains(key) && structural_eq(a.get_key(key), b.get_key(key)));
    }

    (0..a.size()).all(|i| structural_eq(a.get_index(i), b.get_index(i)))
}

/// Feeds a hash of `data` consistent with [`structural_eq`] into `state`.
///
/// Object entries are combined with a wrapping sum, so insertion order does
/// not change the result.
pub fn structural_hash<D: Data, H: Hasher>(data: &D, state: &mut H) {
    if data.is_empty() {
        state.write_u8(0);
        return;
    }

    if data.is_atomic() {
        state.write_u8(1);
        data.get_string().hash(state);
        return;
    }

    let keys = data.key_set();
    if !keys.is_empty() {
        state.write_u8(2);
        let mut total: u64 = 0;
        for key in keys {
            let mut entry = DefaultHasher::new();
            key.hash(&mut entry);
            structural_hash(data.get_key(key), &mut entry);
            total = total.wrapping_add(entry.finish());
        }
        state.write_usize(data.size());
        state.write_u64(total);
        return;
    }

    state.write_u8(3);
    state.write_usize(data.size());
    for i in 0..data.size() {
        structural_hash(data.get_index(i), state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data, GenericData};

    #[test]
    fn test_index_resolution() {
        assert_eq!(3usize.key(), Key::Position(3));
        assert_eq!("name".key(), Key::Name("name"));
        assert_eq!(String::from("name").key(), Key::Name("name"));
        let owned = String::from("x");
        assert_eq!((&owned).key(), Key::Name("x"));
    }

    #[test]
    fn test_derived_object_and_null() {
        let empty = GenericData::new();
        assert!(empty.is_null());
        assert!(!empty.is_object());

        let object = data!({ "a": 1 });
        assert!(object.is_object());
        assert!(!object.is_null());

        let array = data!([1, 2]);
        assert!(!array.is_object());
    }

    #[test]
    fn test_get_or_uses_default_only_for_missing() {
        let node = data!({ "flag": false, "name": "svc" });
        assert!(!node.get_or("flag", true).unwrap());
        assert!(node.get_or("absent", true).unwrap());
        assert_eq!(
            node.get_or("name", String::from("fallback")).unwrap(),
            "svc"
        );
        assert_eq!(
            node.get_or("other", String::from("fallback")).unwrap(),
            "fallback"
        );
    }

    #[test]
    fn test_get_as() {
        let node = data!({ "ratio": "0.5" });
        assert_eq!(node.get_as_at::<f64, _>("ratio").unwrap(), 0.5);
        assert_eq!(node.get_as::<String>().unwrap(), "0.5");
        assert!(node.get_as_at::<i64, _>("ratio").is_err());
    }

    #[test]
    fn test_structural_eq_rejects_atomic_against_composite() {
        let scalar = GenericData::from(1);
        let array = data!([1, 2]);
        assert!(!structural_eq(&scalar, &array));
        assert!(!structural_eq(&array, &scalar));
    }

    #[test]
    fn test_structural_eq_rejects_object_against_array() {
        let object = data!({ "a": 1, "b": 2 });
        let array = data!([1, 2]);
        assert!(!structural_eq(&object, &array));
        assert!(!structural_eq(&array, &object));
    }

    #[test]
    fn test_structural_hash_ignores_key_order() {
        let first = data!({ "a": 1, "b": [true, "x"] });
        let second = data!({ "b": [true, "x"], "a": 1 });

        let mut h1 = DefaultHasher::new();
        structural_hash(&first, &mut h1);
        let mut h2 = DefaultHasher::new();
        structural_hash(&second, &mut h2);

        assert!(structural_eq(&first, &second));
        assert_eq!(h1.finish(), h2.finish());
    }
}
