//! The canonical data node.
//!
//! [`GenericData`] is a tagged variant tree implementing [`Data`] and acting as
//! its own [`DataFactory`]. The active [`Kind`] of a node changes in place as
//! setters promote it:
//!
//! - a keyed write on an empty or scalar node turns it into an object
//!   (a previous scalar is dropped),
//! - an indexed write past position 0 turns it into an array (a previous
//!   scalar is kept in slot 0),
//! - keyed writes on arrays and indexed writes on objects go to element 0.
//!
//! ## Usage Patterns
//!
//! ### Building a tree
//!
//! ```rust
//! use generic_data::{Data, GenericData};
//!
//! let mut node = GenericData::new();
//! node.set_string_at("host", "localhost")?
//!     .set_i64_at("port", 8080)?
//!     .set_bool_at("tls", true)?;
//!
//! assert!(node.is_object());
//! assert_eq!(node.size(), 3);
//! assert_eq!(node.get_i64_at("port")?, 8080);
//! # Ok::<(), generic_data::Error>(())
//! ```
//!
//! ### Coercion
//!
//! ```rust
//! use generic_data::{Data, GenericData};
//!
//! let mut node = GenericData::new();
//! node.set_f64(2.75)?;
//! assert_eq!(node.get_i64()?, 2);
//! assert!(node.get_bool()?);
//! assert_eq!(node.get_string().as_deref(), Some("2.75"));
//! # Ok::<(), generic_data::Error>(())
//! ```
//!
//! ### Freezing
//!
//! ```rust
//! use generic_data::{data, Data, GenericData};
//!
//! let original = data!({ "retries": 3 });
//! let mut frozen = GenericData::from_data(&original, false)?;
//! assert!(frozen.set_i64(1).is_err());
//! assert_eq!(frozen, original);
//! # Ok::<(), generic_data::Error>(())
//! ```

use crate::data::{structural_eq, structural_hash, Data, Index, Key};
use crate::{DataFactory, DataMap, Error, Result};
use indexmap::IndexSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io;
use std::mem;
use std::str::FromStr;
use tracing::trace;

/// The shared, immutable empty node returned by every lookup miss.
pub static NULL: GenericData = GenericData {
    value: Value::Null,
    mutable: false,
};

/// The active variant of a node.
///
/// The kind describes what is stored, not what a getter can read: a
/// [`Kind::String`] node holding `"42"` still answers `get_i64` with `42`.
///
/// # Examples
///
/// ```rust
/// use generic_data::{data, Kind};
///
/// assert_eq!(data!(null).kind(), Kind::Null);
/// assert_eq!(data!("42").kind(), Kind::String);
/// assert_eq!(data!([1, 2]).kind(), Kind::Array);
/// assert!(Kind::Numeric.is_scalar());
/// assert!(!Kind::Object.is_scalar());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// No value. Empty objects and arrays collapse to this kind.
    Null,
    Boolean,
    /// A signed 64-bit integer.
    Integral,
    /// A 64-bit floating point number.
    Numeric,
    String,
    /// Named properties in insertion order.
    Object,
    /// Positional slots, some of which may be empty.
    Array,
}

impl Kind {
    /// Lower case name, used in log lines and error messages.
    ///
    /// ```rust
    /// use generic_data::Kind;
    ///
    /// assert_eq!(Kind::Integral.name(), "integral");
    /// assert_eq!(Kind::Array.to_string(), "array");
    /// ```
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Integral => "integral",
            Kind::Numeric => "numeric",
            Kind::String => "string",
            Kind::Object => "object",
            Kind::Array => "array",
        }
    }

    /// Returns `true` for the four scalar kinds.
    #[inline]
    #[must_use]
    pub const fn is_scalar(self) -> bool {
        matches!(
            self,
            Kind::Boolean | Kind::Integral | Kind::Numeric | Kind::String
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload of a node. Object and array payloads are never empty.
#[derive(Clone, Debug, Default)]
pub(crate) enum Value {
    #[default]
    Null,
    Boolean(bool),
    Integral(i64),
    Numeric(f64),
    String(String),
    Object(DataMap),
    /// `None` marks an empty slot, read back as [`NULL`].
    Array(Vec<Option<GenericData>>),
}

/// A loosely typed, mutable data tree.
///
/// # Examples
///
/// ```rust
/// use generic_data::{Data, GenericData, Kind};
///
/// let mut node = GenericData::new();
/// assert_eq!(node.kind(), Kind::Null);
///
/// node.set_i32_at(0, 1)?.set_i32_at(3, 4)?;
/// assert_eq!(node.kind(), Kind::Array);
/// assert_eq!(node.size(), 4);
/// assert!(node.get(1).is_null());
/// assert_eq!(node.get_i32_at(3)?, 4);
/// # Ok::<(), generic_data::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct GenericData {
    pub(crate) value: Value,
    pub(crate) mutable: bool,
}

impl GenericData {
    /// Creates an empty, mutable node.
    ///
    /// ```rust
    /// use generic_data::{Data, GenericData};
    ///
    /// let node = GenericData::new();
    /// assert!(node.is_null());
    /// assert!(node.is_mutable());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        GenericData {
            value: Value::Null,
            mutable: true,
        }
    }

    /// Returns the shared null sentinel.
    ///
    /// This is the same [`NULL`] instance every lookup miss returns. It is
    /// frozen, so clones of it reject writes.
    #[inline]
    #[must_use]
    pub fn null() -> &'static GenericData {
        &NULL
    }

    /// Creates a deep copy of any [`Data`] node with the given mutability.
    ///
    /// Every node of the copy carries the same flag, so `mutable = false`
    /// yields a permanently frozen tree.
    ///
    /// The copy goes through the [`Data`] getters, so each single value is
    /// stored as the first kind it reads as, in the order integral, numeric,
    /// boolean, string. Text such as `"007"`, `"1e3"` or `"TRUE"` therefore
    /// comes back as `7`, `1000.0` or `true`, and the copy may not compare
    /// equal to the source. Nulls inside arrays become empty slots. Copying
    /// a copy changes nothing further. Use [`GenericData::frozen`] or
    /// [`GenericData::thawed`] for an exact copy of a `GenericData`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use generic_data::{data, Data, GenericData, Kind};
    ///
    /// let source = data!({ "code": "007", "name": "bond" });
    /// let copy = GenericData::from_data(&source, false)?;
    ///
    /// assert!(!copy.is_mutable());
    /// assert_eq!(copy.get("code").kind(), Kind::Integral);
    /// assert_eq!(copy.get("name").kind(), Kind::String);
    /// assert_ne!(copy, source);
    /// assert_eq!(source.frozen(), source);
    /// # Ok::<(), generic_data::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Propagates a getter failure of `source`, which only happens when a
    /// source implementation reports a value as parsable and then fails to
    /// read it.
    pub fn from_data<D: Data>(source: &D, mutable: bool) -> Result<Self> {
        Ok(GenericData {
            value: Self::copy_value(source, mutable)?,
            mutable,
        })
    }

    /// Returns a frozen deep copy of this node.
    ///
    /// Unlike [`GenericData::from_data`] no value is coerced, so the copy
    /// always compares equal to `self`.
    ///
    /// ```rust
    /// use generic_data::{data, Data};
    ///
    /// let config = data!({ "port": "0080" });
    /// let mut frozen = config.frozen();
    /// assert_eq!(frozen, config);
    /// assert!(frozen.set_i64_at("port", 80).is_err());
    /// ```
    #[must_use]
    pub fn frozen(&self) -> GenericData {
        self.with_mutability(false)
    }

    /// Returns a mutable deep copy of this node, including every frozen
    /// descendant.
    #[must_use]
    pub fn thawed(&self) -> GenericData {
        self.with_mutability(true)
    }

    /// The active variant of this node.
    ///
    /// ```rust
    /// use generic_data::{Data, GenericData, Kind};
    ///
    /// let mut node = GenericData::new();
    /// node.set_i64(5)?;
    /// assert_eq!(node.kind(), Kind::Integral);
    ///
    /// node.set_string_at("k", "v")?;
    /// assert_eq!(node.kind(), Kind::Object);
    /// # Ok::<(), generic_data::Error>(())
    /// ```
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self.value {
            Value::Null => Kind::Null,
            Value::Boolean(_) => Kind::Boolean,
            Value::Integral(_) => Kind::Integral,
            Value::Numeric(_) => Kind::Numeric,
            Value::String(_) => Kind::String,
            Value::Object(_) => Kind::Object,
            Value::Array(_) => Kind::Array,
        }
    }

    /// Returns the properties if this node is an object.
    ///
    /// ```rust
    /// use generic_data::data;
    ///
    /// let node = data!({ "a": 1, "b": 2 });
    /// let keys: Vec<_> = node.as_object().unwrap().keys().collect();
    /// assert_eq!(keys, ["a", "b"]);
    /// assert!(data!([1]).as_object().is_none());
    /// ```
    #[must_use]
    pub fn as_object(&self) -> Option<&DataMap> {
        match &self.value {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the stored string if this node holds a string payload.
    ///
    /// No conversion happens: a numeric node returns `None` here even though
    /// [`Data::get_string`] renders it.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Iterates over the slots of an array, yielding the null sentinel for
    /// empty slots. Yields nothing for other kinds.
    ///
    /// ```rust
    /// use generic_data::{Data, GenericData};
    ///
    /// let mut node = GenericData::new();
    /// node.set_i64_at(2, 7)?;
    /// let values: Vec<i64> = node
    ///     .elements()
    ///     .map(|item| item.get_i64())
    ///     .collect::<Result<_, _>>()?;
    /// assert_eq!(values, [0, 0, 7]);
    /// # Ok::<(), generic_data::Error>(())
    /// ```
    pub fn elements(&self) -> impl Iterator<Item = &GenericData> + '_ {
        let slots: &[Option<GenericData>] = match &self.value {
            Value::Array(slots) => slots.as_slice(),
            _ => &[],
        };
        slots.iter().map(|slot| slot.as_ref().unwrap_or(&NULL))
    }

    fn with_mutability(&self, mutable: bool) -> GenericData {
        let value = match &self.value {
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, child)| (key.clone(), child.with_mutability(mutable)))
                    .collect(),
            ),
            Value::Array(slots) => Value::Array(
                slots
                    .iter()
                    .map(|slot| slot.as_ref().map(|child| child.with_mutability(mutable)))
                    .collect(),
            ),
            other => other.clone(),
        };
        GenericData { value, mutable }
    }

    fn copy_value<D: Data>(source: &D, mutable: bool) -> Result<Value> {
        if source.is_null() {
            return Ok(Value::Null);
        }

        let keys = source.key_set();
        if !keys.is_empty() {
            let mut map = DataMap::with_capacity(keys.len());
            for key in keys {
                map.insert(
                    key.to_string(),
                    GenericData::from_data(source.get_key(key), mutable)?,
                );
            }
            return Ok(Value::Object(map));
        }

        // A singleton wrapping a composite keeps its structure.
        if source.size() > 1 || !source.is_atomic() {
            let slots = (0..source.size())
                .map(|i| {
                    let item = source.get_index(i);
                    if item.is_null() {
                        Ok(None)
                    } else {
                        GenericData::from_data(item, mutable).map(Some)
                    }
                })
                .collect::<Result<Vec<_>>>()?;
            return Ok(Value::Array(slots));
        }

        if source.is_integral() {
            Ok(Value::Integral(source.get_i64()?))
        } else if source.is_numeric() {
            Ok(Value::Numeric(source.get_f64()?))
        } else if source.is_boolean() {
            Ok(Value::Boolean(source.get_bool()?))
        } else {
            Ok(Value::String(source.get_string().unwrap_or_default()))
        }
    }

    #[inline]
    fn check_mutable(&self) -> Result<()> {
        if self.mutable {
            Ok(())
        } else {
            Err(Error::Immutable)
        }
    }

    fn replace(&mut self, value: Value) -> Result<&mut Self> {
        self.check_mutable()?;
        self.value = value;
        Ok(self)
    }

    fn coerce<T: Coerce>(&self) -> Result<T> {
        match &self.value {
            Value::Null => Ok(T::from_bool(false)),
            Value::Boolean(b) => Ok(T::from_bool(*b)),
            Value::Integral(i) => Ok(T::from_i64(*i)),
            Value::Numeric(f) => Ok(T::from_f64(*f)),
            Value::String(s) => T::parse(s),
            Value::Object(_) | Value::Array(_) => self.get_index(0).coerce(),
        }
    }

    fn reads_as<T: Coerce>(&self, kind: Kind) -> bool {
        match &self.value {
            Value::Null => false,
            Value::String(s) => T::parse(s).is_ok(),
            Value::Object(_) | Value::Array(_) => {
                self.size() == 1 && self.get_index(0).reads_as::<T>(kind)
            }
            _ => self.kind() == kind,
        }
    }

    fn put_key(&mut self, key: &str, value: GenericData) -> Result<()> {
        let kind = self.kind();
        match &mut self.value {
            Value::Object(map) => {
                map.insert(key.to_string(), value);
            }
            Value::Array(slots) => {
                first_slot(slots).set_at(key, value)?;
            }
            _ => {
                trace!(from = kind.name(), key, "promoting node to object");
                let mut map = DataMap::with_capacity(1);
                map.insert(key.to_string(), value);
                self.value = Value::Object(map);
            }
        }
        Ok(())
    }

    fn put_index(&mut self, index: usize, value: GenericData) -> Result<()> {
        let kind = self.kind();
        match &mut self.value {
            Value::Array(slots) => {
                if index >= slots.len() {
                    trace!(from = slots.len(), to = index + 1, "growing array");
                    slots.resize_with(index + 1, || None);
                }
                slots[index] = Some(value);
            }
            Value::Object(map) => match map.first_mut() {
                Some(first) => {
                    first.set_at(index, value)?;
                }
                None => self.value = promoted(Value::Null, index, value),
            },
            Value::Null => {
                trace!(index, "promoting null node to array");
                self.value = promoted(Value::Null, index, value);
            }
            _ if index == 0 => self.value = value.value,
            _ => {
                trace!(from = kind.name(), index, "promoting node to array");
                let prior = mem::take(&mut self.value);
                self.value = promoted(prior, index, value);
            }
        }
        Ok(())
    }
}

/// Builds an array holding `prior` in slot 0 (unless empty) and `value` at
/// `index`.
fn promoted(prior: Value, index: usize, value: GenericData) -> Value {
    let mut slots = Vec::with_capacity(index + 1);
    slots.resize_with(index + 1, || None);
    if !matches!(prior, Value::Null) {
        slots[0] = Some(GenericData {
            value: prior,
            mutable: true,
        });
    }
    slots[index] = Some(value);
    Value::Array(slots)
}

fn first_slot(slots: &mut Vec<Option<GenericData>>) -> &mut GenericData {
    if slots.is_empty() {
        slots.push(None);
    }
    slots[0].get_or_insert_with(GenericData::new)
}

fn parse_bool(s: &str) -> Result<bool> {
    if s.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if s.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(Error::parse(s, "bool"))
    }
}

/// Conversions from each scalar representation into a target type.
trait Coerce: Sized {
    fn from_bool(value: bool) -> Self;
    fn from_i64(value: i64) -> Self;
    fn from_f64(value: f64) -> Self;
    fn parse(s: &str) -> Result<Self>;
}

impl Coerce for bool {
    fn from_bool(value: bool) -> Self {
        value
    }

    fn from_i64(value: i64) -> Self {
        value != 0
    }

    fn from_f64(value: f64) -> Self {
        value != 0.0
    }

    fn parse(s: &str) -> Result<Self> {
        parse_bool(s)
    }
}

macro_rules! coerce_integer {
    ($($ty:ident),*) => {$(
        impl Coerce for $ty {
            fn from_bool(value: bool) -> Self {
                $ty::from(value)
            }

            fn from_i64(value: i64) -> Self {
                value as $ty
            }

            fn from_f64(value: f64) -> Self {
                value as $ty
            }

            fn parse(s: &str) -> Result<Self> {
                $ty::from_str(s).map_err(|_| Error::parse(s, stringify!($ty)))
            }
        }
    )*};
}

macro_rules! coerce_float {
    ($($ty:ident),*) => {$(
        impl Coerce for $ty {
            fn from_bool(value: bool) -> Self {
                if value { 1.0 } else { 0.0 }
            }

            fn from_i64(value: i64) -> Self {
                value as $ty
            }

            fn from_f64(value: f64) -> Self {
                value as $ty
            }

            fn parse(s: &str) -> Result<Self> {
                $ty::from_str(s.trim()).map_err(|_| Error::parse(s, stringify!($ty)))
            }
        }
    )*};
}

coerce_integer!(i64, i32, i16, i8);
coerce_float!(f64, f32);

impl Data for GenericData {
    type Factory = GenericData;

    fn is_atomic(&self) -> bool {
        match &self.value {
            Value::Null => false,
            Value::Boolean(_) | Value::Integral(_) | Value::Numeric(_) | Value::String(_) => true,
            Value::Object(_) | Value::Array(_) => {
                self.size() == 1 && self.get_index(0).is_atomic()
            }
        }
    }

    fn is_boolean(&self) -> bool {
        self.reads_as::<bool>(Kind::Boolean)
    }

    fn is_integral(&self) -> bool {
        self.reads_as::<i64>(Kind::Integral)
    }

    fn is_numeric(&self) -> bool {
        self.reads_as::<f64>(Kind::Numeric)
    }

    fn size(&self) -> usize {
        match &self.value {
            Value::Null => 0,
            Value::Boolean(_) | Value::Integral(_) | Value::Numeric(_) | Value::String(_) => 1,
            Value::Object(map) => map.len(),
            Value::Array(slots) => slots.len(),
        }
    }

    fn key_set(&self) -> IndexSet<&str> {
        match &self.value {
            Value::Object(map) => map.keys().map(String::as_str).collect(),
            _ => IndexSet::new(),
        }
    }

    fn data_factory(&self) -> &GenericData {
        self
    }

    fn get_key(&self, key: &str) -> &GenericData {
        match &self.value {
            Value::Object(map) => map.get(key).unwrap_or(&NULL),
            _ => &NULL,
        }
    }

    fn get_index(&self, index: usize) -> &GenericData {
        match &self.value {
            Value::Null => &NULL,
            Value::Boolean(_) | Value::Integral(_) | Value::Numeric(_) | Value::String(_) => {
                if index == 0 {
                    self
                } else {
                    &NULL
                }
            }
            Value::Object(map) => map.get_index(index).unwrap_or(&NULL),
            Value::Array(slots) => slots
                .get(index)
                .and_then(Option::as_ref)
                .unwrap_or(&NULL),
        }
    }

    fn get_bool(&self) -> Result<bool> {
        self.coerce()
    }

    fn get_string(&self) -> Option<String> {
        match &self.value {
            Value::Null => None,
            Value::Boolean(b) => Some(b.to_string()),
            Value::Integral(i) => Some(i.to_string()),
            Value::Numeric(f) => Some(format!("{f:?}")),
            Value::String(s) => Some(s.clone()),
            Value::Object(_) | Value::Array(_) => self.get_index(0).get_string(),
        }
    }

    fn get_i64(&self) -> Result<i64> {
        self.coerce()
    }

    fn get_i32(&self) -> Result<i32> {
        self.coerce()
    }

    fn get_i16(&self) -> Result<i16> {
        self.coerce()
    }

    fn get_i8(&self) -> Result<i8> {
        self.coerce()
    }

    fn get_f64(&self) -> Result<f64> {
        self.coerce()
    }

    fn get_f32(&self) -> Result<f32> {
        self.coerce()
    }

    fn is_mutable(&self) -> bool {
        self.mutable
    }

    fn clear(&mut self) -> Result<()> {
        if matches!(self.value, Value::Null) {
            return Ok(());
        }
        self.check_mutable()?;
        self.value = Value::Null;
        Ok(())
    }

    fn set_data<D: Data>(&mut self, value: &D) -> Result<&mut Self> {
        self.check_mutable()?;
        let copied = Self::copy_value(value, self.mutable)?;
        self.value = copied;
        Ok(self)
    }

    fn set_at<I: Index>(&mut self, at: I, value: GenericData) -> Result<&mut Self> {
        self.check_mutable()?;
        match at.key() {
            Key::Name(name) => self.put_key(name, value)?,
            Key::Position(index) => self.put_index(index, value)?,
        }
        Ok(self)
    }

    fn set_bool(&mut self, value: bool) -> Result<&mut Self> {
        self.replace(Value::Boolean(value))
    }

    fn set_string<S: Into<String>>(&mut self, value: S) -> Result<&mut Self> {
        self.replace(Value::String(value.into()))
    }

    fn set_i64(&mut self, value: i64) -> Result<&mut Self> {
        self.replace(Value::Integral(value))
    }

    fn set_f64(&mut self, value: f64) -> Result<&mut Self> {
        self.replace(Value::Numeric(value))
    }
}

impl DataFactory for GenericData {
    type Node = GenericData;

    fn create_data(&self) -> GenericData {
        GenericData::new()
    }

    fn serialize<W: io::Write>(&self, data: &GenericData, writer: W) -> Result<()> {
        crate::to_writer(writer, data)
    }

    fn deserialize<R: io::Read>(&self, reader: R) -> Result<GenericData> {
        crate::from_reader(reader)
    }
}

impl Default for GenericData {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for GenericData {
    fn eq(&self, other: &Self) -> bool {
        structural_eq(self, other)
    }
}

impl Eq for GenericData {}

impl Hash for GenericData {
    fn hash<H: Hasher>(&self, state: &mut H) {
        structural_hash(self, state);
    }
}

impl fmt::Display for GenericData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integral(i) => write!(f, "{i}"),
            Value::Numeric(n) => write!(f, "{n:?}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Object(map) => {
                f.write_str("{")?;
                for (i, (key, child)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key:?}: {child}")?;
                }
                f.write_str("}")
            }
            Value::Array(_) => {
                f.write_str("[")?;
                for (i, child) in self.elements().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for GenericData {
    fn from(value: bool) -> Self {
        GenericData {
            value: Value::Boolean(value),
            mutable: true,
        }
    }
}

macro_rules! from_integral {
    ($($ty:ty),*) => {$(
        impl From<$ty> for GenericData {
            fn from(value: $ty) -> Self {
                GenericData {
                    value: Value::Integral(i64::from(value)),
                    mutable: true,
                }
            }
        }
    )*};
}

from_integral!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for GenericData {
    fn from(value: f32) -> Self {
        GenericData::from(f64::from(value))
    }
}

impl From<f64> for GenericData {
    fn from(value: f64) -> Self {
        GenericData {
            value: Value::Numeric(value),
            mutable: true,
        }
    }
}

impl From<String> for GenericData {
    fn from(value: String) -> Self {
        GenericData {
            value: Value::String(value),
            mutable: true,
        }
    }
}

impl From<&str> for GenericData {
    fn from(value: &str) -> Self {
        GenericData::from(value.to_string())
    }
}

/// An empty map becomes a null node.
impl From<DataMap> for GenericData {
    fn from(map: DataMap) -> Self {
        let value = if map.is_empty() {
            Value::Null
        } else {
            Value::Object(map)
        };
        GenericData {
            value,
            mutable: true,
        }
    }
}

/// An empty vector becomes a null node.
impl From<Vec<GenericData>> for GenericData {
    fn from(items: Vec<GenericData>) -> Self {
        items.into_iter().collect()
    }
}

impl FromIterator<GenericData> for GenericData {
    fn from_iter<T: IntoIterator<Item = GenericData>>(iter: T) -> Self {
        let slots: Vec<_> = iter.into_iter().map(Some).collect();
        let value = if slots.is_empty() {
            Value::Null
        } else {
            Value::Array(slots)
        };
        GenericData {
            value,
            mutable: true,
        }
    }
}

impl FromIterator<(String, GenericData)> for GenericData {
    fn from_iter<T: IntoIterator<Item = (String, GenericData)>>(iter: T) -> Self {
        GenericData::from(iter.into_iter().collect::<DataMap>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data;

    #[test]
    fn test_null_sentinel_is_shared() {
        let node = GenericData::new();
        assert!(std::ptr::eq(node.get("missing"), GenericData::null()));
        assert!(std::ptr::eq(node.get(3), &NULL));
        assert!(!NULL.is_mutable());
    }

    #[test]
    fn test_sizes_per_kind() {
        assert_eq!(GenericData::new().size(), 0);
        assert_eq!(GenericData::from(true).size(), 1);
        assert_eq!(GenericData::from(1).size(), 1);
        assert_eq!(GenericData::from(1.5).size(), 1);
        assert_eq!(GenericData::from("x").size(), 1);
        assert_eq!(data!({ "a": 1, "b": 2 }).size(), 2);
        assert_eq!(data!([1, 2, 3]).size(), 3);
    }

    #[test]
    fn test_coercion_matrix_boolean() {
        let node = GenericData::from(true);
        assert!(node.get_bool().unwrap());
        assert_eq!(node.get_i64().unwrap(), 1);
        assert_eq!(node.get_f64().unwrap(), 1.0);
        assert_eq!(node.get_string().as_deref(), Some("true"));
    }

    #[test]
    fn test_coercion_matrix_integral() {
        let node = GenericData::from(-7);
        assert!(node.get_bool().unwrap());
        assert_eq!(node.get_i64().unwrap(), -7);
        assert_eq!(node.get_f64().unwrap(), -7.0);
        assert_eq!(node.get_string().as_deref(), Some("-7"));
        assert!(!GenericData::from(0).get_bool().unwrap());
    }

    #[test]
    fn test_coercion_matrix_numeric() {
        let node = GenericData::from(-2.5);
        assert!(node.get_bool().unwrap());
        assert_eq!(node.get_i64().unwrap(), -2);
        assert_eq!(node.get_f64().unwrap(), -2.5);
        assert_eq!(node.get_string().as_deref(), Some("-2.5"));
        assert_eq!(GenericData::from(3.0).get_string().as_deref(), Some("3.0"));
    }

    #[test]
    fn test_coercion_matrix_null() {
        let node = GenericData::new();
        assert!(!node.get_bool().unwrap());
        assert_eq!(node.get_i64().unwrap(), 0);
        assert_eq!(node.get_f64().unwrap(), 0.0);
        assert_eq!(node.get_string(), None);
    }

    #[test]
    fn test_string_parse_failures_propagate() {
        let node = GenericData::from("abc");
        assert!(matches!(
            node.get_i64(),
            Err(Error::Parse { target: "i64", .. })
        ));
        assert!(matches!(
            node.get_f64(),
            Err(Error::Parse { target: "f64", .. })
        ));
        assert!(matches!(
            node.get_bool(),
            Err(Error::Parse { target: "bool", .. })
        ));
        assert_eq!(node.get_string().as_deref(), Some("abc"));
    }

    #[test]
    fn test_kind_checks_never_fail() {
        let node = GenericData::from("abc");
        assert!(!node.is_boolean());
        assert!(!node.is_integral());
        assert!(!node.is_numeric());

        let number = GenericData::from("12");
        assert!(number.is_integral());
        assert!(number.is_numeric());
        assert!(!number.is_boolean());

        let flag = GenericData::from("TRUE");
        assert!(flag.is_boolean());
        assert!(flag.get_bool().unwrap());
    }

    #[test]
    fn test_kind_checks_report_scalar_kind_only() {
        assert!(!GenericData::from(1).is_numeric());
        assert!(!GenericData::from(1.0).is_integral());
        assert!(!GenericData::from(true).is_integral());
        assert!(!GenericData::new().is_boolean());
    }

    #[test]
    fn test_narrow_integers() {
        let node = GenericData::from(300);
        assert_eq!(node.get_i16().unwrap(), 300);
        assert_eq!(node.get_i8().unwrap(), 300i64 as i8);

        let text = GenericData::from("300");
        assert_eq!(text.get_i32().unwrap(), 300);
        assert!(matches!(text.get_i8(), Err(Error::Parse { target: "i8", .. })));

        let float = GenericData::from(1e10);
        assert_eq!(float.get_i32().unwrap(), i32::MAX);
    }

    #[test]
    fn test_numeric_string_is_trimmed() {
        let node = GenericData::from(" 1.25 ");
        assert!(node.is_numeric());
        assert_eq!(node.get_f32().unwrap(), 1.25);
        assert!(!node.is_integral());
    }

    #[test]
    fn test_composites_delegate_to_first_element() {
        let array = data!(["7", 8]);
        assert_eq!(array.get_i64().unwrap(), 7);
        assert_eq!(array.get_string().as_deref(), Some("7"));

        let object = data!({ "b": false, "a": true });
        assert!(!object.get_bool().unwrap());
    }

    #[test]
    fn test_atomicity_through_singletons() {
        assert!(!GenericData::new().is_atomic());
        assert!(GenericData::from(1).is_atomic());
        assert!(data!([1]).is_atomic());
        assert!(data!({ "a": [1] }).is_atomic());
        assert!(!data!([1, 2]).is_atomic());
        assert!(!data!({ "a": [1, 2] }).is_atomic());
    }

    #[test]
    fn test_keyed_set_on_scalar_discards_it() {
        let mut node = GenericData::from(5);
        node.set_string_at("a", "x").unwrap();

        assert_eq!(node.kind(), Kind::Object);
        assert_eq!(node.size(), 1);
        assert_eq!(node.get(0).get_string().as_deref(), Some("x"));
    }

    #[test]
    fn test_indexed_set_on_scalar_keeps_it_in_slot_zero() {
        let mut node = GenericData::from("first");
        node.set_i64_at(2, 9).unwrap();

        assert_eq!(node.kind(), Kind::Array);
        assert_eq!(node.size(), 3);
        assert_eq!(node.get_string_at(0).as_deref(), Some("first"));
        assert!(node.get(1).is_null());
        assert_eq!(node.get_i64_at(2).unwrap(), 9);
    }

    #[test]
    fn test_indexed_set_zero_on_scalar_replaces_it() {
        let mut node = GenericData::from("first");
        node.set_i64_at(0, 9).unwrap();

        assert_eq!(node.kind(), Kind::Integral);
        assert_eq!(node.get_i64().unwrap(), 9);
    }

    #[test]
    fn test_indexed_set_on_null_builds_array() {
        let mut node = GenericData::new();
        node.set_bool_at(0, true).unwrap();
        assert_eq!(node.kind(), Kind::Array);
        assert_eq!(node.size(), 1);
        assert!(node.get_bool().unwrap());
    }

    #[test]
    fn test_keyed_set_on_array_recurses_into_first_element() {
        let mut node = data!([{ "a": 1 }, 2]);
        node.set_i64_at("b", 3).unwrap();

        assert_eq!(node.kind(), Kind::Array);
        assert_eq!(node.get(0).get_i64_at("b").unwrap(), 3);
        assert_eq!(node.get(0).size(), 2);
    }

    #[test]
    fn test_keyed_set_on_array_fills_empty_first_slot() {
        let mut node = GenericData::new();
        node.set_i64_at(2, 1).unwrap();
        node.set_i64_at("k", 5).unwrap();

        assert_eq!(node.size(), 3);
        assert_eq!(node.get(0).get_i64_at("k").unwrap(), 5);
    }

    #[test]
    fn test_indexed_set_on_object_recurses_into_first_entry() {
        let mut node = data!({ "a": 1, "b": 2 });
        node.set_i64_at(1, 10).unwrap();

        assert_eq!(node.kind(), Kind::Object);
        assert_eq!(node.size(), 2);
        let first = node.get("a");
        assert_eq!(first.kind(), Kind::Array);
        assert_eq!(first.get_i64_at(0).unwrap(), 1);
        assert_eq!(first.get_i64_at(1).unwrap(), 10);
    }

    #[test]
    fn test_array_growth_keeps_grown_store() {
        let mut node = GenericData::new();
        node.set_i32_at(0, 1).unwrap();
        node.set_i32_at(3, 4).unwrap();
        node.set_i32_at(6, 7).unwrap();

        assert_eq!(node.size(), 7);
        assert_eq!(node.get_i32_at(3).unwrap(), 4);
        assert_eq!(node.get_i32_at(6).unwrap(), 7);
        assert!(node.get(5).is_null());
    }

    #[test]
    fn test_clear() {
        let mut node = data!({ "a": 1 });
        node.clear().unwrap();
        assert!(node.is_null());
        assert_eq!(node.kind(), Kind::Null);

        let mut frozen = GenericData::from(1).frozen();
        assert!(matches!(frozen.clear(), Err(Error::Immutable)));
        assert_eq!(frozen.get_i64().unwrap(), 1);

        let mut frozen_empty = GenericData::new().frozen();
        assert!(frozen_empty.clear().is_ok());
    }

    #[test]
    fn test_every_setter_checks_mutability() {
        let mut node = GenericData::new().frozen();
        assert!(node.set_bool(true).is_err());
        assert!(node.set_string("x").is_err());
        assert!(node.set_i64(1).is_err());
        assert!(node.set_f32(1.0).is_err());
        assert!(node.set_i8_at("k", 1).is_err());
        assert!(node.set_i16_at(2, 1).is_err());
        assert!(node.set_data(&GenericData::from(1)).is_err());
        assert!(node.is_null());
    }

    #[test]
    fn test_frozen_child_rejects_recursive_write() {
        let mut node = GenericData::new();
        node.set_at(0, data!({ "a": 1 }).frozen()).unwrap();
        node.set_i64_at(1, 2).unwrap();

        assert!(matches!(node.set_i64_at("b", 3), Err(Error::Immutable)));
        assert_eq!(node.get(0).size(), 1);
    }

    #[test]
    fn test_set_data_coercion_precedence() {
        let mut node = GenericData::new();

        node.set_data(&GenericData::from("42")).unwrap();
        assert_eq!(node.kind(), Kind::Integral);

        node.set_data(&GenericData::from("4.5")).unwrap();
        assert_eq!(node.kind(), Kind::Numeric);

        node.set_data(&GenericData::from("false")).unwrap();
        assert_eq!(node.kind(), Kind::Boolean);

        node.set_data(&GenericData::from("plain")).unwrap();
        assert_eq!(node.kind(), Kind::String);

        node.set_data(&data!([3])).unwrap();
        assert_eq!(node.kind(), Kind::Integral);

        node.set_data(&GenericData::new()).unwrap();
        assert_eq!(node.kind(), Kind::Null);
    }

    #[test]
    fn test_set_data_copies_structure() {
        let source = data!({ "list": [1, "two", null], "nested": { "x": 1.5 } });
        let mut node = GenericData::from(0);
        node.set_data(&source).unwrap();

        assert_eq!(node, source);
        assert_eq!(node.get("list").size(), 3);
        assert!(node.get("list").get(2).is_null());
    }

    #[test]
    fn test_set_data_keeps_singleton_wrapper_of_composite() {
        let source = data!([[1, 2]]);
        let mut node = GenericData::new();
        node.set_data(&source).unwrap();

        assert_eq!(node.kind(), Kind::Array);
        assert_eq!(node.size(), 1);
        assert_eq!(node.get(0).size(), 2);
    }

    #[test]
    fn test_from_data_frozen_is_deep() {
        let original = data!({ "inner": { "v": 1 } });
        let frozen = GenericData::from_data(&original, false).unwrap();

        assert!(!frozen.is_mutable());
        assert!(!frozen.get("inner").is_mutable());
        assert!(!frozen.get("inner").get("v").is_mutable());

        let thawed = frozen.thawed();
        assert!(thawed.get("inner").get("v").is_mutable());
    }

    #[test]
    fn test_from_data_coerces_scalar_text() {
        let source = data!({ "code": "007", "pad": "0 ", "ratio": "nan", "word": "x" });
        let copy = GenericData::from_data(&source, true).unwrap();

        assert_eq!(copy.get("code").kind(), Kind::Integral);
        assert_eq!(copy.get_i64_at("code").unwrap(), 7);
        assert_eq!(copy.get("pad").kind(), Kind::Numeric);
        assert_eq!(copy.get("ratio").kind(), Kind::Numeric);
        assert_eq!(copy.get("word").kind(), Kind::String);
        assert_ne!(copy, source);
        assert_eq!(GenericData::from_data(&copy, true).unwrap(), copy);

        let exact = source.frozen();
        assert_eq!(exact.get("code").kind(), Kind::String);
        assert_eq!(exact, source);
    }

    #[test]
    fn test_display() {
        let node = data!({ "a": [1, null, "x"], "b": 2.0 });
        assert_eq!(node.to_string(), r#"{"a": [1, null, "x"], "b": 2.0}"#);
    }

    #[test]
    fn test_empty_collections_become_null() {
        assert!(GenericData::from(Vec::new()).is_null());
        assert!(GenericData::from(DataMap::new()).is_null());
    }

    #[test]
    fn test_factory_is_self() {
        let node = data!([1, 2]);
        let created = node.data_factory().create_data();
        assert!(created.is_null());
        assert!(created.is_mutable());
    }
}
