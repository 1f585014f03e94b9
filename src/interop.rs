//! Serde support for [`GenericData`].
//!
//! A tree serializes as the serde data model sees it: null as unit, scalars
//! as themselves, arrays as sequences (empty slots as unit) and objects as
//! maps in insertion order. Mutability is not carried; deserialized trees
//! are mutable.
//!
//! ```rust
//! use generic_data::{data, GenericData};
//!
//! let tree = data!({ "id": 1, "tags": ["a", null] });
//! let json = serde_json::to_string(&tree).unwrap();
//! assert_eq!(json, r#"{"id":1,"tags":["a",null]}"#);
//!
//! let back: GenericData = serde_json::from_str(&json).unwrap();
//! assert_eq!(back, tree);
//! ```

use crate::map::DataMap;
use crate::value::Value;
use crate::GenericData;
use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

impl Serialize for GenericData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match &self.value {
            Value::Null => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Integral(i) => serializer.serialize_i64(*i),
            Value::Numeric(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(slots) => {
                let mut seq = serializer.serialize_seq(Some(slots.len()))?;
                for slot in slots {
                    match slot {
                        Some(child) => seq.serialize_element(child)?,
                        None => seq.serialize_element(&())?,
                    }
                }
                seq.end()
            }
            Value::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, child) in entries {
                    map.serialize_entry(key, child)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for GenericData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct GenericDataVisitor;

        impl<'de> Visitor<'de> for GenericDataVisitor {
            type Value = GenericData;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any self-describing value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(GenericData::from(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(GenericData::from(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                match i64::try_from(value) {
                    Ok(value) => Ok(GenericData::from(value)),
                    Err(_) => Ok(GenericData::from(value as f64)),
                }
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(GenericData::from(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(GenericData::from(value))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(GenericData::from(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(GenericData::new())
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(GenericData::new())
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(1024));
                while let Some(item) = seq.next_element::<GenericData>()? {
                    items.push(item);
                }
                Ok(GenericData::from(items))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut entries = DataMap::new();
                while let Some((key, value)) = map.next_entry::<String, GenericData>()? {
                    entries.insert(key, value);
                }
                Ok(GenericData::from(entries))
            }
        }

        deserializer.deserialize_any(GenericDataVisitor)
    }
}

#[cfg(test)]
mod tests {
    use crate::{data, Data, GenericData, Kind};

    #[test]
    fn test_serialize_to_json() {
        let tree = data!({ "b": [1, 2.5, true], "a": "x", "n": null });
        let json = serde_json::to_string(&tree).unwrap();
        assert_eq!(json, r#"{"b":[1,2.5,true],"a":"x","n":null}"#);
    }

    #[test]
    fn test_empty_slots_serialize_as_null() {
        let mut node = GenericData::new();
        node.set_i64_at(2, 7).unwrap();
        assert_eq!(serde_json::to_string(&node).unwrap(), "[null,null,7]");
    }

    #[test]
    fn test_deserialize_normalizes_empty_composites() {
        let tree: GenericData = serde_json::from_str(r#"{"a": {}, "b": []}"#).unwrap();
        assert!(tree.get("a").is_null());
        assert!(tree.get("b").is_null());

        let empty: GenericData = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.kind(), Kind::Null);
    }

    #[test]
    fn test_deserialize_large_unsigned_as_numeric() {
        let tree: GenericData = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(tree.kind(), Kind::Numeric);

        let tree: GenericData = serde_json::from_str("9223372036854775807").unwrap();
        assert_eq!(tree.get_i64().unwrap(), i64::MAX);
    }

    #[test]
    fn test_deserialized_tree_is_mutable() {
        let mut tree: GenericData = serde_json::from_str(r#"{"a": [1]}"#).unwrap();
        assert!(tree.get("a").is_mutable());
        tree.set_i64_at("b", 2).unwrap();
        assert_eq!(tree.size(), 2);
    }
}
