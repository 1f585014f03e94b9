//! The [`data!`](crate::data!) macro for building trees from literals.
//!
//! Arrays and objects are written JSON-style; any other expression goes
//! through `GenericData::from`. Empty brackets and braces produce a null
//! node, since a tree never stores an empty composite.
//!
//! ```rust
//! use generic_data::{data, Data, Kind};
//!
//! let tree = data!({
//!     "name": "sensor",
//!     "limits": [0, 100],
//!     "scale": 0.5,
//!     "enabled": true,
//!     "owner": null
//! });
//!
//! assert_eq!(tree.kind(), Kind::Object);
//! assert_eq!(tree.get("limits").get_i32_at(1).unwrap(), 100);
//! assert!(tree.get("owner").is_null());
//! assert!(data!([]).is_null());
//! ```

#[macro_export]
macro_rules! data {
    (null) => {
        $crate::GenericData::new()
    };

    (true) => {
        $crate::GenericData::from(true)
    };

    (false) => {
        $crate::GenericData::from(false)
    };

    ([]) => {
        $crate::GenericData::new()
    };

    ([ $($elem:tt),* $(,)? ]) => {
        <$crate::GenericData as ::core::iter::FromIterator<$crate::GenericData>>::from_iter(
            [$($crate::data!($elem)),*]
        )
    };

    ({}) => {
        $crate::GenericData::new()
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::DataMap::new();
        $(
            object.insert(::std::string::String::from($key), $crate::data!($value));
        )*
        $crate::GenericData::from(object)
    }};

    // Any other expression convertible into a node
    ($s:expr) => {
        $crate::GenericData::from($s)
    };
}
