//! Helpers shared across the crate.
//!
//! - Builder-style `with_*` setters and getters generated by macros.
//! - Deterministic serialization of hash maps and sets.
//! - Field access on already-split table rows.

use std::collections::{
    BTreeMap,
    BTreeSet,
};

use hashbrown::{
    HashMap,
    HashSet,
};
use serde::{
    Serialize,
    Serializer,
};

#[macro_export]
macro_rules! getter_fn {
    ($field_name: ident, $field_type: ty) => {
        pub fn $field_name(&self) -> &$field_type {
            &self.$field_name
        }
    };
}
pub use getter_fn;

#[macro_export]
macro_rules! with_field_fn {
    ($field_name: ident, $field_type: ty) => {
        $crate::paste::paste! {
            pub fn [<with_$field_name>](mut self, value: $field_type) -> Self {
            self.$field_name = value;
            self
            }
        }
    };
}
pub use with_field_fn;

/// Serializes a HashMap in deterministic order.
pub(crate) fn serialize_sorted_map<S, K: Ord + Serialize, V: Serialize>(
    map: &HashMap<K, V>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer, {
    let sorted_map: BTreeMap<_, _> = map.iter().collect();
    sorted_map.serialize(serializer)
}

/// Serializes a HashSet as a sorted sequence.
pub(crate) fn serialize_sorted_set<S, T: Ord + Serialize>(
    set: &HashSet<T>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer, {
    let sorted_set: BTreeSet<_> = set.iter().collect();
    sorted_set.serialize(serializer)
}

/// Returns the trimmed field at `idx`, or an empty string if the row is
/// shorter than that.
pub fn row_field<S: AsRef<str>>(
    row: &[S],
    idx: usize,
) -> &str {
    row.get(idx)
        .map(|value| value.as_ref().trim())
        .unwrap_or("")
}

/// Case-insensitive comparison of a field against a header sentinel.
pub fn is_header_field(
    field: &str,
    sentinel: &str,
) -> bool {
    field.trim().to_lowercase() == sentinel.trim().to_lowercase()
}
