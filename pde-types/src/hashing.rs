use std::collections::HashMap;
use std::hash::BuildHasherDefault;
use twox_hash::XxHash64;

/// A `HashMap` keyed by [`crate::MDIndex`]/[`crate::LevelMDIndex`] using the
/// xxHash algorithm, per the spec's "hashable (xxHash-based)" index
/// requirement. Plain `std::collections::HashMap` defaults to SipHash,
/// which is unnecessarily DoS-resistant (and slower) for the
/// internally-generated integer keys used throughout the mesh/field/AMR
/// code, so every hot map in this workspace uses this alias instead.
pub type XxIndexMap<K, V> = HashMap<K, V, BuildHasherDefault<XxHash64>>;
