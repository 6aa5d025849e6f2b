//! Fast hash map aliases.
//!
//! The cache keys its tables by 64-bit ids, which are cheap to hash and
//! never attacker controlled, so a fixed-key hasher is used instead of
//! SipHash.

use std::hash::BuildHasherDefault;

/// Hasher used by every agraph map.
pub type FxHasher = ahash::AHasher;

/// Deterministic build-hasher for [`FxHasher`].
pub type FxBuildHasher = BuildHasherDefault<FxHasher>;

/// A `hashbrown` map using [`FxHasher`].
pub type FxHashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

/// A `hashbrown` set using [`FxHasher`].
pub type FxHashSet<K> = hashbrown::HashSet<K, FxBuildHasher>;

/// Creates an empty map able to hold `capacity` entries without rehashing.
#[must_use]
pub fn map_with_capacity<K, V>(capacity: usize) -> FxHashMap<K, V> {
    FxHashMap::with_capacity_and_hasher(capacity, FxBuildHasher::default())
}
