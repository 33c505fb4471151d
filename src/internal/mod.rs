//! Internal implementation details.

pub(crate) mod instance_cache;
pub(crate) mod singletons;

pub(crate) use singletons::{CacheSnapshot, Lookup, SingletonCache};

#[cfg(feature = "performance")]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;
#[cfg(not(feature = "performance"))]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V>;

#[cfg(feature = "performance")]
pub(crate) type Set<K> = std::collections::HashSet<K, ahash::RandomState>;
#[cfg(not(feature = "performance"))]
pub(crate) type Set<K> = std::collections::HashSet<K>;
