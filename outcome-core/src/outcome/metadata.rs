//! Immutable key-value side-channel attached to every [`Outcome`].
//!
//! Metadata never participates in equality or hashing and never influences
//! which variant a value holds. Updates are copy-on-write: the backing map
//! is shared behind an `Arc` until a write forces a private copy.
//!
//! [`Outcome`]: crate::Outcome

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// An opaque metadata value.
///
/// Values are type-erased; readers recover them with [`MetaValue::downcast_ref`].
/// Cloning is cheap (shared `Arc`).
#[derive(Clone)]
pub struct MetaValue(Arc<dyn Any + Send + Sync>);

impl MetaValue {
    /// Wrap an arbitrary value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Borrow the value back as `T`, if that is what was stored.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    /// Check whether the stored value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }
}

impl fmt::Debug for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The payload is type-erased; all we can honestly print is its presence.
        f.write_str("MetaValue(..)")
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        Self::new(value)
    }
}

/// Immutable string-keyed map of opaque values.
///
/// An empty map allocates nothing. Non-empty maps share their storage until
/// a write, at which point the writer takes a private copy.
#[derive(Clone, Default)]
pub struct Metadata {
    entries: Option<Arc<BTreeMap<String, MetaValue>>>,
}

impl Metadata {
    /// An empty metadata map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from an iterator of key-value pairs. Later keys win.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<MetaValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let map: BTreeMap<String, MetaValue> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        if map.is_empty() {
            Self::default()
        } else {
            Self {
                entries: Some(Arc::new(map)),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.as_ref().map_or(true, |m| m.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |m| m.len())
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.as_ref().and_then(|m| m.get(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.as_ref().is_some_and(|m| m.contains_key(key))
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries
            .iter()
            .flat_map(|m| m.iter())
            .map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(k, _)| k)
    }

    /// Return a new map with `key` set to `value`. `self` is unchanged.
    ///
    /// An existing entry under the same key is overwritten.
    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        let mut map = self
            .entries
            .as_deref()
            .cloned()
            .unwrap_or_default();
        map.insert(key.into(), value.into());
        Self {
            entries: Some(Arc::new(map)),
        }
    }

    /// Return a new map holding `self` overlaid with `other`.
    ///
    /// On key collision the entry from `other` wins (last write wins).
    #[must_use]
    pub fn merged(&self, other: &Metadata) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let mut map = self
            .entries
            .as_deref()
            .cloned()
            .unwrap_or_default();
        for (k, v) in other.iter() {
            map.insert(k.to_string(), v.clone());
        }
        Self {
            entries: Some(Arc::new(map)),
        }
    }
}

impl fmt::Debug for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}
