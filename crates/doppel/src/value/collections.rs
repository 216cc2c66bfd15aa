//! Backing storage for Map and Set.
//!
//! Both keep insertion order and use SameValueZero equality through `MapKey`.

use indexmap::{IndexMap, IndexSet};

use super::{MapKey, Value};

/// Internal storage for a `Map`.
#[derive(Debug, Clone, Default)]
pub struct MapData {
    entries: IndexMap<MapKey, Value>,
}

impl MapData {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the value associated with `key`
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(&MapKey(key.clone()))
    }

    /// Check if `key` is present
    pub fn contains(&self, key: &Value) -> bool {
        self.entries.contains_key(&MapKey(key.clone()))
    }

    /// Insert or update. Updating keeps the key's original position.
    pub fn insert(&mut self, key: Value, value: Value) {
        self.entries.insert(MapKey(key), value);
    }

    /// Remove `key`, keeping the order of the remaining entries
    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        self.entries.shift_remove(&MapKey(key.clone()))
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k.value(), v))
    }

    /// Owned copy of the entries, in insertion order
    pub fn to_pairs(&self) -> Vec<(Value, Value)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl FromIterator<(Value, Value)> for MapData {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut map = MapData::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Internal storage for a `Set`.
#[derive(Debug, Clone, Default)]
pub struct SetData {
    values: IndexSet<MapKey>,
}

impl SetData {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check membership
    pub fn contains(&self, value: &Value) -> bool {
        self.values.contains(&MapKey(value.clone()))
    }

    /// Add a value. Returns false if an equal value was already present.
    pub fn add(&mut self, value: Value) -> bool {
        self.values.insert(MapKey(value))
    }

    /// Remove a value, keeping the order of the rest
    pub fn remove(&mut self, value: &Value) -> bool {
        self.values.shift_remove(&MapKey(value.clone()))
    }

    /// Iterate values in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().map(MapKey::value)
    }

    /// Owned copy of the values, in insertion order
    pub fn to_values(&self) -> Vec<Value> {
        self.iter().cloned().collect()
    }
}

impl FromIterator<Value> for SetData {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut set = SetData::new();
        for v in iter {
            set.add(v);
        }
        set
    }
}
