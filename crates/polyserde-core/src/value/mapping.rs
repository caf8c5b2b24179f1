use super::Value;
use indexmap::IndexMap;
use std::slice;
use std::vec;

/// Insertion-ordered mapping whose keys may be any [`Value`].
///
/// Keys are compared structurally, so a list key stands in for a tuple key and
/// float keys work without hashing. String and integer keys are also indexed
/// by hash; other keys are found by a linear scan.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    entries: Vec<(Value, Value)>,
    index: IndexMap<IndexKey, usize>,
}

/// Hashable form of the key kinds that are indexed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum IndexKey {
    Str(String),
    Int(i64),
}

impl IndexKey {
    fn of(key: &Value) -> Option<Self> {
        match key {
            Value::Str(s) => Some(IndexKey::Str(s.clone())),
            Value::Int(i) => Some(IndexKey::Int(*i)),
            _ => None,
        }
    }
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert an entry. An existing equal key keeps its position and the old
    /// value is returned.
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.push_new(key, value);
                None
            }
        }
    }

    /// Append an entry whose key the caller knows is not present yet, such as
    /// a key of a JSON object.
    pub(crate) fn insert_unique(&mut self, key: impl Into<Value>, value: impl Into<Value>) {
        let key = key.into();
        debug_assert!(self.position(&key).is_none());
        self.push_new(key, value.into());
    }

    fn push_new(&mut self, key: Value, value: Value) {
        if let Some(indexed) = IndexKey::of(&key) {
            self.index.insert(indexed, self.entries.len());
        }
        self.entries.push((key, value));
    }

    fn position(&self, key: &Value) -> Option<usize> {
        match key {
            Value::Str(s) => self.index.get(&IndexKey::Str(s.clone())).copied(),
            Value::Int(i) => self.index.get(&IndexKey::Int(*i)).copied(),
            _ => self.entries.iter().position(|(k, _)| k == key),
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.index
            .get(&IndexKey::Str(key.to_string()))
            .map(|&i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.position(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when every key is a string (vacuously true for an empty mapping).
    pub fn is_string_keyed(&self) -> bool {
        self.entries.iter().all(|(k, _)| matches!(k, Value::Str(_)))
    }

    pub fn iter(&self) -> slice::Iter<'_, (Value, Value)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }
}

/// Mapping equality ignores entry order, like dictionary equality.
impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|o| o == v))
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Mapping::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for Mapping {
    type Item = (Value, Value);
    type IntoIter = vec::IntoIter<(Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = &'a (Value, Value);
    type IntoIter = slice::Iter<'a, (Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
