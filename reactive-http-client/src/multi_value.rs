//! Insertion-ordered multimap used for form fields and multipart parts.

use std::collections::HashMap;

/// Map from a field name to one or more values.
///
/// Keys keep the order of their first insertion; values under a key keep
/// the order they were added in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiValueMap<V> {
    entries: Vec<(String, Vec<V>)>,
    /// Position of each key in `entries`.
    index: HashMap<String, usize>,
}

impl<V> Default for MultiValueMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> MultiValueMap<V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `key`.
    pub fn add(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1.push(value),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, vec![value]));
            }
        }
    }

    /// Append a value under `key`, builder style.
    pub fn with(mut self, key: impl Into<String>, value: V) -> Self {
        self.add(key, value);
        self
    }

    /// All values under `key`.
    pub fn get_all(&self, key: &str) -> &[V] {
        self.index
            .get(key)
            .map(|&pos| self.entries[pos].1.as_slice())
            .unwrap_or_default()
    }

    /// First value under `key`.
    pub fn get_first(&self, key: &str) -> Option<&V> {
        self.get_all(key).first()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate every `(key, value)` pair, keys in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |v| (key.as_str(), v)))
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for MultiValueMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.add(key, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_grouped_under_first_insertion() {
        let map: MultiValueMap<&str> = [("b", "1"), ("a", "2"), ("b", "3")].into_iter().collect();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get_all("b"), &["1", "3"]);
        assert_eq!(map.get_first("a"), Some(&"2"));
        assert_eq!(
            map.iter().collect::<Vec<_>>(),
            vec![("b", &"1"), ("b", &"3"), ("a", &"2")]
        );
    }

    #[test]
    fn test_many_keys_keep_order() {
        let mut map = MultiValueMap::new();
        for round in 0..3 {
            for i in 0..2000 {
                map.add(format!("k{}", i), round);
            }
        }

        assert_eq!(map.len(), 2000);
        assert_eq!(map.get_all("k1999"), &[0, 1, 2]);
        let keys: Vec<_> = map.iter().map(|(k, _)| k).step_by(3).take(3).collect();
        assert_eq!(keys, vec!["k0", "k1", "k2"]);
    }

    #[test]
    fn test_missing_key() {
        let map = MultiValueMap::<String>::new();
        assert!(map.is_empty());
        assert!(map.get_all("x").is_empty());
        assert_eq!(map.get_first("x"), None);
    }
}
