use std::collections::HashMap;
use std::hash::Hash;

/// A one-to-one map queryable from both sides. Used for the live
/// order-to-shipper assignment index: at most one shipper per order and at
/// most one order per shipper, checkable in either direction.
#[derive(Debug, Clone, Default)]
pub struct BiMap<K, V> {
    forward: HashMap<K, V>,
    backward: HashMap<V, K>,
}

impl<K, V> BiMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + Eq + Clone,
{
    pub fn new() -> Self {
        BiMap {
            forward: HashMap::new(),
            backward: HashMap::new(),
        }
    }

    /// Inserts the pair, displacing any pair that shares either side.
    pub fn insert(&mut self, k: K, v: V) {
        if let Some(old_v) = self.forward.remove(&k) {
            self.backward.remove(&old_v);
        }
        if let Some(old_k) = self.backward.remove(&v) {
            self.forward.remove(&old_k);
        }
        self.forward.insert(k.clone(), v.clone());
        self.backward.insert(v, k);
    }

    pub fn get_by_key(&self, k: &K) -> Option<&V> {
        self.forward.get(k)
    }

    pub fn get_by_value(&self, v: &V) -> Option<&K> {
        self.backward.get(v)
    }

    pub fn contains_key(&self, k: &K) -> bool {
        self.forward.contains_key(k)
    }

    pub fn contains_value(&self, v: &V) -> bool {
        self.backward.contains_key(v)
    }

    /// Removes the pair keyed by `k`, returning its value side.
    pub fn remove_by_key(&mut self, k: &K) -> Option<V> {
        let v = self.forward.remove(k)?;
        self.backward.remove(&v);
        Some(v)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_displaces_both_sides() {
        let mut map: BiMap<u64, String> = BiMap::new();
        map.insert(1, "a".to_string());
        map.insert(2, "b".to_string());
        // Rebinding key 1 to "b" must evict both old pairs.
        map.insert(1, "b".to_string());
        assert_eq!(map.len(), 1);
        assert_eq!(map.get_by_key(&1), Some(&"b".to_string()));
        assert_eq!(map.get_by_value(&"b".to_string()), Some(&1));
        assert!(!map.contains_key(&2));
        assert!(!map.contains_value(&"a".to_string()));
    }

    #[test]
    fn remove_by_key_clears_the_value_side() {
        let mut map: BiMap<u64, String> = BiMap::new();
        map.insert(7, "x".to_string());
        assert_eq!(map.remove_by_key(&7), Some("x".to_string()));
        assert!(!map.contains_value(&"x".to_string()));
        assert!(map.is_empty());
    }
}
