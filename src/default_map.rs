use crate::error::CollectionError;
use crate::observer::SetHook;
use indexmap::IndexMap;
use std::fmt::Debug;
use std::hash::Hash;

/// A map that materializes a default value the first time a missing key is accessed.
///
/// The factory runs at most once per distinct key, and its result is stored
/// before it is handed out. Entries iterate in the order they were first created.
///
/// # Examples
///
/// ```
/// use sovran_collections::{DefaultMap, CollectionError};
///
/// let mut index: DefaultMap<char, Vec<i32>> = DefaultMap::new(Vec::new);
/// for (k, v) in [('a', 1), ('b', 2), ('a', 3)] {
///     index.get(k).push(v);
/// }
///
/// assert_eq!(index.get_existing(&'a')?, &vec![1, 3]);
/// assert!(index.get_existing(&'z').is_err());
/// # Ok::<(), CollectionError>(())
/// ```
pub struct DefaultMap<K, V> {
    items: IndexMap<K, V>,
    factory: Box<dyn Fn() -> V>,
    hook: Option<SetHook<K, V>>,
}

impl<K, V> DefaultMap<K, V>
where
    K: Eq + Hash + Debug,
{
    /// Creates an empty map using `factory` to build defaults.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> V + 'static,
    {
        Self {
            items: IndexMap::new(),
            factory: Box::new(factory),
            hook: None,
        }
    }

    /// Installs a callback invoked on every [`DefaultMap::set`].
    pub fn set_hook(&mut self, hook: SetHook<K, V>) {
        self.hook = Some(hook);
    }

    /// Returns the value for `key`, creating it from the factory if absent.
    pub fn get(&mut self, key: K) -> &mut V {
        let factory = &self.factory;
        self.items.entry(key).or_insert_with(|| {
            log::trace!("materializing default value");
            factory()
        })
    }

    /// Returns the value for `key` without creating it.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::KeyNotFound` if the key doesn't exist.
    pub fn get_existing(&self, key: &K) -> Result<&V, CollectionError> {
        self.items
            .get(key)
            .ok_or_else(|| CollectionError::KeyNotFound(format!("{:?}", key)))
    }

    /// Stores a value directly, bypassing the factory. Returns the previous value.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        if let Some(hook) = self.hook.as_mut() {
            hook(&key, &value);
        }
        self.items.insert(key, value)
    }

    /// Runs `f` against the value for `key`, materializing it first if needed.
    pub fn with_mut<F, R>(&mut self, key: K, f: F) -> R
    where
        F: FnOnce(&mut V) -> R,
    {
        f(self.get(key))
    }

    /// Runs `f` against an existing value.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::KeyNotFound` if the key doesn't exist.
    pub fn with<F, R>(&self, key: &K, f: F) -> Result<R, CollectionError>
    where
        F: FnOnce(&V) -> R,
    {
        self.get_existing(key).map(f)
    }

    /// Removes a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.items.shift_remove(key)
    }

    /// Returns true if the key has a value. Never materializes.
    pub fn contains_key(&self, key: &K) -> bool {
        self.items.contains_key(key)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates entries in creation order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, K, V> {
        self.items.iter()
    }

    /// Drops the factory and returns the plain map.
    pub fn into_index_map(self) -> IndexMap<K, V> {
        self.items
    }
}

/// Groups `(key, value)` pairs into `key -> values`, keeping first-seen key order.
pub fn group_pairs<K, V, I>(pairs: I) -> IndexMap<K, Vec<V>>
where
    K: Eq + Hash + Debug,
    V: 'static,
    I: IntoIterator<Item = (K, V)>,
{
    let mut grouped = DefaultMap::new(Vec::new);
    for (key, value) in pairs {
        grouped.get(key).push(value);
    }
    grouped.into_index_map()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_grouping() {
        let grouped = group_pairs(vec![('a', 1), ('b', 2), ('a', 3), ('b', 4), ('c', 5)]);
        let flat: Vec<_> = grouped.into_iter().collect();
        assert_eq!(
            flat,
            vec![('a', vec![1, 3]), ('b', vec![2, 4]), ('c', vec![5])]
        );
    }

    #[test]
    fn test_factory_runs_once_per_key() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut map: DefaultMap<&str, i32> = DefaultMap::new(move || {
            counter.set(counter.get() + 1);
            0
        });

        *map.get("a") += 1;
        *map.get("a") += 1;
        *map.get("b") += 1;
        assert_eq!(calls.get(), 2);
        assert_eq!(map.get_existing(&"a"), Ok(&2));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_get_existing_does_not_materialize() {
        let mut map: DefaultMap<&str, Vec<u8>> = DefaultMap::new(Vec::new);
        assert_eq!(
            map.get_existing(&"missing"),
            Err(CollectionError::KeyNotFound("\"missing\"".to_string()))
        );
        assert!(map.is_empty());
        assert!(map.with(&"missing", |v| v.len()).is_err());

        map.with_mut("present", |v| v.push(1));
        assert_eq!(map.with(&"present", |v| v.len()), Ok(1));
    }

    #[test]
    fn test_set_bypasses_factory() {
        let mut map: DefaultMap<&str, i32> = DefaultMap::new(|| panic!("factory must not run"));
        assert_eq!(map.set("k", 7), None);
        assert_eq!(*map.get("k"), 7);
        assert_eq!(map.remove(&"k"), Some(7));
        assert!(!map.contains_key(&"k"));
    }

    #[test]
    fn test_set_hook() {
        let writes = Rc::new(Cell::new(0));
        let sink = Rc::clone(&writes);
        let mut map: DefaultMap<&str, i32> = DefaultMap::new(|| 0);
        map.set_hook(Box::new(move |_: &&str, _: &i32| sink.set(sink.get() + 1)));

        map.set("a", 1);
        *map.get("b") += 1;
        assert_eq!(writes.get(), 1);
    }
}
