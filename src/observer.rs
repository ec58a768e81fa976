use crate::error::CollectionError;
use indexmap::IndexMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Callback invoked with the key and new value on every write.
pub type SetHook<K, V> = Box<dyn FnMut(&K, &V)>;

/// A write hook that reports each assignment through the `log` crate.
pub fn log_writes<K: Debug + 'static, V: Debug + 'static>() -> SetHook<K, V> {
    Box::new(|key: &K, value: &V| log::debug!("Setting {:?} = {:?}", key, value))
}

/// A plain insertion-ordered map that reports every write to a hook.
///
/// By default writes are logged at debug level; [`WatchedMap::with_hook`]
/// swaps in any other observer.
///
/// # Examples
///
/// ```
/// use sovran_collections::WatchedMap;
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
///
/// let mut map = WatchedMap::with_hook(Box::new(move |k: &&str, v: &i32| {
///     sink.borrow_mut().push(format!("{}={}", k, v));
/// }));
/// map.set("x", 42);
///
/// assert_eq!(*seen.borrow(), vec!["x=42".to_string()]);
/// ```
pub struct WatchedMap<K, V> {
    items: IndexMap<K, V>,
    hook: SetHook<K, V>,
}

impl<K, V> WatchedMap<K, V>
where
    K: Eq + Hash + Debug + 'static,
    V: Debug + 'static,
{
    /// Creates an empty map that logs each write.
    pub fn new() -> Self {
        Self::with_hook(log_writes())
    }
}

impl<K, V> WatchedMap<K, V>
where
    K: Eq + Hash + Debug,
{
    /// Creates an empty map reporting writes to `hook`.
    pub fn with_hook(hook: SetHook<K, V>) -> Self {
        Self {
            items: IndexMap::new(),
            hook,
        }
    }

    /// Notifies the hook, then stores the value. Returns the previous value.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        (self.hook)(&key, &value);
        self.items.insert(key, value)
    }

    /// Retrieves a reference to a value.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::KeyNotFound` if the key doesn't exist.
    pub fn get(&self, key: &K) -> Result<&V, CollectionError> {
        self.items
            .get(key)
            .ok_or_else(|| CollectionError::KeyNotFound(format!("{:?}", key)))
    }

    /// Removes a key, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.items.shift_remove(key)
    }

    /// Returns true if the map contains the specified key.
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

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, K, V> {
        self.items.iter()
    }
}

impl<K, V> Default for WatchedMap<K, V>
where
    K: Eq + Hash + Debug + 'static,
    V: Debug + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
