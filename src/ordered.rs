use crate::error::CollectionError;
use crate::observer::SetHook;
use std::collections::HashMap;
use std::fmt;
use std::fmt::Debug;
use std::hash::Hash;

struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// An insertion-ordered map whose entries can be relocated to either end.
///
/// Entries live in a slot table threaded by a doubly-linked order list, so
/// lookups, inserts, removals and relocations are all O(1) on average.
///
/// # Examples
///
/// ```
/// use sovran_collections::{OrderedMap, CollectionError};
///
/// let mut od = OrderedMap::new();
/// od.insert("first", 1);
/// od.insert("second", 2);
/// od.insert("third", 3);
///
/// od.move_to_back(&"first")?;
/// od.move_to_front(&"third")?;
///
/// let keys: Vec<_> = od.keys().copied().collect();
/// assert_eq!(keys, vec!["third", "second", "first"]);
/// # Ok::<(), CollectionError>(())
/// ```
pub struct OrderedMap<K, V> {
    index: HashMap<K, usize>,
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    hook: Option<SetHook<K, V>>,
}

impl<K, V> OrderedMap<K, V>
where
    K: Clone + Eq + Hash + Debug,
{
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            hook: None,
        }
    }

    /// Installs a callback invoked on every [`OrderedMap::insert`].
    pub fn set_hook(&mut self, hook: SetHook<K, V>) {
        self.hook = Some(hook);
    }

    /// Stores a value.
    ///
    /// An existing key keeps its position and its previous value is returned;
    /// a new key is appended at the back.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(hook) = self.hook.as_mut() {
            hook(&key, &value);
        }

        if let Some(&slot) = self.index.get(&key) {
            return self.slots[slot]
                .as_mut()
                .map(|node| std::mem::replace(&mut node.value, value));
        }

        let node = Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.index.insert(key, slot);
        self.link_back(slot);
        None
    }

    /// Retrieves a reference to a value.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::KeyNotFound` if the key doesn't exist.
    pub fn get(&self, key: &K) -> Result<&V, CollectionError> {
        let slot = self.slot_of(key)?;
        self.slots[slot]
            .as_ref()
            .map(|node| &node.value)
            .ok_or_else(|| not_found(key))
    }

    /// Retrieves a mutable reference to a value without changing its position.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::KeyNotFound` if the key doesn't exist.
    pub fn get_mut(&mut self, key: &K) -> Result<&mut V, CollectionError> {
        let slot = self.slot_of(key)?;
        self.slots[slot]
            .as_mut()
            .map(|node| &mut node.value)
            .ok_or_else(|| not_found(key))
    }

    /// Removes a key and returns its value.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::KeyNotFound` if the key doesn't exist.
    pub fn remove(&mut self, key: &K) -> Result<V, CollectionError> {
        let slot = self.slot_of(key)?;
        self.take_slot(slot)
            .map(|(_, value)| value)
            .ok_or_else(|| not_found(key))
    }

    /// Moves an existing key to the front without touching its value.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::KeyNotFound` if the key doesn't exist; the
    /// order is left unchanged.
    pub fn move_to_front(&mut self, key: &K) -> Result<(), CollectionError> {
        self.move_to_end(key, false)
    }

    /// Moves an existing key to the back without touching its value.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::KeyNotFound` if the key doesn't exist; the
    /// order is left unchanged.
    pub fn move_to_back(&mut self, key: &K) -> Result<(), CollectionError> {
        self.move_to_end(key, true)
    }

    /// Moves an existing key to the back when `last` is true, else to the front.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::KeyNotFound` if the key doesn't exist.
    pub fn move_to_end(&mut self, key: &K, last: bool) -> Result<(), CollectionError> {
        let slot = self.slot_of(key)?;
        log::trace!("relocating {:?} to the {}", key, if last { "back" } else { "front" });
        self.unlink(slot);
        if last {
            self.link_back(slot);
        } else {
            self.link_front(slot);
        }
        Ok(())
    }

    /// Removes and returns the first entry.
    pub fn pop_front(&mut self) -> Option<(K, V)> {
        let slot = self.head?;
        self.take_slot(slot)
    }

    /// Removes and returns the last entry.
    pub fn pop_back(&mut self) -> Option<(K, V)> {
        let slot = self.tail?;
        self.take_slot(slot)
    }

    /// The first entry in order.
    pub fn front(&self) -> Option<(&K, &V)> {
        let node = self.slots[self.head?].as_ref()?;
        Some((&node.key, &node.value))
    }

    /// The last entry in order.
    pub fn back(&self) -> Option<(&K, &V)> {
        let node = self.slots[self.tail?].as_ref()?;
        Some((&node.key, &node.value))
    }

    /// Returns true if the map contains the specified key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
    }

    /// Iterates `(key, value)` pairs front to back.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: &self.slots,
            cursor: self.head,
            remaining: self.index.len(),
        }
    }

    /// Keys front to back.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Values front to back.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    fn slot_of(&self, key: &K) -> Result<usize, CollectionError> {
        self.index.get(key).copied().ok_or_else(|| not_found(key))
    }

    fn take_slot(&mut self, slot: usize) -> Option<(K, V)> {
        self.unlink(slot);
        let node = self.slots[slot].take()?;
        self.index.remove(&node.key);
        self.free.push(slot);
        Some((node.key, node.value))
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = match self.slots[slot].as_mut() {
            Some(node) => (node.prev.take(), node.next.take()),
            None => return,
        };
        match prev {
            Some(p) => {
                if let Some(node) = self.slots[p].as_mut() {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.slots[n].as_mut() {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    fn link_back(&mut self, slot: usize) {
        let old_tail = self.tail;
        if let Some(node) = self.slots[slot].as_mut() {
            node.prev = old_tail;
            node.next = None;
        }
        match old_tail.and_then(|t| self.slots[t].as_mut()) {
            Some(tail) => tail.next = Some(slot),
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
    }

    fn link_front(&mut self, slot: usize) {
        let old_head = self.head;
        if let Some(node) = self.slots[slot].as_mut() {
            node.prev = None;
            node.next = old_head;
        }
        match old_head.and_then(|h| self.slots[h].as_mut()) {
            Some(head) => head.prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
    }
}

fn not_found<K: Debug>(key: &K) -> CollectionError {
    CollectionError::KeyNotFound(format!("{:?}", key))
}

/// Front-to-back iterator over an [`OrderedMap`].
pub struct Iter<'a, K, V> {
    slots: &'a [Option<Node<K, V>>],
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.slots.get(self.cursor?)?.as_ref()?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V>
where
    K: Clone + Eq + Hash + Debug,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> Default for OrderedMap<K, V>
where
    K: Clone + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for OrderedMap<K, V>
where
    K: Clone + Eq + Hash + Debug,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<K, V> Debug for OrderedMap<K, V>
where
    K: Clone + Eq + Hash + Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(map: &OrderedMap<&'static str, i32>) -> Vec<&'static str> {
        map.keys().copied().collect()
    }

    fn sample() -> OrderedMap<&'static str, i32> {
        vec![("first", 1), ("second", 2), ("third", 3)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_insertion_order() -> Result<(), CollectionError> {
        let mut od = sample();
        assert_eq!(order(&od), vec!["first", "second", "third"]);

        assert_eq!(od.insert("first", 10), Some(1));
        assert_eq!(order(&od), vec!["first", "second", "third"]);
        assert_eq!(*od.get(&"first")?, 10);
        Ok(())
    }

    #[test]
    fn test_relocation() -> Result<(), CollectionError> {
        let mut od = sample();
        od.move_to_end(&"first", true)?;
        assert_eq!(order(&od), vec!["second", "third", "first"]);
        od.move_to_end(&"third", false)?;
        assert_eq!(order(&od), vec!["third", "second", "first"]);

        od.move_to_front(&"third")?;
        assert_eq!(order(&od), vec!["third", "second", "first"]);
        od.move_to_back(&"first")?;
        assert_eq!(order(&od), vec!["third", "second", "first"]);
        assert_eq!(*od.get(&"third")?, 3);
        Ok(())
    }

    #[test]
    fn test_relocate_missing_leaves_order() {
        let mut od = sample();
        assert_eq!(
            od.move_to_front(&"fourth"),
            Err(CollectionError::KeyNotFound("\"fourth\"".to_string()))
        );
        assert!(od.move_to_back(&"fourth").is_err());
        assert_eq!(order(&od), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_remove_and_reuse_slot() -> Result<(), CollectionError> {
        let mut od = sample();
        assert_eq!(od.remove(&"second")?, 2);
        assert!(od.remove(&"second").is_err());
        assert_eq!(order(&od), vec!["first", "third"]);

        od.insert("fourth", 4);
        assert_eq!(order(&od), vec!["first", "third", "fourth"]);
        assert_eq!(od.len(), 3);
        assert_eq!(od.slots.len(), 3);
        Ok(())
    }

    #[test]
    fn test_pop_ends() {
        let mut od = sample();
        assert_eq!(od.pop_front(), Some(("first", 1)));
        assert_eq!(od.pop_back(), Some(("third", 3)));
        assert_eq!(od.front(), Some((&"second", &2)));
        assert_eq!(od.back(), Some((&"second", &2)));
        assert_eq!(od.pop_back(), Some(("second", 2)));
        assert_eq!(od.pop_back(), None);
        assert!(od.is_empty());
        assert_eq!(od.front(), None);
    }

    #[test]
    fn test_single_entry_relocation() -> Result<(), CollectionError> {
        let mut od = OrderedMap::new();
        od.insert("only", 1);
        od.move_to_front(&"only")?;
        od.move_to_back(&"only")?;
        assert_eq!(order(&od), vec!["only"]);
        assert_eq!(od.front(), od.back());
        Ok(())
    }

    #[test]
    fn test_debug_and_clear() {
        let mut od = sample();
        *od.get_mut(&"second").unwrap() = 20;
        assert_eq!(format!("{:?}", od), r#"{"first": 1, "second": 20, "third": 3}"#);
        od.clear();
        assert!(od.is_empty());
        assert_eq!(od.iter().count(), 0);
    }
}
