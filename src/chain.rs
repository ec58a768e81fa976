use crate::error::CollectionError;
use crate::observer::SetHook;
use std::cell::{Ref, RefCell, RefMut};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

/// A caller-owned mapping that one or more chains can observe.
pub type Layer<K, V> = Rc<RefCell<HashMap<K, V>>>;

/// Wraps a map so it can be shared as a chain layer.
pub fn layer<K, V>(map: HashMap<K, V>) -> Layer<K, V> {
    Rc::new(RefCell::new(map))
}

/// A live, layered view over several maps.
///
/// Reads search the layers in order and return the first hit. Writes and
/// removals only ever touch the first layer, so deeper layers act as
/// read-only fallbacks. Layers are shared handles, not copies: changes the
/// owner makes to a layer are visible through the chain immediately.
///
/// A layer that is mutably borrowed by its owner while the chain reads it
/// yields `CollectionError::LayerBorrowed`.
///
/// # Examples
///
/// ```
/// use sovran_collections::{layer, ChainMap, CollectionError};
/// use std::collections::HashMap;
///
/// let overrides = layer(HashMap::from([("theme", "dark")]));
/// let defaults = layer(HashMap::from([("theme", "light"), ("language", "English")]));
///
/// let mut config = ChainMap::new(vec![overrides, defaults.clone()]);
/// assert_eq!(config.get(&"theme")?, "dark");
/// assert_eq!(config.get(&"language")?, "English");
///
/// config.set("theme", "blue")?;
/// assert_eq!(config.get(&"theme")?, "blue");
/// assert_eq!(defaults.borrow()["theme"], "light");
/// # Ok::<(), CollectionError>(())
/// ```
pub struct ChainMap<K, V> {
    layers: Vec<Layer<K, V>>,
    hook: Option<SetHook<K, V>>,
}

impl<K, V> ChainMap<K, V>
where
    K: Clone + Eq + Hash + Debug,
{
    /// Builds a chain over `layers`, highest priority first.
    ///
    /// An empty list gets a single fresh layer so writes always have a target.
    pub fn new(layers: Vec<Layer<K, V>>) -> Self {
        let mut layers = layers;
        if layers.is_empty() {
            layers.push(layer(HashMap::new()));
        }
        Self { layers, hook: None }
    }

    /// Builds a chain that owns fresh handles around the given maps.
    pub fn from_maps<I>(maps: I) -> Self
    where
        I: IntoIterator<Item = HashMap<K, V>>,
    {
        Self::new(maps.into_iter().map(layer).collect())
    }

    /// Installs a callback invoked on every [`ChainMap::set`].
    pub fn set_hook(&mut self, hook: SetHook<K, V>) {
        self.hook = Some(hook);
    }

    /// Returns a clone of the first value found for `key`.
    ///
    /// # Errors
    ///
    /// - Returns `CollectionError::KeyNotFound` if no layer holds the key
    /// - Returns `CollectionError::LayerBorrowed` if a searched layer is mutably borrowed
    pub fn get(&self, key: &K) -> Result<V, CollectionError>
    where
        V: Clone,
    {
        self.with(key, V::clone)
    }

    /// Runs `f` against the first value found for `key`.
    ///
    /// # Errors
    ///
    /// - Returns `CollectionError::KeyNotFound` if no layer holds the key
    /// - Returns `CollectionError::LayerBorrowed` if a searched layer is mutably borrowed
    pub fn with<F, R>(&self, key: &K, f: F) -> Result<R, CollectionError>
    where
        F: FnOnce(&V) -> R,
    {
        for layer in &self.layers {
            let map = borrow(layer)?;
            if let Some(value) = map.get(key) {
                return Ok(f(value));
            }
        }
        Err(CollectionError::KeyNotFound(format!("{:?}", key)))
    }

    /// Returns true if any layer holds the key.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::LayerBorrowed` if a searched layer is mutably borrowed.
    pub fn contains_key(&self, key: &K) -> Result<bool, CollectionError> {
        for layer in &self.layers {
            if borrow(layer)?.contains_key(key) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Writes to the first layer only. Returns the value it previously held there.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::LayerBorrowed` if the first layer is borrowed elsewhere.
    pub fn set(&mut self, key: K, value: V) -> Result<Option<V>, CollectionError> {
        // The hook may read the layers, so no borrow is held while it runs.
        drop(borrow_top(&self.layers[0])?);
        if let Some(hook) = self.hook.as_mut() {
            hook(&key, &value);
        }
        Ok(borrow_top(&self.layers[0])?.insert(key, value))
    }

    /// Removes `key` from the first layer.
    ///
    /// # Errors
    ///
    /// - Returns `CollectionError::KeyNotFound` if the first layer lacks the key,
    ///   even when a deeper layer holds it
    /// - Returns `CollectionError::LayerBorrowed` if the first layer is borrowed elsewhere
    pub fn remove(&mut self, key: &K) -> Result<V, CollectionError> {
        borrow_top(&self.layers[0])?
            .remove(key)
            .ok_or_else(|| CollectionError::KeyNotFound(format!("{:?}", key)))
    }

    /// Distinct keys across all layers, in first-seen order.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::LayerBorrowed` if a layer is mutably borrowed.
    pub fn keys(&self) -> Result<Vec<K>, CollectionError> {
        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        for layer in &self.layers {
            for key in borrow(layer)?.keys() {
                if seen.insert(key.clone()) {
                    keys.push(key.clone());
                }
            }
        }
        Ok(keys)
    }

    /// Number of distinct keys across all layers.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::LayerBorrowed` if a layer is mutably borrowed.
    pub fn len(&self) -> Result<usize, CollectionError> {
        Ok(self.keys()?.len())
    }

    /// Returns true if every layer is empty.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::LayerBorrowed` if a layer is mutably borrowed.
    pub fn is_empty(&self) -> Result<bool, CollectionError> {
        for layer in &self.layers {
            if !borrow(layer)?.is_empty() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Flattens the chain into a plain map holding each key's visible value.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::LayerBorrowed` if a layer is mutably borrowed.
    pub fn to_hash_map(&self) -> Result<HashMap<K, V>, CollectionError>
    where
        V: Clone,
    {
        let mut flat = HashMap::new();
        for layer in self.layers.iter().rev() {
            flat.extend(borrow(layer)?.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Ok(flat)
    }

    /// A new chain with `extra` in front of this chain's layers.
    ///
    /// Existing layers are shared, not copied. The write hook is not inherited.
    pub fn new_child(&self, extra: Layer<K, V>) -> Self {
        log::debug!("new child scope over {} layers", self.layers.len());
        let mut layers = Vec::with_capacity(self.layers.len() + 1);
        layers.push(extra);
        layers.extend(self.layers.iter().cloned());
        Self { layers, hook: None }
    }

    /// A new chain over every layer except the first.
    pub fn parents(&self) -> Self {
        Self::new(self.layers[1..].to_vec())
    }

    /// The layer handles, highest priority first.
    pub fn layers(&self) -> &[Layer<K, V>] {
        &self.layers
    }
}

fn borrow<K, V>(layer: &Layer<K, V>) -> Result<Ref<'_, HashMap<K, V>>, CollectionError> {
    layer.try_borrow().map_err(|_| CollectionError::LayerBorrowed)
}

fn borrow_top<K, V>(layer: &Layer<K, V>) -> Result<RefMut<'_, HashMap<K, V>>, CollectionError> {
    layer.try_borrow_mut().map_err(|_| CollectionError::LayerBorrowed)
}

impl<K, V> Debug for ChainMap<K, V>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut list = f.debug_list();
        for layer in &self.layers {
            match layer.try_borrow() {
                Ok(map) => list.entry(&*map),
                Err(_) => list.entry(&"<borrowed>"),
            };
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> (Layer<&'static str, &'static str>, Layer<&'static str, &'static str>) {
        (
            layer(HashMap::from([("theme", "dark")])),
            layer(HashMap::from([("theme", "light"), ("language", "English")])),
        )
    }

    #[test]
    fn test_first_layer_wins() -> Result<(), CollectionError> {
        let (user, defaults) = config();
        let chain = ChainMap::new(vec![user, defaults]);

        assert_eq!(chain.get(&"theme")?, "dark");
        assert_eq!(chain.get(&"language")?, "English");
        assert_eq!(
            chain.get(&"font"),
            Err(CollectionError::KeyNotFound("\"font\"".to_string()))
        );
        assert!(chain.contains_key(&"language")?);
        assert!(!chain.contains_key(&"font")?);
        Ok(())
    }

    #[test]
    fn test_writes_only_touch_first_layer() -> Result<(), CollectionError> {
        let (user, defaults) = config();
        let mut chain = ChainMap::new(vec![Rc::clone(&user), Rc::clone(&defaults)]);

        assert_eq!(chain.set("theme", "blue")?, Some("dark"));
        assert_eq!(chain.set("language", "French")?, None);
        assert_eq!(chain.get(&"theme")?, "blue");
        assert_eq!(chain.get(&"language")?, "French");

        assert_eq!(defaults.borrow()["theme"], "light");
        assert_eq!(defaults.borrow()["language"], "English");
        assert_eq!(user.borrow().len(), 2);
        Ok(())
    }

    #[test]
    fn test_remove_only_from_first_layer() -> Result<(), CollectionError> {
        let (user, defaults) = config();
        let mut chain = ChainMap::new(vec![user, defaults]);

        assert!(matches!(chain.remove(&"language"), Err(CollectionError::KeyNotFound(_))));
        assert_eq!(chain.remove(&"theme")?, "dark");
        assert_eq!(chain.get(&"theme")?, "light");
        Ok(())
    }

    #[test]
    fn test_observes_live_mutation() -> Result<(), CollectionError> {
        let (user, defaults) = config();
        let chain = ChainMap::new(vec![user, Rc::clone(&defaults)]);

        defaults.borrow_mut().insert("font", "mono");
        assert_eq!(chain.get(&"font")?, "mono");
        Ok(())
    }

    #[test]
    fn test_borrowed_layer_reports_error() {
        let (user, defaults) = config();
        let chain = ChainMap::new(vec![user, Rc::clone(&defaults)]);

        let _guard = defaults.borrow_mut();
        assert_eq!(chain.get(&"language"), Err(CollectionError::LayerBorrowed));
        assert_eq!(chain.get(&"theme"), Ok("dark"));
    }

    #[test]
    fn test_keys_are_distinct() -> Result<(), CollectionError> {
        let (user, defaults) = config();
        let chain = ChainMap::new(vec![user, defaults]);

        let mut keys = chain.keys()?;
        keys.sort();
        assert_eq!(keys, vec!["language", "theme"]);
        assert_eq!(chain.len()?, 2);
        assert_eq!(keys[0], "language");

        let flat = chain.to_hash_map()?;
        assert_eq!(flat["theme"], "dark");
        assert_eq!(flat.len(), 2);
        Ok(())
    }

    #[test]
    fn test_new_child_and_parents() -> Result<(), CollectionError> {
        let (user, defaults) = config();
        let chain = ChainMap::new(vec![user, defaults]);

        let mut child = chain.new_child(layer(HashMap::new()));
        assert_eq!(child.layers().len(), 3);
        assert_eq!(child.get(&"theme")?, "dark");

        child.set("theme", "solarized")?;
        assert_eq!(child.get(&"theme")?, "solarized");
        assert_eq!(chain.get(&"theme")?, "dark");

        let parents = child.parents();
        assert_eq!(parents.layers().len(), 2);
        assert_eq!(parents.get(&"theme")?, "dark");
        Ok(())
    }

    #[test]
    fn test_hook_can_read_the_chain_layers() -> Result<(), CollectionError> {
        let (user, defaults) = config();
        let mut chain = ChainMap::new(vec![Rc::clone(&user), defaults]);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let watched = Rc::clone(&user);
        chain.set_hook(Box::new(move |k: &&str, v: &&str| {
            let before = watched.borrow().get(k).copied();
            sink.borrow_mut().push((before, *v, watched.borrow().len()));
        }));

        assert_eq!(chain.set("theme", "blue")?, Some("dark"));
        assert_eq!(chain.set("font", "mono")?, None);
        assert_eq!(
            *seen.borrow(),
            vec![(Some("dark"), "blue", 1), (None, "mono", 1)]
        );
        assert_eq!(chain.get(&"font")?, "mono");
        Ok(())
    }

    #[test]
    fn test_set_and_remove_report_borrowed_top_layer() {
        let (user, defaults) = config();
        let mut chain = ChainMap::new(vec![Rc::clone(&user), defaults]);

        let _guard = user.borrow();
        assert_eq!(chain.set("theme", "blue"), Err(CollectionError::LayerBorrowed));
        assert_eq!(chain.remove(&"theme"), Err(CollectionError::LayerBorrowed));
    }

    #[test]
    fn test_empty_chain_gets_a_layer() -> Result<(), CollectionError> {
        let mut chain: ChainMap<String, i32> = ChainMap::new(Vec::new());
        assert!(chain.is_empty()?);
        chain.set("x".to_string(), 1)?;
        assert_eq!(chain.layers().len(), 1);
        assert_eq!(chain.get(&"x".to_string())?, 1);

        let orphan = chain.parents();
        assert_eq!(orphan.layers().len(), 1);
        assert!(orphan.is_empty()?);
        Ok(())
    }
}
