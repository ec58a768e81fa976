//! # sovran-collections
//!
//! Specialized container types for everyday bookkeeping.
//!
//! `sovran-collections` fills the gaps between `Vec`, `HashMap` and friends with a
//! handful of small, precise containers. Each one is standalone; callers compose
//! them as they see fit.
//!
//! ## Key Features
//!
//! - **Named records**: [`RecordType`] builds immutable [`Record`]s with named fields
//! - **Bounded deques**: [`Deque`] gives O(1) pushes and pops at both ends, with optional eviction
//! - **Counting**: [`Counter`] tallies elements and ranks them with a stable tie-break
//! - **Default values**: [`DefaultMap`] creates missing entries on first access
//! - **Reordering**: [`OrderedMap`] keeps insertion order and relocates keys in O(1)
//! - **Layered lookup**: [`ChainMap`] searches live layers front to back and writes to the top
//! - **Write hooks**: every map with a `set` accepts a [`SetHook`] observer
//!
//! The containers are single-threaded and hold no locks. Wrap one in a `Mutex`
//! if it has to be shared between threads.
//!
//! ## Usage Examples
//!
//! ### Counting and Grouping
//!
//! ```rust
//! use sovran_collections::{group_pairs, Counter};
//!
//! let letters: Counter<char> = "abracadabra".chars().collect();
//! assert_eq!(letters.most_common(2), vec![(&'a', 5), (&'b', 2)]);
//!
//! let grouped = group_pairs(vec![('a', 1), ('b', 2), ('a', 3), ('b', 4), ('c', 5)]);
//! assert_eq!(grouped[&'a'], vec![1, 3]);
//! assert_eq!(grouped[&'c'], vec![5]);
//! ```
//!
//! ### Layered Settings
//!
//! ```rust
//! use sovran_collections::{layer, ChainMap, CollectionError};
//! use std::collections::HashMap;
//!
//! fn main() -> Result<(), CollectionError> {
//!     let defaults = layer(HashMap::from([("theme", "light"), ("language", "English")]));
//!     let overrides = layer(HashMap::from([("theme", "dark")]));
//!
//!     let mut settings = ChainMap::new(vec![overrides, defaults.clone()]);
//!     println!("Theme: {}", settings.get(&"theme")?);
//!
//!     // Writes land in the overrides, never in the defaults
//!     settings.set("theme", "blue")?;
//!     assert_eq!(defaults.borrow()["theme"], "light");
//!
//!     // A child scope shares every existing layer
//!     let scoped = settings.new_child(layer(HashMap::from([("language", "French")])));
//!     assert_eq!(scoped.get(&"language")?, "French");
//!     assert_eq!(settings.get(&"language")?, "English");
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Error Handling
//!
//! ```rust
//! use sovran_collections::{CollectionError, Deque, OrderedMap};
//!
//! let mut queue: Deque<i32> = Deque::new();
//! match queue.pop_front() {
//!     Ok(value) => println!("Got {}", value),
//!     Err(CollectionError::EmptyQueue) => println!("Nothing queued"),
//!     Err(e) => println!("Other error: {}", e),
//! }
//!
//! let mut order: OrderedMap<&str, i32> = OrderedMap::new();
//! match order.move_to_front(&"missing") {
//!     Ok(()) => println!("Moved"),
//!     Err(CollectionError::KeyNotFound(key)) => println!("Key ({}) doesn't exist", key),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```

mod chain;
pub mod config;
mod counter;
mod default_map;
mod deque;
mod error;
mod observer;
mod ordered;
mod record;

pub use chain::{layer, ChainMap, Layer};
pub use counter::Counter;
pub use default_map::{group_pairs, DefaultMap};
pub use deque::Deque;
pub use error::CollectionError;
pub use observer::{log_writes, SetHook, WatchedMap};
pub use ordered::{Iter as OrderedIter, OrderedMap};
pub use record::{Record, RecordType};
