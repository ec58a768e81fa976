use crate::error::CollectionError;
use std::collections::vec_deque::{self, VecDeque};

/// A double-ended queue with an optional length bound.
///
/// Pushes and pops at either end run in amortized O(1). A bounded deque
/// never grows past its capacity: pushing onto a full deque evicts the
/// element at the opposite end first and hands it back to the caller.
///
/// # Examples
///
/// ```
/// use sovran_collections::{Deque, CollectionError};
///
/// let mut recent = Deque::bounded(3)?;
/// for n in 1..=4 {
///     recent.push_back(n);
/// }
/// assert_eq!(recent.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
///
/// assert_eq!(recent.pop_front()?, 2);
/// assert_eq!(recent.pop_back()?, 4);
/// # Ok::<(), CollectionError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deque<T> {
    items: VecDeque<T>,
    capacity: Option<usize>,
}

impl<T> Deque<T> {
    /// Creates an empty, unbounded deque.
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
            capacity: None,
        }
    }

    /// Creates an empty deque holding at most `capacity` elements.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::InvalidCapacity` if `capacity` is zero.
    pub fn bounded(capacity: usize) -> Result<Self, CollectionError> {
        if capacity == 0 {
            return Err(CollectionError::InvalidCapacity);
        }
        Ok(Self {
            items: VecDeque::with_capacity(capacity),
            capacity: Some(capacity),
        })
    }

    /// Creates a bounded deque seeded from `items`, pushed at the back in order.
    ///
    /// Only the last `capacity` items survive.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::InvalidCapacity` if `capacity` is zero.
    pub fn bounded_from<I>(capacity: usize, items: I) -> Result<Self, CollectionError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut deque = Self::bounded(capacity)?;
        deque.extend_back(items);
        Ok(deque)
    }

    /// The length bound, if any.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Appends an element at the back.
    ///
    /// Returns the front element if it had to be evicted to make room.
    pub fn push_back(&mut self, item: T) -> Option<T> {
        let evicted = if self.is_full() {
            self.items.pop_front()
        } else {
            None
        };
        if evicted.is_some() {
            log::trace!("deque at capacity {:?}, evicted front", self.capacity);
        }
        self.items.push_back(item);
        evicted
    }

    /// Prepends an element at the front.
    ///
    /// Returns the back element if it had to be evicted to make room.
    pub fn push_front(&mut self, item: T) -> Option<T> {
        let evicted = if self.is_full() {
            self.items.pop_back()
        } else {
            None
        };
        if evicted.is_some() {
            log::trace!("deque at capacity {:?}, evicted back", self.capacity);
        }
        self.items.push_front(item);
        evicted
    }

    /// Removes and returns the front element.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::EmptyQueue` if the deque is empty.
    pub fn pop_front(&mut self) -> Result<T, CollectionError> {
        self.items.pop_front().ok_or(CollectionError::EmptyQueue)
    }

    /// Removes and returns the back element.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::EmptyQueue` if the deque is empty.
    pub fn pop_back(&mut self) -> Result<T, CollectionError> {
        self.items.pop_back().ok_or(CollectionError::EmptyQueue)
    }

    /// The front element, without removing it.
    pub fn peek_front(&self) -> Option<&T> {
        self.items.front()
    }

    /// The back element, without removing it.
    pub fn peek_back(&self) -> Option<&T> {
        self.items.back()
    }

    /// Element at position `index` counted from the front.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the deque holds no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Removes every element. The capacity bound is kept.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Pushes every item at the back, in order.
    pub fn extend_back<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.push_back(item);
        }
    }

    /// Pushes every item at the front, in order, so the last item ends up first.
    pub fn extend_front<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.push_front(item);
        }
    }

    /// Rotates the deque `steps` places to the right; negative values rotate left.
    pub fn rotate(&mut self, steps: isize) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        let shift = steps.unsigned_abs() % len;
        if steps >= 0 {
            self.items.rotate_right(shift);
        } else {
            self.items.rotate_left(shift);
        }
    }

    /// Iterates front to back.
    pub fn iter(&self) -> vec_deque::Iter<'_, T> {
        self.items.iter()
    }

    fn is_full(&self) -> bool {
        self.capacity.is_some_and(|cap| self.items.len() >= cap)
    }
}

impl<T> Default for Deque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for Deque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
            capacity: None,
        }
    }
}

impl<T> Extend<T> for Deque<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.extend_back(iter);
    }
}

impl<T> IntoIterator for Deque<T> {
    type Item = T;
    type IntoIter = vec_deque::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Deque<T> {
    type Item = &'a T;
    type IntoIter = vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents<T: Clone>(deque: &Deque<T>) -> Vec<T> {
        deque.iter().cloned().collect()
    }

    #[test]
    fn test_both_ends() -> Result<(), CollectionError> {
        let mut d: Deque<i32> = vec![1, 2, 3].into_iter().collect();
        d.push_back(4);
        d.push_front(0);
        assert_eq!(contents(&d), vec![0, 1, 2, 3, 4]);

        assert_eq!(d.pop_back()?, 4);
        assert_eq!(d.pop_front()?, 0);
        assert_eq!(contents(&d), vec![1, 2, 3]);
        assert_eq!(d.peek_front(), Some(&1));
        assert_eq!(d.peek_back(), Some(&3));
        Ok(())
    }

    #[test]
    fn test_empty_pops() {
        let mut d = Deque::<u8>::new();
        assert_eq!(d.pop_front(), Err(CollectionError::EmptyQueue));
        assert_eq!(d.pop_back(), Err(CollectionError::EmptyQueue));
        assert_eq!(d.peek_front(), None);
        assert!(d.is_empty());
    }

    #[test]
    fn test_bounded_eviction() -> Result<(), CollectionError> {
        let mut d = Deque::bounded(3)?;
        assert_eq!(d.push_back(1), None);
        assert_eq!(d.push_back(2), None);
        assert_eq!(d.push_back(3), None);
        assert_eq!(d.push_back(4), Some(1));
        assert_eq!(contents(&d), vec![2, 3, 4]);

        assert_eq!(d.push_front(9), Some(4));
        assert_eq!(contents(&d), vec![9, 2, 3]);
        assert_eq!(d.len(), 3);
        Ok(())
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(
            Deque::<i32>::bounded(0).err(),
            Some(CollectionError::InvalidCapacity)
        );
    }

    #[test]
    fn test_bounded_from_keeps_tail() -> Result<(), CollectionError> {
        let d = Deque::bounded_from(2, 1..=5)?;
        assert_eq!(contents(&d), vec![4, 5]);
        assert_eq!(d.capacity(), Some(2));
        Ok(())
    }

    #[test]
    fn test_extend_front_reverses() {
        let mut d: Deque<i32> = Deque::new();
        d.extend_front(vec![1, 2, 3]);
        assert_eq!(contents(&d), vec![3, 2, 1]);
    }

    #[test]
    fn test_rotate() {
        let mut d: Deque<i32> = (1..=5).collect();
        d.rotate(2);
        assert_eq!(contents(&d), vec![4, 5, 1, 2, 3]);
        d.rotate(-3);
        assert_eq!(contents(&d), vec![2, 3, 4, 5, 1]);
        d.rotate(10);
        assert_eq!(contents(&d), vec![2, 3, 4, 5, 1]);

        let mut empty = Deque::<i32>::new();
        empty.rotate(3);
        assert!(empty.is_empty());
    }
}
