use indexmap::IndexMap;
use std::hash::Hash;

/// A multiset counting how often each element occurs.
///
/// Entries keep the order in which each element was first seen, and that order
/// breaks ties in [`Counter::most_common`].
///
/// # Examples
///
/// ```
/// use sovran_collections::Counter;
///
/// let letters = Counter::from_iter("abracadabra".chars());
/// assert_eq!(letters.most_common(2), vec![(&'a', 5), (&'b', 2)]);
/// assert_eq!(letters.count_of(&'z'), 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Counter<T>
where
    T: Eq + Hash,
{
    counts: IndexMap<T, usize>,
}

impl<T> Counter<T>
where
    T: Eq + Hash,
{
    /// Creates an empty counter.
    pub fn new() -> Self {
        Self {
            counts: IndexMap::new(),
        }
    }

    /// Counts every element yielded by `items`.
    pub fn update<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.add(item, 1);
        }
    }

    /// Adds `n` occurrences of `item`. Counts saturate at `usize::MAX`.
    pub fn add(&mut self, item: T, n: usize) {
        let count = self.counts.entry(item).or_insert(0);
        *count = count.saturating_add(n);
    }

    /// Occurrences of `item`, zero if it was never seen. Never inserts.
    pub fn count_of(&self, item: &T) -> usize {
        self.counts.get(item).copied().unwrap_or(0)
    }

    /// Up to `k` elements ordered by count, highest first.
    ///
    /// Elements with equal counts appear in first-occurrence order.
    pub fn most_common(&self, k: usize) -> Vec<(&T, usize)> {
        let mut ranked: Vec<(&T, usize)> = self.counts.iter().map(|(item, &n)| (item, n)).collect();
        // sort_by is stable, so ties keep insertion order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(k);
        ranked
    }

    /// Elements seen more than `min` times, in first-occurrence order.
    pub fn elements_above(&self, min: usize) -> Vec<&T> {
        self.counts
            .iter()
            .filter(|&(_, &n)| n > min)
            .map(|(item, _)| item)
            .collect()
    }

    /// `(element, count)` pairs in first-occurrence order.
    pub fn entries(&self) -> impl Iterator<Item = (&T, usize)> + '_ {
        self.counts.iter().map(|(item, &n)| (item, n))
    }

    /// Sum of all counts, saturating at `usize::MAX`.
    pub fn total(&self) -> usize {
        self.counts.values().fold(0, |sum, &n| sum.saturating_add(n))
    }

    /// Number of distinct elements.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if nothing has been counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl<T> Default for Counter<T>
where
    T: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for Counter<T>
where
    T: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut counter = Self::new();
        counter.update(iter);
        counter
    }
}

impl<T> Extend<T> for Counter<T>
where
    T: Eq + Hash,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.update(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abracadabra() {
        let c: Counter<char> = "abracadabra".chars().collect();
        assert_eq!(c.count_of(&'a'), 5);
        assert_eq!(c.count_of(&'b'), 2);
        assert_eq!(c.count_of(&'r'), 2);
        assert_eq!(c.count_of(&'c'), 1);
        assert_eq!(c.count_of(&'d'), 1);
        assert_eq!(c.total(), 11);
        assert_eq!(c.len(), 5);

        assert_eq!(c.most_common(2), vec![(&'a', 5), (&'b', 2)]);
        assert_eq!(c.elements_above(1), vec![&'a', &'b', &'r']);
    }

    #[test]
    fn test_ties_follow_first_occurrence() {
        let c: Counter<&str> = vec!["z", "y", "x", "y", "z", "x"].into_iter().collect();
        assert_eq!(c.most_common(3), vec![(&"z", 2), (&"y", 2), (&"x", 2)]);
    }

    #[test]
    fn test_most_common_clamps() {
        let c: Counter<u8> = vec![1, 1, 2].into_iter().collect();
        assert_eq!(c.most_common(10).len(), 2);
        assert!(c.most_common(0).is_empty());
    }

    #[test]
    fn test_missing_is_zero_without_insert() {
        let c: Counter<char> = "aa".chars().collect();
        assert_eq!(c.count_of(&'q'), 0);
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_update_and_entries() {
        let mut c = Counter::new();
        c.update("ab".chars());
        c.update("ba".chars());
        c.add('c', 3);

        let entries: Vec<_> = c.entries().collect();
        assert_eq!(entries, vec![(&'a', 2), (&'b', 2), (&'c', 3)]);
        assert_eq!(c.most_common(1), vec![(&'c', 3)]);
    }

    #[test]
    fn test_add_saturates() {
        let mut c = Counter::new();
        c.add("big", usize::MAX);
        c.add("big", 1);
        c.add("small", 2);
        assert_eq!(c.count_of(&"big"), usize::MAX);
        assert_eq!(c.total(), usize::MAX);
        assert_eq!(c.most_common(1), vec![(&"big", usize::MAX)]);
    }
}
