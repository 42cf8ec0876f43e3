use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::hash_table::HashTable;
use crate::hasher::DefaultHashBuilder;

/// An interning table: a deduplicated pool of physical values plus an
/// ordered list of logical entries referencing them.
///
/// Pushing a value always appends one logical entry, but appends a
/// physical slot only when the value has not been seen before; pushing
/// the same value repeatedly stores it once. Logical entries are plain
/// indices into the dense pool, so a redundant stream compresses to
/// (unique values, reference list) and decompresses back exactly.
///
/// Dedup lookups go through the same bucket-chained hash index as
/// [`HashMap`](crate::HashMap) and [`HashSet`](crate::HashSet), keyed by
/// the hasher builder `S`.
///
/// # Examples
///
/// ```rust
/// use dense_hash::IndexedTable;
///
/// let table: IndexedTable<u32> = IndexedTable::compress(&[5, 7, 5, 9, 7]);
/// assert_eq!(table.values(), &[5, 7, 9]);
/// assert_eq!(table.indices(), &[0, 1, 0, 2, 1]);
/// assert_eq!(table.decompress(), vec![5, 7, 5, 9, 7]);
/// ```
#[derive(Clone)]
pub struct IndexedTable<T, S = DefaultHashBuilder> {
    pool: HashTable<T>,
    indices: Vec<usize>,
    hash_builder: S,
}

impl<T, S> Debug for IndexedTable<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IndexedTable")
            .field("values", &self.pool.as_slice())
            .field("indices", &self.indices)
            .finish()
    }
}

impl<T, S> IndexedTable<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Creates an empty table with the given hasher builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            pool: HashTable::new(),
            indices: Vec::new(),
            hash_builder,
        }
    }

    /// Returns the number of logical entries.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if the table has no logical entries.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns the number of distinct physical values in the pool.
    pub fn values_len(&self) -> usize {
        self.pool.len()
    }

    /// The deduplicated value pool, in first-seen order.
    pub fn values(&self) -> &[T] {
        self.pool.as_slice()
    }

    /// The logical entries: for each pushed element in order, the pool
    /// slot holding its value.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Returns the pool value in physical slot `slot`, if in range.
    pub fn value_at(&self, slot: usize) -> Option<&T> {
        self.pool.get(slot)
    }

    /// Returns the pool slot referenced by logical entry `logical`, if in
    /// range.
    pub fn index_at(&self, logical: usize) -> Option<usize> {
        self.indices.get(logical).copied()
    }

    /// Returns the value referenced by logical entry `logical`, if in
    /// range.
    pub fn get(&self, logical: usize) -> Option<&T> {
        self.indices.get(logical).map(|&slot| &self.pool.as_slice()[slot])
    }

    /// Appends one logical entry for `value` and returns its logical
    /// position.
    ///
    /// The value lands in the physical pool only if no equal value is
    /// already there; otherwise the new entry references the existing
    /// slot.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dense_hash::IndexedTable;
    ///
    /// let mut table = IndexedTable::new();
    /// assert_eq!(table.push("x"), 0);
    /// assert_eq!(table.push("y"), 1);
    /// assert_eq!(table.push("x"), 2);
    /// assert_eq!(table.values_len(), 2);
    /// assert_eq!(table.indices(), &[0, 1, 0]);
    /// ```
    pub fn push(&mut self, value: T) -> usize {
        let hash = self.hash_builder.hash_one(&value);
        let slot = match self.pool.find_index(hash, |v| v == &value) {
            Some(slot) => slot,
            None => self.pool.push(hash, value),
        };
        self.indices.push(slot);
        self.indices.len() - 1
    }

    /// Removes the logical entry at `logical`.
    ///
    /// If that was the last reference to its pool value, the pool is
    /// compacted (later values shift down one slot, and every logical
    /// entry referencing them is decremented to match) and the orphaned
    /// value is returned. If other logical entries still reference the
    /// value, the pool is untouched and `None` is returned.
    ///
    /// # Panics
    ///
    /// Panics if `logical >= len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dense_hash::IndexedTable;
    ///
    /// let mut table: IndexedTable<u32> = IndexedTable::compress(&[5, 7, 5]);
    /// assert_eq!(table.remove(0), None); // 5 still referenced by entry 1
    /// assert_eq!(table.remove(1), Some(5)); // last reference to 5
    /// assert_eq!(table.values(), &[7]);
    /// assert_eq!(table.indices(), &[0]);
    /// ```
    pub fn remove(&mut self, logical: usize) -> Option<T> {
        let slot = self.indices.remove(logical);
        if self.indices.contains(&slot) {
            return None;
        }

        let value = self.pool.remove_index(slot);
        for index in &mut self.indices {
            if *index > slot {
                *index -= 1;
            }
        }
        Some(value)
    }
}

impl<T> IndexedTable<T, DefaultHashBuilder>
where
    T: Hash + Eq,
{
    /// Creates an empty table with the default hasher builder.
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Builds a table from a flat, possibly redundant stream: one
    /// [`push`](Self::push) per element, interning duplicates.
    pub fn compress(values: &[T]) -> Self
    where
        T: Clone,
    {
        let mut table = Self::new();
        for value in values {
            table.push(value.clone());
        }
        table
    }
}

impl<T, S> IndexedTable<T, S>
where
    T: Clone,
{
    /// Materializes the original redundant stream: each logical entry
    /// resolved to a clone of its pool value, in logical order.
    pub fn decompress(&self) -> Vec<T> {
        self.indices
            .iter()
            .map(|&slot| self.pool.as_slice()[slot].clone())
            .collect()
    }
}

impl<T, S> Default for IndexedTable<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T, S> Extend<T> for IndexedTable<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T, S> FromIterator<T> for IndexedTable<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut table = Self::with_hasher(S::default());
        table.extend(iter);
        table
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;

    #[test]
    fn test_dedup_scenario() {
        // compress([5, 7, 5, 9, 7]): pool in first-seen order, one logical
        // entry per input element.
        let table: IndexedTable<u32> = IndexedTable::compress(&[5, 7, 5, 9, 7]);
        assert_eq!(table.values(), &[5, 7, 9]);
        assert_eq!(table.indices(), &[0, 1, 0, 2, 1]);
        assert_eq!(table.len(), 5);
        assert_eq!(table.values_len(), 3);

        assert_eq!(table.decompress(), vec![5, 7, 5, 9, 7]);
    }

    #[test]
    fn test_push_returns_logical_positions() {
        let mut table: IndexedTable<&str> = IndexedTable::new();
        assert_eq!(table.push("a"), 0);
        assert_eq!(table.push("b"), 1);
        assert_eq!(table.push("a"), 2);
        assert_eq!(table.push("a"), 3);

        assert_eq!(table.values(), &["a", "b"]);
        assert_eq!(table.indices(), &[0, 1, 0, 0]);
    }

    #[test]
    fn test_remove_keeps_shared_value() {
        let mut table: IndexedTable<u32> = IndexedTable::compress(&[5, 7, 5]);

        assert_eq!(table.remove(0), None);
        assert_eq!(table.values(), &[5, 7]);
        assert_eq!(table.indices(), &[1, 0]);
        assert_eq!(table.decompress(), vec![7, 5]);
    }

    #[test]
    fn test_remove_last_reference_compacts_pool() {
        let mut table: IndexedTable<u32> = IndexedTable::compress(&[5, 7, 9, 7]);

        // 5 has a single reference: dropping it compacts the pool and
        // shifts every later slot reference down.
        assert_eq!(table.remove(0), Some(5));
        assert_eq!(table.values(), &[7, 9]);
        assert_eq!(table.indices(), &[0, 1, 0]);
        assert_eq!(table.decompress(), vec![7, 9, 7]);
    }

    #[test]
    fn test_remove_everything() {
        let mut table: IndexedTable<u32> = IndexedTable::compress(&[1, 2, 1]);
        assert_eq!(table.remove(2), None);
        assert_eq!(table.remove(1), Some(2));
        assert_eq!(table.remove(0), Some(1));
        assert!(table.is_empty());
        assert_eq!(table.values_len(), 0);
    }

    #[test]
    #[should_panic]
    fn test_remove_out_of_range_panics() {
        let mut table: IndexedTable<u32> = IndexedTable::new();
        table.remove(0);
    }

    #[test]
    fn test_accessors() {
        let table: IndexedTable<&str> = ["x", "y", "x"].into_iter().collect();

        assert_eq!(table.value_at(1), Some(&"y"));
        assert_eq!(table.value_at(2), None);
        assert_eq!(table.index_at(2), Some(0));
        assert_eq!(table.index_at(3), None);
        assert_eq!(table.get(2), Some(&"x"));
        assert_eq!(table.get(9), None);
    }

    #[test]
    fn test_interning_owned_strings() {
        let mut table: IndexedTable<alloc::string::String> = IndexedTable::new();
        for word in ["red", "green", "red", "blue", "green", "red"] {
            table.push(word.to_string());
        }
        assert_eq!(table.values_len(), 3);
        assert_eq!(table.len(), 6);
        assert_eq!(
            table.decompress(),
            vec!["red", "green", "red", "blue", "green", "red"]
        );
    }

    #[test]
    fn test_many_values_hash_assisted() {
        let mut table: IndexedTable<u32> = IndexedTable::new();
        for i in 0..1000u32 {
            table.push(i % 100);
        }
        assert_eq!(table.values_len(), 100);
        assert_eq!(table.len(), 1000);
        for i in 0..100usize {
            assert_eq!(table.value_at(i), Some(&(i as u32)));
        }
    }
}
