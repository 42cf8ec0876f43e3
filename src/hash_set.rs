use alloc::collections::TryReserveError;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::hash_table::HashTable;
use crate::hasher::DefaultHashBuilder;

/// A hash set over dense, insertion-ordered storage.
///
/// `HashSet<T, S>` stores values of type `T` where `T` implements
/// `Hash + Eq` and uses a configurable hasher builder `S` to hash values.
/// Values occupy contiguous slots `0..len()`; removing one shifts every
/// later value down by a slot, so positional access
/// ([`get_index`](Self::get_index), [`index_of`](Self::index_of)) always
/// sees a dense, hole-free sequence.
///
/// # Examples
///
/// ```rust
/// use dense_hash::HashSet;
///
/// let mut set = HashSet::new();
/// set.insert("a");
/// set.insert("b");
/// set.insert("a");
///
/// assert_eq!(set.len(), 2);
/// assert!(set.contains(&"b"));
/// ```
#[derive(Clone)]
pub struct HashSet<T, S = DefaultHashBuilder> {
    table: HashTable<T>,
    hash_builder: S,
}

impl<T, S> PartialEq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }
}

impl<T, S> Eq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
}

impl<T, S> Debug for HashSet<T, S>
where
    T: Debug + Hash + Eq,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a new hash set with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::collections::hash_map::RandomState;
    ///
    /// use dense_hash::hash_set::HashSet;
    ///
    /// let set: HashSet<i32, _> = HashSet::with_hasher(RandomState::new());
    /// assert!(set.is_empty());
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates a new hash set with the specified capacity and hasher
    /// builder.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Returns the number of values in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no values.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of values the set holds before its next resize.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes all values, keeping the allocated capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Reserves capacity for at least `additional` more values.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Fallibly reserves storage for at least `additional` more values.
    ///
    /// # Errors
    ///
    /// Returns the allocator's [`TryReserveError`] on failure; the set is
    /// unchanged.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.table.try_reserve(additional)
    }

    /// Adds a value to the set.
    ///
    /// Returns `true` if the value was newly inserted, `false` if an
    /// equal value was already present (the set is left unchanged).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dense_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// assert!(set.insert(37));
    /// assert!(!set.insert(37));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let hash = self.hash_builder.hash_one(&value);
        match self.table.entry(hash, |v| v == &value) {
            crate::hash_table::Entry::Occupied(_) => false,
            crate::hash_table::Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    /// Returns `true` if the set contains `value`.
    pub fn contains(&self, value: &T) -> bool {
        let hash = self.hash_builder.hash_one(value);
        self.table.find_index(hash, |v| v == value).is_some()
    }

    /// Returns a reference to the stored value equal to `value`, if any.
    pub fn get(&self, value: &T) -> Option<&T> {
        let hash = self.hash_builder.hash_one(value);
        self.table.find(hash, |v| v == value)
    }

    /// Returns the storage slot of `value`, if present.
    ///
    /// Slots are dense: `0..len()`, shifted down by removals of
    /// earlier-slotted values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dense_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// set.insert("a");
    /// set.insert("b");
    /// assert_eq!(set.index_of(&"b"), Some(1));
    ///
    /// set.remove(&"a");
    /// assert_eq!(set.index_of(&"b"), Some(0));
    /// ```
    pub fn index_of(&self, value: &T) -> Option<usize> {
        let hash = self.hash_builder.hash_one(value);
        self.table.find_index(hash, |v| v == value)
    }

    /// Returns the value in storage slot `index`, if in range.
    pub fn get_index(&self, index: usize) -> Option<&T> {
        self.table.get(index)
    }

    /// Removes `value` from the set. Returns `true` if it was present.
    ///
    /// Removal compacts storage: every value in a later slot moves down
    /// by one.
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns the stored value equal to `value`, if any.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let hash = self.hash_builder.hash_one(value);
        self.table.remove(hash, |v| v == value)
    }

    /// The values in slot order, as a slice.
    pub fn as_slice(&self) -> &[T] {
        self.table.as_slice()
    }

    /// Returns an iterator over the values in slot order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Removes and yields all values, leaving the set empty.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain {
            inner: self.table.drain(),
        }
    }
}

impl<T> HashSet<T, DefaultHashBuilder>
where
    T: Hash + Eq,
{
    /// Creates a new hash set using the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dense_hash::HashSet;
    ///
    /// let set: HashSet<i32> = HashSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Creates a new hash set with the specified capacity using the
    /// default hasher builder.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<T, S> Default for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T, S> Extend<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, S> FromIterator<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::with_hasher(S::default());
        set.extend(iter);
        set
    }
}

impl<'a, T, S> IntoIterator for &'a HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the values of a `HashSet` in slot order.
pub struct Iter<'a, T> {
    inner: crate::hash_table::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A draining iterator over the values of a `HashSet`.
pub struct Drain<'a, T> {
    inner: crate::hash_table::Drain<'a, T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use core::hash::BuildHasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap_or(0),
                k2: rng.try_next_u64().unwrap_or(0),
            }
        }
    }

    #[test]
    fn test_new_and_with_hasher() {
        let set: HashSet<i32> = HashSet::new();
        assert!(set.is_empty());

        let set2 = HashSet::<i32, _>::with_hasher(SipHashBuilder::default());
        assert!(set2.is_empty());
        assert_eq!(set2.len(), 0);
    }

    #[test]
    fn test_with_capacity() {
        let set: HashSet<i32, _> =
            HashSet::with_capacity_and_hasher(100, SipHashBuilder::default());
        assert!(set.capacity() >= 100);
        assert!(set.is_empty());
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        assert!(set.insert("x".to_string()));
        assert!(!set.insert("x".to_string()));
        assert!(!set.insert("x".to_string()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_round_trip() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        set.insert(1);
        let before = set.len();

        set.insert(42);
        assert!(set.remove(&42));
        assert!(!set.contains(&42));
        assert_eq!(set.len(), before);
        assert!(!set.remove(&42));
    }

    #[test]
    fn test_dense_slots_shift_on_remove() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        set.insert(10u32);
        set.insert(20);
        set.insert(30);
        assert_eq!(set.index_of(&30), Some(2));

        set.remove(&20);
        assert_eq!(set.as_slice(), &[10, 30]);
        assert_eq!(set.index_of(&30), Some(1));
        assert_eq!(set.index_of(&20), None);
        assert_eq!(set.get_index(1), Some(&30));
        assert_eq!(set.get_index(2), None);
    }

    #[test]
    fn test_membership_across_resizes() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        for v in 0..1000u32 {
            set.insert(v);
        }
        assert_eq!(set.len(), 1000);
        for v in 0..1000u32 {
            assert!(set.contains(&v), "lost {v} across resizes");
        }
    }

    #[test]
    fn test_take_and_get() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        set.insert("alpha".to_string());

        assert_eq!(set.get(&"alpha".to_string()), Some(&"alpha".to_string()));
        assert_eq!(set.take(&"alpha".to_string()), Some("alpha".to_string()));
        assert_eq!(set.take(&"alpha".to_string()), None);
        assert!(set.is_empty());
    }

    #[test]
    fn test_clear_and_drain() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        set.insert(1);
        set.insert(2);

        let drained: Vec<i32> = set.drain().collect();
        assert_eq!(drained.len(), 2);
        assert!(set.is_empty());

        set.insert(3);
        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(&3));
    }

    #[test]
    fn test_iter_follows_insertion_order() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        set.insert("a");
        set.insert("b");
        set.insert("c");

        let values: Vec<&&str> = set.iter().collect();
        assert_eq!(values, [&"a", &"b", &"c"]);
    }

    #[test]
    fn test_eq_and_from_iter() {
        let a: HashSet<i32, SipHashBuilder> = [1, 2, 3].into_iter().collect();
        let b: HashSet<i32, SipHashBuilder> = [3, 2, 1, 1].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);

        let c: HashSet<i32, SipHashBuilder> = [1, 2].into_iter().collect();
        assert_ne!(a, c);
    }

    #[test]
    fn test_reserve_paths() {
        let mut set: HashSet<String, SipHashBuilder> = HashSet::default();
        set.reserve(64);
        assert!(set.capacity() >= 64);
        assert!(set.try_reserve(8).is_ok());
    }
}
