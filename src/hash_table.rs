//! The dense hash index engine.
//!
//! [`HashTable`] keeps its elements in a flat, insertion-ordered storage
//! array with no holes, and finds them through a bucket-chained hash
//! index: an array of `modulus` buckets, each listing the storage slots
//! whose hashes reduce to that bucket. Removal compacts storage by
//! shifting the tail down one slot and then repairs every bucket's slot
//! references, trading O(n) removal for dense, gap-free storage.
//!
//! The table itself never hashes anything: callers pass precomputed
//! 64-bit hashes and equality closures, and the facades
//! ([`HashMap`](crate::HashMap), [`HashSet`](crate::HashSet),
//! [`IndexedTable`](crate::IndexedTable)) own the
//! [`BuildHasher`](core::hash::BuildHasher) strategy.

use alloc::collections::TryReserveError;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::bucket::BucketArray;

/// Bucket count installed when an empty table receives its first element
/// or an explicit zero-modulus resize.
const DEFAULT_MODULUS: usize = 32;

const NO_SLOTS: &[usize] = &[];

/// A dense, bucket-chained hash table addressed by precomputed hashes.
///
/// Elements live at stable-until-removal slots `0..len()`; removing a
/// slot shifts every later element down by one, so storage is always
/// exactly `[0, len())` with no tombstones. The table resizes (doubling
/// the bucket modulus and rehashing from cached hashes) whenever
/// `len() == capacity()`.
///
/// # Examples
///
/// ```rust
/// use dense_hash::HashTable;
///
/// let hash = |v: &u32| u64::from(*v);
///
/// let mut table = HashTable::new();
/// table.push(hash(&10), 10u32);
/// table.push(hash(&20), 20u32);
/// table.push(hash(&30), 30u32);
///
/// assert_eq!(table.remove(hash(&20), |v| *v == 20), Some(20));
/// assert_eq!(table.as_slice(), &[10, 30]);
/// assert_eq!(table.find_index(hash(&30), |v| *v == 30), Some(1));
/// ```
#[derive(Clone, Default)]
pub struct HashTable<V> {
    buckets: BucketArray,
    entries: Vec<V>,
    hashes: Vec<u64>,
}

impl<V: Debug> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with no allocations and a modulus of zero.
    pub fn new() -> Self {
        Self {
            buckets: BucketArray::default(),
            entries: Vec::new(),
            hashes: Vec::new(),
        }
    }

    /// Creates a table that can hold `capacity` elements before its first
    /// resize, preallocating both the bucket array and the storage.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dense_hash::HashTable;
    ///
    /// let table: HashTable<u32> = HashTable::with_capacity(64);
    /// assert_eq!(table.capacity(), 64);
    /// assert!(table.is_empty());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        if capacity == 0 {
            return Self::new();
        }
        Self {
            buckets: BucketArray::with_modulus(capacity),
            entries: Vec::with_capacity(capacity),
            hashes: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of elements in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table contains no elements.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the current bucket modulus: the number of elements the
    /// table holds before the next doubling resize.
    pub fn capacity(&self) -> usize {
        self.buckets.modulus()
    }

    /// The dense storage, in insertion order (as compacted by removals).
    pub fn as_slice(&self) -> &[V] {
        &self.entries
    }

    /// Returns a reference to the element in storage slot `index`.
    pub fn get(&self, index: usize) -> Option<&V> {
        self.entries.get(index)
    }

    /// Returns a mutable reference to the element in storage slot `index`.
    ///
    /// Mutating an element in place must not change its hash, or the
    /// index becomes inconsistent; the facades only expose this for
    /// non-key data.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut V> {
        self.entries.get_mut(index)
    }

    /// Returns an iterator over the elements in slot order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Removes and yields every element, leaving the table empty but with
    /// its allocations intact.
    pub fn drain(&mut self) -> Drain<'_, V> {
        self.hashes.clear();
        self.buckets.clear();
        Drain {
            inner: self.entries.drain(..),
        }
    }

    /// Removes all elements, keeping the modulus and storage capacity.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hashes.clear();
        self.buckets.clear();
    }

    /// Ensures the table can hold at least `additional` more elements
    /// without resizing mid-push.
    pub fn reserve(&mut self, additional: usize) {
        let required = self.entries.len() + additional;
        if required > self.buckets.modulus() {
            let mut modulus = self.buckets.modulus().max(DEFAULT_MODULUS);
            while modulus < required {
                modulus *= 2;
            }
            self.resize(modulus);
        }
        self.entries.reserve(additional);
        self.hashes.reserve(additional);
    }

    /// Fallible storage reservation.
    ///
    /// Tries to reserve storage for `additional` more elements, reporting
    /// allocator failure instead of aborting. The bucket index itself is
    /// not grown here; it is rebuilt on the next resize.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`TryReserveError`] if the allocator cannot
    /// satisfy the request.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.entries.try_reserve(additional)?;
        self.hashes.try_reserve(additional)?;
        Ok(())
    }

    /// Discards the bucket array and rebuilds it at `new_modulus`
    /// (`new_modulus == 0` selects the default modulus), rehashing every
    /// stored element into its new bucket from the cached hashes.
    ///
    /// This is the stop-the-world rehash behind the `len == capacity`
    /// load-factor trigger; it is also usable directly to pre-size or
    /// shrink the index.
    pub fn resize(&mut self, new_modulus: usize) {
        let modulus = if new_modulus == 0 {
            DEFAULT_MODULUS
        } else {
            new_modulus
        };

        self.buckets = BucketArray::with_modulus(modulus);
        for (slot, &hash) in self.hashes.iter().enumerate() {
            self.buckets.push(hash, slot);
        }

        let len = self.entries.len();
        self.entries.reserve(modulus.saturating_sub(len));
        self.hashes.reserve(modulus.saturating_sub(len));
    }

    /// Finds the storage slot of the first element matching `hash` whose
    /// value satisfies `eq`.
    ///
    /// A candidate matches only if its cached hash equals `hash` *and*
    /// `eq` accepts it, so a hash collision can never produce a false
    /// positive.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dense_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.push(7, "seven");
    /// assert_eq!(table.find_index(7, |v| *v == "seven"), Some(0));
    /// assert_eq!(table.find_index(7, |v| *v == "eight"), None);
    /// ```
    pub fn find_index(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<usize> {
        if self.buckets.modulus() == 0 {
            return None;
        }
        for &slot in self.buckets.bucket(hash).slots() {
            if self.hashes[slot] == hash && eq(&self.entries[slot]) {
                return Some(slot);
            }
        }
        None
    }

    /// Returns a reference to the first element matching `hash` and `eq`.
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        self.find_index(hash, eq).map(|slot| &self.entries[slot])
    }

    /// Returns a mutable reference to the first element matching `hash`
    /// and `eq`.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        match self.find_index(hash, eq) {
            Some(slot) => Some(&mut self.entries[slot]),
            None => None,
        }
    }

    /// Returns an iterator over the storage slots of *every* element
    /// matching `hash` and `eq`, in bucket order.
    ///
    /// Duplicates are permitted by [`push`](Self::push), so more than one
    /// slot can match.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dense_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.push(3, 3u32);
    /// table.push(3, 3u32);
    /// let slots: Vec<usize> = table.find_indices(3, |v| *v == 3).collect();
    /// assert_eq!(slots, vec![0, 1]);
    /// ```
    pub fn find_indices<F>(&self, hash: u64, eq: F) -> FindIndices<'_, V, F>
    where
        F: Fn(&V) -> bool,
    {
        let slots = if self.buckets.modulus() == 0 {
            NO_SLOTS.iter()
        } else {
            self.buckets.bucket(hash).slots().iter()
        };
        FindIndices {
            table: self,
            slots,
            hash,
            eq,
        }
    }

    /// Appends `value` at the next storage slot and records it in bucket
    /// `hash % modulus`, resizing first if the table is at capacity.
    /// Returns the slot it was stored in.
    ///
    /// No duplicate check is performed; use [`entry`](Self::entry) for
    /// insert-if-absent semantics.
    pub fn push(&mut self, hash: u64, value: V) -> usize {
        if self.entries.len() == self.buckets.modulus() {
            self.resize(self.buckets.modulus() * 2);
        }

        let slot = self.entries.len();
        self.buckets.push(hash, slot);
        self.entries.push(value);
        self.hashes.push(hash);
        slot
    }

    /// Returns a view of the slot that `hash` and `eq` resolve to, for
    /// in-place inspection, insertion, or removal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dense_hash::hash_table::Entry;
    /// use dense_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// match table.entry(1, |v| *v == "one") {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert("one");
    ///     }
    ///     Entry::Occupied(_) => unreachable!(),
    /// }
    /// assert!(matches!(table.entry(1, |v| *v == "one"), Entry::Occupied(_)));
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        match self.find_index(hash, eq) {
            Some(index) => Entry::Occupied(OccupiedEntry { table: self, index }),
            None => Entry::Vacant(VacantEntry { table: self, hash }),
        }
    }

    /// Removes the first element matching `hash` and `eq`, compacting
    /// storage and reindexing every bucket. Returns the removed value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dense_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.push(4, 4u32);
    /// assert_eq!(table.remove(4, |v| *v == 4), Some(4));
    /// assert_eq!(table.remove(4, |v| *v == 4), None);
    /// assert!(table.is_empty());
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        let slot = self.find_index(hash, eq)?;
        Some(self.remove_slot(slot))
    }

    /// Removes the element in storage slot `index`, compacting storage
    /// and reindexing every bucket. Returns the removed value.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn remove_index(&mut self, index: usize) -> V {
        assert!(
            index < self.entries.len(),
            "slot index {index} out of range for table of length {}",
            self.entries.len()
        );
        self.remove_slot(index)
    }

    /// Shared removal path. `slot` must be in range.
    ///
    /// The order matters: the slot leaves its bucket first, storage and
    /// the hash cache compact second, and only then are the remaining
    /// bucket entries reindexed against the now-shifted slots.
    fn remove_slot(&mut self, slot: usize) -> V {
        let hash = self.hashes[slot];
        let bucket = self.buckets.bucket_mut(hash);
        let position = bucket
            .position_of(slot)
            .expect("occupied slot recorded in its bucket");
        bucket.remove(position);

        self.hashes.remove(slot);
        let value = self.entries.remove(slot);
        self.buckets.reindex(slot);
        value
    }

    /// Walks every bucket and asserts the index invariant: each occupied
    /// slot appears exactly once, in the bucket its cached hash selects.
    #[cfg(test)]
    pub(crate) fn assert_bucket_consistency(&self) {
        use alloc::vec;

        if self.buckets.modulus() == 0 {
            assert!(self.entries.is_empty());
            return;
        }

        let mut seen = vec![false; self.entries.len()];
        for (index, bucket) in self.buckets.iter().enumerate() {
            for &slot in bucket.slots() {
                assert!(
                    slot < self.entries.len(),
                    "bucket references slot {slot} past the end"
                );
                assert!(!seen[slot], "slot {slot} indexed twice");
                assert_eq!(
                    self.buckets.bucket_index(self.hashes[slot]),
                    index,
                    "slot {slot} filed in the wrong bucket"
                );
                seen[slot] = true;
            }
        }
        assert!(seen.iter().all(|&s| s), "some slots missing from the index");
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type IntoIter = Iter<'a, V>;
    type Item = &'a V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A view into a single slot of a [`HashTable`], occupied or vacant.
///
/// Constructed by [`HashTable::entry`]. The occupied arm reports the
/// existing storage slot; the vacant arm inserts at the next slot.
pub enum Entry<'a, V> {
    /// The probed element exists in the table.
    Occupied(OccupiedEntry<'a, V>),
    /// The probed element is absent.
    Vacant(VacantEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the element either way.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a lazily computed value if the entry is vacant and returns
    /// a mutable reference to the element either way.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }
}

/// A view into an occupied slot of a [`HashTable`].
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// The storage slot this entry occupies.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns a reference to the element.
    pub fn get(&self) -> &V {
        &self.table.entries[self.index]
    }

    /// Returns a mutable reference to the element.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.table.entries[self.index]
    }

    /// Converts the view into a mutable reference tied to the table.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.table.entries[self.index]
    }

    /// Removes the element, compacting storage, and returns it.
    pub fn remove(self) -> V {
        self.table.remove_slot(self.index)
    }
}

/// A view into a vacant slot of a [`HashTable`].
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
}

impl<'a, V> VacantEntry<'a, V> {
    /// The hash this entry was probed with; the inserted element is filed
    /// under it.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Inserts `value` at the next storage slot and returns a mutable
    /// reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        let slot = self.table.push(self.hash, value);
        &mut self.table.entries[slot]
    }
}

/// An iterator over the elements of a [`HashTable`] in slot order.
pub struct Iter<'a, V> {
    inner: core::slice::Iter<'a, V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

/// A draining iterator over the elements of a [`HashTable`].
pub struct Drain<'a, V> {
    inner: alloc::vec::Drain<'a, V>,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An iterator over every storage slot matching one probe, produced by
/// [`HashTable::find_indices`].
pub struct FindIndices<'a, V, F> {
    table: &'a HashTable<V>,
    slots: core::slice::Iter<'a, usize>,
    hash: u64,
    eq: F,
}

impl<V, F> Iterator for FindIndices<'_, V, F>
where
    F: Fn(&V) -> bool,
{
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        for &slot in self.slots.by_ref() {
            if self.table.hashes[slot] == self.hash && (self.eq)(&self.table.entries[slot]) {
                return Some(slot);
            }
        }
        None
    }
}
