use alloc::vec::Vec;

/// A single hash-modulus class: the storage-slot indices whose element
/// hashes reduce to the same bucket position.
///
/// An empty bucket holds no allocation (`Vec::new` does not allocate),
/// matching the null-bucket representation of a freshly created class.
/// When the last slot is removed the backing allocation is released again.
#[derive(Clone, Debug, Default)]
pub(crate) struct Bucket {
    slots: Vec<usize>,
}

impl Bucket {
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn slots(&self) -> &[usize] {
        &self.slots
    }

    /// Appends a storage-slot index to this class.
    pub(crate) fn push(&mut self, slot: usize) {
        self.slots.push(slot);
    }

    /// Removes the entry at `position` (a position within this bucket, not
    /// a storage slot), shifting later entries down. Releases the backing
    /// allocation when the bucket empties.
    pub(crate) fn remove(&mut self, position: usize) {
        self.slots.remove(position);
        if self.slots.is_empty() {
            self.slots = Vec::new();
        }
    }

    /// Finds the position of `slot` within this bucket.
    pub(crate) fn position_of(&self, slot: usize) -> Option<usize> {
        self.slots.iter().position(|&s| s == slot)
    }

    /// Repairs slot references after storage compaction: every stored
    /// index greater than `removed` moves down by one. The removed slot
    /// itself must already have been taken out of its bucket.
    pub(crate) fn reindex(&mut self, removed: usize) {
        for slot in &mut self.slots {
            if *slot > removed {
                *slot -= 1;
            }
        }
    }
}

/// The fixed-size array of buckets indexed by `hash % modulus`.
///
/// A modulus of zero means the index is unallocated (the engine's "empty"
/// state); every probing operation on it reports not-found.
#[derive(Clone, Debug, Default)]
pub(crate) struct BucketArray {
    buckets: Vec<Bucket>,
}

impl BucketArray {
    pub(crate) fn with_modulus(modulus: usize) -> Self {
        let mut buckets = Vec::new();
        buckets.resize_with(modulus, Bucket::default);
        Self { buckets }
    }

    pub(crate) fn modulus(&self) -> usize {
        self.buckets.len()
    }

    /// The bucket position for a hash. Callers must ensure the modulus is
    /// nonzero.
    pub(crate) fn bucket_index(&self, hash: u64) -> usize {
        debug_assert!(!self.buckets.is_empty());
        (hash % self.buckets.len() as u64) as usize
    }

    pub(crate) fn bucket(&self, hash: u64) -> &Bucket {
        &self.buckets[self.bucket_index(hash)]
    }

    pub(crate) fn bucket_mut(&mut self, hash: u64) -> &mut Bucket {
        let index = self.bucket_index(hash);
        &mut self.buckets[index]
    }

    /// Records that the element in storage slot `slot` hashes to `hash`.
    pub(crate) fn push(&mut self, hash: u64, slot: usize) {
        self.bucket_mut(hash).push(slot);
    }

    /// Repairs every bucket after the storage compaction that removed
    /// `removed`.
    pub(crate) fn reindex(&mut self, removed: usize) {
        for bucket in &mut self.buckets {
            if !bucket.is_empty() {
                bucket.reindex(removed);
            }
        }
    }

    /// Empties every bucket while keeping the modulus.
    pub(crate) fn clear(&mut self) {
        for bucket in &mut self.buckets {
            *bucket = Bucket::default();
        }
    }

    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bucket_holds_no_allocation() {
        let bucket = Bucket::default();
        assert_eq!(bucket.len(), 0);
        assert!(bucket.is_empty());
        assert_eq!(bucket.slots().len(), 0);
    }

    #[test]
    fn test_push_and_remove_shift() {
        let mut bucket = Bucket::default();
        bucket.push(3);
        bucket.push(7);
        bucket.push(9);
        assert_eq!(bucket.slots(), &[3, 7, 9]);

        bucket.remove(1);
        assert_eq!(bucket.slots(), &[3, 9]);
        assert_eq!(bucket.position_of(9), Some(1));
        assert_eq!(bucket.position_of(7), None);
    }

    #[test]
    fn test_remove_last_releases_allocation() {
        let mut bucket = Bucket::default();
        bucket.push(0);
        bucket.remove(0);
        assert!(bucket.is_empty());
        assert_eq!(bucket.slots.capacity(), 0);
    }

    #[test]
    fn test_reindex_decrements_later_slots_only() {
        let mut bucket = Bucket::default();
        bucket.push(1);
        bucket.push(5);
        bucket.push(8);

        // Storage slot 4 was compacted out elsewhere; only later slots move.
        bucket.reindex(4);
        assert_eq!(bucket.slots(), &[1, 4, 7]);

        bucket.reindex(0);
        assert_eq!(bucket.slots(), &[0, 3, 6]);
    }

    #[test]
    fn test_bucket_array_selection_and_reindex() {
        let mut buckets = BucketArray::with_modulus(4);
        assert_eq!(buckets.modulus(), 4);

        buckets.push(5, 0); // bucket 1
        buckets.push(9, 1); // bucket 1
        buckets.push(6, 2); // bucket 2
        assert_eq!(buckets.bucket(5).slots(), &[0, 1]);
        assert_eq!(buckets.bucket(6).slots(), &[2]);

        // Storage slot 0 removed: slots 1 and 2 shift down.
        let position = buckets.bucket(5).position_of(0).unwrap();
        buckets.bucket_mut(5).remove(position);
        buckets.reindex(0);
        assert_eq!(buckets.bucket(5).slots(), &[0]);
        assert_eq!(buckets.bucket(6).slots(), &[1]);
    }

    #[test]
    fn test_clear_keeps_modulus() {
        let mut buckets = BucketArray::with_modulus(8);
        buckets.push(0, 0);
        buckets.push(8, 1);
        buckets.clear();
        assert_eq!(buckets.modulus(), 8);
        assert!(buckets.iter().all(Bucket::is_empty));
    }
}
