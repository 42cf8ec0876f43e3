//! Hasher strategies for the dense containers.
//!
//! Every facade in this crate is generic over a [`BuildHasher`] so custom
//! hash logic is supplied as a compile-time strategy rather than a
//! function pointer. Two simple deterministic hashers are provided:
//! [`Djb2Hasher`] for byte-stream keys and [`IntMixHasher`] for
//! fixed-width integer keys. The crate-wide default,
//! [`DefaultHashBuilder`], is `foldhash`'s randomized fast hasher when
//! the `foldhash` feature is enabled (the default), falling back to
//! djb2 otherwise.

use core::hash::Hasher;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The default hasher builder used by [`HashMap`](crate::HashMap),
        /// [`HashSet`](crate::HashSet), and
        /// [`IndexedTable`](crate::IndexedTable).
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else {
        /// The default hasher builder used by [`HashMap`](crate::HashMap),
        /// [`HashSet`](crate::HashSet), and
        /// [`IndexedTable`](crate::IndexedTable).
        ///
        /// Without the `foldhash` feature this is deterministic djb2,
        /// which offers no protection against crafted collisions.
        pub type DefaultHashBuilder = core::hash::BuildHasherDefault<Djb2Hasher>;
    }
}

/// The classic djb2 string hash: `h = h * 33 + byte`, seeded with 5381.
///
/// Deterministic and unkeyed. Fine for trusted byte-stream keys; prefer
/// [`DefaultHashBuilder`] when the key set may be adversarial.
///
/// # Examples
///
/// ```rust
/// use core::hash::{BuildHasher, BuildHasherDefault};
///
/// use dense_hash::hasher::Djb2Hasher;
///
/// let builder = BuildHasherDefault::<Djb2Hasher>::default();
/// assert_eq!(builder.hash_one("abc"), builder.hash_one("abc"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Djb2Hasher {
    state: u64,
}

impl Hasher for Djb2Hasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        let mut hash = if self.state == 0 { 5381 } else { self.state };
        for &byte in bytes {
            hash = hash.wrapping_shl(5).wrapping_add(hash).wrapping_add(u64::from(byte));
        }
        self.state = hash;
    }
}

/// A two-round xorshift-multiply mixer for fixed-width integer keys.
///
/// Integer writes are folded into the state and finalized with
/// `x = ((x >> 16) ^ x) * 0x45d9f3b` applied twice, then a final
/// xor-fold. Deterministic and unkeyed, like [`Djb2Hasher`].
///
/// # Examples
///
/// ```rust
/// use core::hash::{BuildHasher, BuildHasherDefault};
///
/// use dense_hash::hasher::IntMixHasher;
///
/// let builder = BuildHasherDefault::<IntMixHasher>::default();
/// assert_ne!(builder.hash_one(1u64), builder.hash_one(2u64));
/// ```
#[derive(Clone, Debug, Default)]
pub struct IntMixHasher {
    state: u64,
}

impl IntMixHasher {
    fn mix(mut x: u64) -> u64 {
        x = ((x >> 16) ^ x).wrapping_mul(0x45d9f3b);
        x = ((x >> 16) ^ x).wrapping_mul(0x45d9f3b);
        (x >> 16) ^ x
    }
}

impl Hasher for IntMixHasher {
    fn finish(&self) -> u64 {
        Self::mix(self.state)
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state = self.state.rotate_left(8) ^ u64::from(byte);
        }
    }

    fn write_u8(&mut self, i: u8) {
        self.state = self.state.rotate_left(8) ^ u64::from(i);
    }

    fn write_u16(&mut self, i: u16) {
        self.state = self.state.rotate_left(16) ^ u64::from(i);
    }

    fn write_u32(&mut self, i: u32) {
        self.state = self.state.rotate_left(32) ^ u64::from(i);
    }

    fn write_u64(&mut self, i: u64) {
        self.state ^= i;
    }

    fn write_usize(&mut self, i: usize) {
        self.state ^= i as u64;
    }
}
