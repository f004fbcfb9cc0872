// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt;

use tracing::debug;
use tracing::trace;

use crate::counter::iter::Iter;
use crate::counter::key::NUM_PARTITIONS;
use crate::counter::key::decompose;
use crate::counter::key::entry_count;
use crate::counter::key::entry_id;
use crate::counter::key::pack_entry;
use crate::hash::KeyHasher;
use crate::hash::XxHash64;

/// Approximate per-key occurrence counter.
///
/// Keys are 64-bit hashes of the inputs produced by the hasher `H`. Each
/// distinct key costs one `u64`; a counter also carries a fixed table of
/// [`NUM_PARTITIONS`] empty lists from construction on.
///
/// The counter is not synchronized. Mutating methods take `&mut self`, so
/// sharing one between threads needs an external lock.
///
/// See the [module documentation](super) for more details.
#[derive(Clone)]
pub struct HashCounter<H = XxHash64> {
    /// Packed entries per partition, in insertion order.
    partitions: Box<[Vec<u64>]>,
    hasher: H,
}

impl HashCounter {
    /// Creates an empty counter using [`XxHash64`] with the default seed.
    pub fn new() -> Self {
        Self::with_hasher(XxHash64::default())
    }
}

impl<H: Default> Default for HashCounter<H> {
    fn default() -> Self {
        Self::with_hasher(H::default())
    }
}

impl<H> HashCounter<H> {
    /// Creates an empty counter deriving keys with `hasher`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hashcounter::counter::HashCounter;
    /// # use hashcounter::hash::Murmur3;
    /// let mut counter = HashCounter::with_hasher(Murmur3::with_seed(9001));
    /// counter.add(b"apple", 3);
    /// assert_eq!(counter.get(b"apple"), Some(3));
    /// ```
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            partitions: vec![Vec::new(); NUM_PARTITIONS].into_boxed_slice(),
            hasher,
        }
    }

    /// Returns the hasher used to derive keys.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Adds `value` to the count of a precomputed key.
    ///
    /// The count wraps around on overflow.
    pub fn add_key(&mut self, key: u64, value: u16) {
        let (partition, id) = decompose(key);
        upsert(&mut self.partitions[partition as usize], id, value);
    }

    /// Returns the count of a precomputed key, or `None` if it was never added.
    pub fn get_key(&self, key: u64) -> Option<u16> {
        let (partition, id) = decompose(key);
        self.partitions[partition as usize]
            .iter()
            .find(|&&entry| entry_id(entry) == id)
            .map(|&entry| entry_count(entry))
    }

    /// Calls `visitor` with every key and its count until it returns `false`.
    ///
    /// Partitions are visited in ascending order and entries within a partition
    /// in insertion order. The keys are hashes; they map back to the original
    /// inputs only if the hasher is reversible.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hashcounter::counter::HashCounter;
    /// let mut counter = HashCounter::new();
    /// counter.add(b"a", 1);
    /// counter.add(b"b", 2);
    ///
    /// let mut total = 0u32;
    /// counter.range(|_, count| {
    ///     total += count as u32;
    ///     true
    /// });
    /// assert_eq!(total, 3);
    /// ```
    pub fn range<F>(&self, mut visitor: F)
    where
        F: FnMut(u64, u16) -> bool,
    {
        for (key, count) in self.iter() {
            if !visitor(key, count) {
                return;
            }
        }
    }

    /// Returns an iterator over `(key, count)` pairs in the same order as
    /// [`range`](Self::range).
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.partitions)
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }

    /// Returns true if no key has been added.
    pub fn is_empty(&self) -> bool {
        self.partitions.iter().all(Vec::is_empty)
    }

    /// Removes every key and releases the memory held by the partitions.
    pub fn reset(&mut self) {
        for partition in self.partitions.iter_mut() {
            *partition = Vec::new();
        }
        trace!("hash counter reset");
    }

    /// Adds every key and count of `other` to this counter.
    ///
    /// Counts of keys present in both add up with wraparound, exactly as if
    /// `other`'s additions had been replayed here. Both counters are assumed to
    /// derive keys with the same hash function; this is not checked.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hashcounter::counter::HashCounter;
    /// let mut left = HashCounter::new();
    /// let mut right = HashCounter::new();
    /// left.add(b"a", 1);
    /// right.add(b"a", 2);
    /// right.add(b"b", 5);
    ///
    /// left.merge(&right);
    /// assert_eq!(left.get(b"a"), Some(3));
    /// assert_eq!(left.get(b"b"), Some(5));
    /// ```
    pub fn merge<O>(&mut self, other: &HashCounter<O>) {
        let mut merged = 0usize;
        for (partition, donor) in self.partitions.iter_mut().zip(other.partitions.iter()) {
            if donor.is_empty() {
                continue;
            }
            merged += donor.len();

            if partition.is_empty() {
                partition.extend_from_slice(donor);
                continue;
            }

            for &entry in donor {
                upsert(partition, entry_id(entry), entry_count(entry));
            }
        }
        debug!(merged, "merged hash counter");
    }

    pub(super) fn partitions(&self) -> &[Vec<u64>] {
        &self.partitions
    }

    pub(super) fn partitions_mut(&mut self) -> &mut [Vec<u64>] {
        &mut self.partitions
    }
}

impl<H: KeyHasher> HashCounter<H> {
    /// Returns the key this counter derives from `bytes`.
    pub fn key(&self, bytes: &[u8]) -> u64 {
        self.hasher.hash_key(bytes)
    }

    /// Adds `value` to the count of `bytes`.
    ///
    /// The count wraps around on overflow:
    ///
    /// ```
    /// # use hashcounter::counter::HashCounter;
    /// let mut counter = HashCounter::new();
    /// counter.add(b"x", u16::MAX);
    /// counter.add(b"x", u16::MAX);
    /// assert_eq!(counter.get(b"x"), Some(u16::MAX - 1));
    /// ```
    pub fn add(&mut self, bytes: &[u8], value: u16) {
        let key = self.key(bytes);
        self.add_key(key, value);
    }

    /// Returns the count of `bytes`, or `None` if it was never added.
    pub fn get(&self, bytes: &[u8]) -> Option<u16> {
        self.get_key(self.key(bytes))
    }
}

impl<'a, H> IntoIterator for &'a HashCounter<H> {
    type Item = (u64, u16);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<H: fmt::Debug> fmt::Debug for HashCounter<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashCounter")
            .field("len", &self.len())
            .field("hasher", &self.hasher)
            .finish()
    }
}

/// Adds `value` to the entry for `id`, appending a new entry if there is none.
fn upsert(partition: &mut Vec<u64>, id: u64, value: u16) {
    if let Some(entry) = partition.iter_mut().find(|entry| entry_id(**entry) == id) {
        *entry = pack_entry(id, entry_count(*entry).wrapping_add(value));
        return;
    }
    partition.push(pack_entry(id, value));
}
