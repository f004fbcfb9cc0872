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

//! Hash functions turning byte strings into 64-bit counter keys.
//!
//! Any [`KeyHasher`] can drive a [`HashCounter`](crate::counter::HashCounter).
//! Plain functions and closures of type `Fn(&[u8]) -> u64` implement the trait,
//! which makes it easy to plug in a reversible mapping when the inputs already
//! fit in 64 bits:
//!
//! ```
//! use hashcounter::counter::HashCounter;
//!
//! let mut counter = HashCounter::with_hasher(|bytes: &[u8]| {
//!     let mut word = [0u8; 8];
//!     word[8 - bytes.len()..].copy_from_slice(bytes);
//!     u64::from_be_bytes(word)
//! });
//! counter.add(&42u64.to_be_bytes(), 1);
//! counter.range(|key, count| {
//!     assert_eq!((key, count), (42, 1));
//!     true
//! });
//! ```

mod xxhash;

/// The seed used by [`XxHash64::default`].
pub const DEFAULT_SEED: u64 = 0;

/// Maps a byte string to a 64-bit key.
///
/// Implementations must be deterministic and should spread their output over
/// the full 64-bit range: the top 16 bits pick a partition and the remaining
/// 48 bits identify the key inside it, so poor mixing in either part raises
/// the collision rate.
pub trait KeyHasher {
    /// Returns the key for `bytes`.
    fn hash_key(&self, bytes: &[u8]) -> u64;
}

impl<F> KeyHasher for F
where
    F: Fn(&[u8]) -> u64,
{
    fn hash_key(&self, bytes: &[u8]) -> u64 {
        self(bytes)
    }
}

/// XXH64, a fast non-cryptographic hash with excellent avalanche properties.
///
/// This is the default hasher. With the default seed of zero its keys match
/// every other XXH64 implementation, so serialized counters can be queried
/// with keys computed elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XxHash64 {
    seed: u64,
}

impl XxHash64 {
    /// Creates an XXH64 hasher with a custom seed.
    pub const fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    /// Returns the seed.
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for XxHash64 {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl KeyHasher for XxHash64 {
    fn hash_key(&self, bytes: &[u8]) -> u64 {
        xxhash::xxhash64(bytes, self.seed)
    }
}

/// The low 64 bits of MurmurHash3 x64/128.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Murmur3 {
    seed: u32,
}

impl Murmur3 {
    /// Creates a MurmurHash3 hasher with a custom seed.
    pub const fn with_seed(seed: u32) -> Self {
        Self { seed }
    }

    /// Returns the seed.
    pub const fn seed(&self) -> u32 {
        self.seed
    }
}

impl KeyHasher for Murmur3 {
    fn hash_key(&self, bytes: &[u8]) -> u64 {
        let (h1, _) = mur3::murmurhash3_x64_128(bytes, self.seed);
        h1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_xxhash64_seed_zero() {
        assert_eq!(XxHash64::default().hash_key(b""), 0xEF46DB3751D8E999);
        assert_eq!(XxHash64::default().hash_key(b"abc"), 0x44BC2CF5AD770999);
        assert_ne!(
            XxHash64::with_seed(1).hash_key(b"abc"),
            XxHash64::default().hash_key(b"abc")
        );
    }

    #[test]
    fn test_murmur3_low_word() {
        let key = b"The quick brown fox jumps over the lazy dog";
        assert_eq!(Murmur3::default().hash_key(key), 0xe34bbc7bbc071b6c);

        let key = b"The quick brown fox jumps over the lazy eog";
        assert_eq!(Murmur3::with_seed(0).hash_key(key), 0x362108102c62d1c9);
    }

    #[test]
    fn test_closure_hasher() {
        let hasher = |bytes: &[u8]| bytes.len() as u64;
        assert_eq!(hasher.hash_key(b"four"), 4);

        fn constant(_: &[u8]) -> u64 {
            7
        }
        assert_eq!(constant.hash_key(b"anything"), 7);
    }
}
