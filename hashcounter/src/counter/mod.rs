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

//! A partitioned counter keyed by 64-bit hashes.
//!
//! Every byte string is hashed to a 64-bit key. The top 16 bits of the key
//! select one of 65536 partitions; the low 48 bits are the id stored inside
//! that partition together with a 16-bit count, packed into a single `u64`.
//! Lookups index the partition directly and scan its (short) entry list.
//!
//! Counts use wrapping 16-bit arithmetic: adding past 65535 continues from 0.
//! Distinct inputs whose keys collide are counted as one.
//!
//! # Usage
//!
//! ```rust
//! use hashcounter::counter::HashCounter;
//!
//! let mut counter = HashCounter::new();
//! counter.add(b"hello", 1);
//! counter.add(b"hello", 5);
//! counter.add(b"world", 1);
//!
//! assert_eq!(counter.get(b"hello"), Some(6));
//! assert_eq!(counter.get(b"nobody"), None);
//! assert_eq!(counter.len(), 2);
//! ```
//!
//! # Serialization and merging
//!
//! ```rust
//! use hashcounter::counter::HashCounter;
//!
//! let mut left = HashCounter::new();
//! left.add(b"apple", 2);
//!
//! let bytes = left.serialize();
//! let mut right = HashCounter::deserialize(&bytes).unwrap();
//! right.add(b"banana", 1);
//!
//! left.merge(&right);
//! assert_eq!(left.get(b"apple"), Some(4));
//! assert_eq!(left.get(b"banana"), Some(1));
//! ```

mod hash_counter;
mod iter;
mod key;
mod serialization;

pub use self::hash_counter::HashCounter;
pub use self::iter::Iter;
pub use self::key::ID_BITS;
pub use self::key::ID_MASK;
pub use self::key::NUM_PARTITIONS;
pub use self::key::PARTITION_BITS;
pub use self::key::decompose;
pub use self::key::recompose;
