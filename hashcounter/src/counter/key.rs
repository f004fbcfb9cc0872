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

//! Key layout and entry packing.
//!
//! Key:   `[partition (16 bits)][id (48 bits)]`
//! Entry: `[count (16 bits)][id (48 bits)]`

/// Number of high key bits selecting a partition.
pub const PARTITION_BITS: u32 = 16;

/// Number of low key bits identifying a key within its partition.
pub const ID_BITS: u32 = u64::BITS - PARTITION_BITS;

/// Number of partitions in every counter.
pub const NUM_PARTITIONS: usize = 1 << PARTITION_BITS;

/// Mask selecting the id bits of a key or an entry.
pub const ID_MASK: u64 = (1 << ID_BITS) - 1;

/// Splits a key into its partition index and id.
#[inline]
pub const fn decompose(key: u64) -> (u16, u64) {
    ((key >> ID_BITS) as u16, key & ID_MASK)
}

/// Rebuilds a key from a partition index and id; the inverse of [`decompose`].
#[inline]
pub const fn recompose(partition: u16, id: u64) -> u64 {
    ((partition as u64) << ID_BITS) | (id & ID_MASK)
}

#[inline]
pub(crate) const fn pack_entry(id: u64, count: u16) -> u64 {
    ((count as u64) << ID_BITS) | (id & ID_MASK)
}

#[inline]
pub(crate) const fn entry_id(entry: u64) -> u64 {
    entry & ID_MASK
}

#[inline]
pub(crate) const fn entry_count(entry: u64) -> u16 {
    (entry >> ID_BITS) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(ID_BITS, 48);
        assert_eq!(NUM_PARTITIONS, 65536);
        assert_eq!(ID_MASK, 0x0000_FFFF_FFFF_FFFF);
    }

    #[test]
    fn test_decompose_recompose() {
        let key = 0xABCD_0123_4567_89EF;
        let (partition, id) = decompose(key);
        assert_eq!(partition, 0xABCD);
        assert_eq!(id, 0x0123_4567_89EF);
        assert_eq!(recompose(partition, id), key);

        for key in [0, 1, ID_MASK, ID_MASK + 1, u64::MAX] {
            let (partition, id) = decompose(key);
            assert_eq!(recompose(partition, id), key);
        }
    }

    #[test]
    fn test_pack_unpack_entry() {
        let entry = pack_entry(0x0123_4567_89EF, 0xBEEF);
        assert_eq!(entry, 0xBEEF_0123_4567_89EF);
        assert_eq!(entry_id(entry), 0x0123_4567_89EF);
        assert_eq!(entry_count(entry), 0xBEEF);

        let entry = pack_entry(ID_MASK, u16::MAX);
        assert_eq!(entry, u64::MAX);
        assert_eq!(entry_id(entry), ID_MASK);
        assert_eq!(entry_count(entry), u16::MAX);
    }
}
