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

//! Binary format of a [`HashCounter`].
//!
//! ```text
//! u8       serial version (1)
//! repeated, one record per non-empty partition in ascending order:
//!   u16    partition index (big-endian)
//!   varint number of entries (unsigned LEB128)
//!   u64    packed entry `count << 48 | id` (big-endian), once per entry
//! ```

use tracing::debug;

use crate::codec::CounterBytes;
use crate::codec::CounterSlice;
use crate::codec::MAX_VARINT_LEN64;
use crate::counter::HashCounter;
use crate::error::Error;
use crate::hash::XxHash64;

const SERIAL_VERSION: u8 = 1;

const SERIAL_VERSION_BYTES: usize = 1;
const PARTITION_INDEX_BYTES: usize = 2;
const ENTRY_BYTES: usize = 8;

impl<H> HashCounter<H> {
    /// Serializes the counter into bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hashcounter::counter::HashCounter;
    /// let mut counter = HashCounter::new();
    /// counter.add(b"test", 1);
    ///
    /// let bytes = counter.serialize();
    /// let restored = HashCounter::deserialize(&bytes).unwrap();
    /// assert_eq!(restored.get(b"test"), Some(1));
    /// ```
    pub fn serialize(&self) -> Vec<u8> {
        let partitions = self.partitions();
        let capacity = SERIAL_VERSION_BYTES
            + partitions
                .iter()
                .filter(|entries| !entries.is_empty())
                .map(|entries| {
                    PARTITION_INDEX_BYTES + MAX_VARINT_LEN64 + entries.len() * ENTRY_BYTES
                })
                .sum::<usize>();

        let mut bytes = CounterBytes::with_capacity(capacity);
        bytes.write_u8(SERIAL_VERSION);
        for (index, entries) in partitions.iter().enumerate() {
            if entries.is_empty() {
                continue;
            }
            bytes.write_u16_be(index as u16);
            bytes.write_uvarint(entries.len() as u64);
            for &entry in entries {
                bytes.write_u64_be(entry);
            }
        }
        bytes.into_bytes()
    }

    /// Loads serialized partitions into this counter.
    ///
    /// Every partition present in `bytes` replaces the corresponding partition
    /// of this counter; partitions absent from `bytes` keep their entries. Use
    /// [`merge`](Self::merge) to add counts instead.
    ///
    /// The input is fully validated before anything is replaced, so on error
    /// the counter is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `bytes` is empty
    /// - the serial version is not 1
    /// - an entry count cannot be decoded
    /// - a record is truncated
    pub fn deserialize_into(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let records = decode_records(bytes)?;

        let num_records = records.len();
        let mut num_entries = 0usize;
        let partitions = self.partitions_mut();
        for (index, entries) in records {
            num_entries += entries.len();
            partitions[index as usize] = entries;
        }
        debug!(
            partitions = num_records,
            entries = num_entries,
            "deserialized hash counter"
        );
        Ok(())
    }

    /// Deserializes a counter that derives keys with `hasher`.
    ///
    /// The hasher must match the one the counter was built with for
    /// [`get`](Self::get) to find the serialized keys; this is not checked.
    ///
    /// # Errors
    ///
    /// See [`deserialize_into`](Self::deserialize_into).
    pub fn deserialize_with_hasher(bytes: &[u8], hasher: H) -> Result<Self, Error> {
        let mut counter = Self::with_hasher(hasher);
        counter.deserialize_into(bytes)?;
        Ok(counter)
    }
}

impl HashCounter {
    /// Deserializes a counter that uses the default hasher.
    ///
    /// # Errors
    ///
    /// See [`deserialize_into`](Self::deserialize_into).
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        Self::deserialize_with_hasher(bytes, XxHash64::default())
    }
}

fn decode_records(bytes: &[u8]) -> Result<Vec<(u16, Vec<u64>)>, Error> {
    let mut cursor = CounterSlice::new(bytes);

    let serial_version = cursor.read_u8().map_err(|_| Error::empty_data())?;
    if serial_version != SERIAL_VERSION {
        return Err(Error::unsupported_serial_version(
            SERIAL_VERSION,
            serial_version,
        ));
    }

    let mut records = Vec::new();
    while !cursor.is_exhausted() {
        let index = cursor
            .read_u16_be()
            .map_err(|err| Error::insufficient_data("partition_index").set_source(err))?;
        let num_entries = cursor.read_uvarint().map_err(|err| {
            Error::malformed_varint("num_entries")
                .with_context("partition", index)
                .set_source(err)
        })?;

        // check the declared size before allocating for it
        let remaining = cursor.remaining();
        let fits = usize::try_from(num_entries)
            .ok()
            .and_then(|n| n.checked_mul(ENTRY_BYTES))
            .is_some_and(|len| len <= remaining);
        if !fits {
            return Err(Error::insufficient_data("entries")
                .with_context("partition", index)
                .with_context("num_entries", num_entries)
                .with_context("remaining_bytes", remaining));
        }

        let mut entries = vec![0u64; num_entries as usize];
        cursor.read_u64_be_into(&mut entries).map_err(|err| {
            Error::insufficient_data("entries")
                .with_context("partition", index)
                .set_source(err)
        })?;
        records.push((index, entries));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::recompose;
    use crate::error::ErrorKind;

    #[test]
    fn test_serialize_empty() {
        let counter = HashCounter::new();
        assert_eq!(counter.serialize(), vec![SERIAL_VERSION]);

        let restored = HashCounter::deserialize(&[SERIAL_VERSION]).unwrap();
        assert!(restored.is_empty());
    }

    #[test]
    fn test_serialize_layout() {
        let mut counter = HashCounter::new();
        counter.add_key(recompose(0x0102, 0x0A), 3);
        counter.add_key(recompose(0x0001, 0x0B), 0x0100);
        counter.add_key(recompose(0x0102, 0x0C), 1);

        let bytes = counter.serialize();
        #[rustfmt::skip]
        let expected = vec![
            1,
            0x00, 0x01, 1,
            0x01, 0x00, 0, 0, 0, 0, 0, 0x0B,
            0x01, 0x02, 2,
            0x00, 0x03, 0, 0, 0, 0, 0, 0x0A,
            0x00, 0x01, 0, 0, 0, 0, 0, 0x0C,
        ];
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_multi_byte_entry_count() {
        let mut counter = HashCounter::new();
        for id in 0..200 {
            counter.add_key(recompose(5, id), 1);
        }
        let bytes = counter.serialize();
        assert_eq!(&bytes[..5], &[1, 0x00, 0x05, 0xC8, 0x01]);
        assert_eq!(bytes.len(), 5 + 200 * ENTRY_BYTES);

        let restored = HashCounter::deserialize(&bytes).unwrap();
        assert_eq!(restored.len(), 200);
    }

    #[test]
    fn test_declared_count_exceeds_input() {
        // claims u64::MAX / 2 entries with nothing behind it
        let mut bytes = vec![1, 0x00, 0x01];
        bytes.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F]);
        let err = HashCounter::deserialize(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
        assert!(err.message().contains("insufficient data for entries"));
    }
}
