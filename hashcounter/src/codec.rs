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

use std::io;
use std::io::Cursor;
use std::io::Read;

use byteorder::BigEndian;
use byteorder::ReadBytesExt;

/// Maximum encoded length of a 64-bit unsigned varint.
pub(crate) const MAX_VARINT_LEN64: usize = 10;

pub(crate) struct CounterBytes {
    bytes: Vec<u8>,
}

impl CounterBytes {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn write(&mut self, buf: &[u8]) {
        self.bytes.extend_from_slice(buf);
    }

    pub fn write_u8(&mut self, n: u8) {
        self.bytes.push(n);
    }

    pub fn write_u16_be(&mut self, n: u16) {
        self.write(&n.to_be_bytes());
    }

    pub fn write_u64_be(&mut self, n: u64) {
        self.write(&n.to_be_bytes());
    }

    /// Writes `n` as an unsigned LEB128 varint: seven bits per byte, least
    /// significant group first, high bit set on every byte but the last.
    pub fn write_uvarint(&mut self, mut n: u64) {
        while n >= 0x80 {
            self.bytes.push((n as u8) | 0x80);
            n >>= 7;
        }
        self.bytes.push(n as u8);
    }
}

pub(crate) struct CounterSlice<'a> {
    slice: Cursor<&'a [u8]>,
}

impl<'a> CounterSlice<'a> {
    pub fn new(slice: &'a [u8]) -> Self {
        Self {
            slice: Cursor::new(slice),
        }
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        let len = self.slice.get_ref().len() as u64;
        len.saturating_sub(self.slice.position()) as usize
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        self.slice.read_u8()
    }

    pub fn read_u16_be(&mut self) -> io::Result<u16> {
        self.slice.read_u16::<BigEndian>()
    }

    /// Fills `dst` with consecutive big-endian u64 values.
    pub fn read_u64_be_into(&mut self, dst: &mut [u64]) -> io::Result<()> {
        self.slice.read_u64_into::<BigEndian>(dst)
    }

    /// Reads an unsigned LEB128 varint.
    ///
    /// Fails with [`io::ErrorKind::UnexpectedEof`] if the input ends before the
    /// final byte, and with [`io::ErrorKind::InvalidData`] if the value does not
    /// fit in 64 bits.
    pub fn read_uvarint(&mut self) -> io::Result<u64> {
        let mut value = 0u64;
        let mut shift = 0u32;
        let mut byte = [0u8; 1];
        for i in 0..MAX_VARINT_LEN64 {
            self.slice.read_exact(&mut byte)?;
            let b = byte[0];
            if b < 0x80 {
                // the tenth byte only has room for the top bit of a u64
                if i == MAX_VARINT_LEN64 - 1 && b > 1 {
                    break;
                }
                return Ok(value | ((b as u64) << shift));
            }
            value |= ((b & 0x7f) as u64) << shift;
            shift += 7;
        }
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "varint overflows a 64-bit integer",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(n: u64) -> Vec<u8> {
        let mut bytes = CounterBytes::with_capacity(MAX_VARINT_LEN64);
        bytes.write_uvarint(n);
        bytes.into_bytes()
    }

    #[test]
    fn test_uvarint_encoding() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(1), vec![0x01]);
        assert_eq!(encode(127), vec![0x7f]);
        assert_eq!(encode(128), vec![0x80, 0x01]);
        assert_eq!(encode(300), vec![0xac, 0x02]);
        assert_eq!(encode(u64::MAX).len(), MAX_VARINT_LEN64);
    }

    #[test]
    fn test_uvarint_decoding() {
        for n in [0, 1, 127, 128, 300, 16_384, u32::MAX as u64, u64::MAX] {
            let bytes = encode(n);
            let mut slice = CounterSlice::new(&bytes);
            assert_eq!(slice.read_uvarint().unwrap(), n);
            assert!(slice.is_exhausted());
        }
    }

    #[test]
    fn test_uvarint_truncated() {
        let mut slice = CounterSlice::new(&[0x80, 0x80]);
        let err = slice.read_uvarint().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);

        let mut slice = CounterSlice::new(&[]);
        let err = slice.read_uvarint().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_uvarint_overflow() {
        // eleven continuation bytes never terminate within 64 bits
        let bytes = [0xffu8; 11];
        let mut slice = CounterSlice::new(&bytes);
        let err = slice.read_uvarint().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        // tenth byte carrying more than the top bit
        let mut bytes = vec![0xffu8; 9];
        bytes.push(0x02);
        let mut slice = CounterSlice::new(&bytes);
        let err = slice.read_uvarint().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_fixed_width_big_endian() {
        let mut bytes = CounterBytes::with_capacity(11);
        bytes.write_u8(1);
        bytes.write_u16_be(0x0102);
        bytes.write_u64_be(0x0102_0304_0506_0708);
        let bytes = bytes.into_bytes();
        assert_eq!(bytes, vec![1, 1, 2, 1, 2, 3, 4, 5, 6, 7, 8]);

        let mut slice = CounterSlice::new(&bytes);
        assert_eq!(slice.read_u8().unwrap(), 1);
        assert_eq!(slice.read_u16_be().unwrap(), 0x0102);
        assert_eq!(slice.remaining(), 8);
        let mut words = [0u64; 1];
        slice.read_u64_be_into(&mut words).unwrap();
        assert_eq!(words[0], 0x0102_0304_0506_0708);
        assert!(slice.read_u8().is_err());
    }
}
