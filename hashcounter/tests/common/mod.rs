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

#![allow(dead_code)]

use std::collections::HashMap;

use hashcounter::counter::HashCounter;

/// Xorshift generator so that every run sees the same keys.
#[derive(Debug, Clone, Copy)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub fn seeded(seed: u64) -> Self {
        let state = if seed == 0 { 0x9e3779b97f4a7c15 } else { seed };
        Self { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Returns 4 to 15 random bytes.
    pub fn next_key(&mut self) -> Vec<u8> {
        let len = 4 + (self.next_u64() % 12) as usize;
        (0..len).map(|_| (self.next_u64() >> 24) as u8).collect()
    }
}

/// Adds `num_keys` random keys to `counter`, each between 0 and 15 times with
/// a value of 1, and returns the expected count per key.
pub fn populate(
    counter: &mut HashCounter,
    rng: &mut XorShift64,
    num_keys: usize,
) -> HashMap<Vec<u8>, u16> {
    let mut expected = HashMap::new();
    for _ in 0..num_keys {
        let key = rng.next_key();
        let repeats = key[0] & 0x0F;
        for _ in 0..repeats {
            counter.add(&key, 1);
            *expected.entry(key.clone()).or_insert(0u16) += 1;
        }
    }
    expected
}
