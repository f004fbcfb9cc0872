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

use std::iter::Enumerate;
use std::iter::FusedIterator;
use std::slice;

use crate::counter::key::entry_count;
use crate::counter::key::entry_id;
use crate::counter::key::recompose;

/// Iterator over the `(key, count)` pairs of a [`HashCounter`](super::HashCounter).
///
/// Created by [`HashCounter::iter`](super::HashCounter::iter).
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    partitions: Enumerate<slice::Iter<'a, Vec<u64>>>,
    current: Option<(u16, slice::Iter<'a, u64>)>,
}

impl<'a> Iter<'a> {
    pub(super) fn new(partitions: &'a [Vec<u64>]) -> Self {
        Self {
            partitions: partitions.iter().enumerate(),
            current: None,
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = (u64, u16);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((partition, entries)) = &mut self.current {
                if let Some(&entry) = entries.next() {
                    let key = recompose(*partition, entry_id(entry));
                    return Some((key, entry_count(entry)));
                }
            }
            let (index, entries) = self.partitions.next()?;
            // index < NUM_PARTITIONS, so it fits in 16 bits
            self.current = Some((index as u16, entries.iter()));
        }
    }
}

impl FusedIterator for Iter<'_> {}
