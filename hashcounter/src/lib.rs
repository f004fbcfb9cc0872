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

//! Approximate per-key occurrence counting.
//!
//! A [`HashCounter`](counter::HashCounter) counts how many times each distinct
//! byte string was seen, identifying keys by a 64-bit hash instead of storing
//! them. Memory stays proportional to the number of distinct keys (8 bytes each
//! plus a fixed partition table) at the price of treating colliding keys as one.
//!
//! The structure doubles as a cardinality estimator: [`len`](counter::HashCounter::len)
//! reports how many distinct hashes were seen.
//!
//! Counters serialize to a compact binary form and merge with each other, so
//! partial counts can be produced in separate places and combined later.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod codec;

pub mod counter;
pub mod error;
pub mod hash;
