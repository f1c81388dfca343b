// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! In-memory metric families produced by a scrape.
//!
//! Families are plain values. They are built from scratch on every scrape,
//! handed to the exposition layer and dropped; nothing here is registered
//! globally or kept between scrapes.

pub mod family;

pub use family::{MetricFamily, MetricKind, Sample, SampleValue};
