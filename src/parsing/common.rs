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

// Common parsing utilities for the text the modem puts into its XML documents.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::units::dhms_to_seconds;

/// Uptime as reported in `cm_system_uptime`, e.g. `36day(s)15h:24m:58s`.
static UPTIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)day\(s\)(\d+)h:(\d+)m:(\d+)s$").unwrap());

/// Parse a number from a string after trimming surrounding whitespace.
/// Returns None if parsing fails.
pub fn parse_number<T: FromStr>(s: &str) -> Option<T> {
    s.trim().parse::<T>().ok()
}

/// Parse an uptime string like `36day(s)15h:24m:58s` into seconds.
/// Returns None if the string does not follow that pattern or the total overflows.
pub fn parse_uptime_seconds(s: &str) -> Option<f64> {
    let cap = UPTIME_RE.captures(s.trim())?;
    let field = |i: usize| cap.get(i).and_then(|m| parse_number::<u64>(m.as_str()));
    dhms_to_seconds(field(1)?, field(2)?, field(3)?, field(4)?)
}

/// Left-pad a channel id with zeros to width 2 so that ids sort lexically.
pub fn pad_channel_id(id: &str) -> String {
    format!("{:0>2}", id.trim())
}
