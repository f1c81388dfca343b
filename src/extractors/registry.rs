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

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::extractors::device_status::DEVICE_STATUS;
use crate::extractors::downstream::DOWNSTREAM;
use crate::extractors::lan_users::LAN_USERS;
use crate::extractors::temperature::TEMPERATURE;
use crate::extractors::upstream::UPSTREAM;
use crate::extractors::{
    DeviceStatusExtractor, DownstreamStatusExtractor, Extractor, LanUserExtractor,
    TemperatureExtractor, UpstreamStatusExtractor,
};

/// The extractors that can be enabled in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExtractorKind {
    DeviceStatus,
    Downstream,
    LanUsers,
    Temperature,
    Upstream,
}

impl ExtractorKind {
    pub const ALL: [ExtractorKind; 5] = [
        Self::DeviceStatus,
        Self::Downstream,
        Self::LanUsers,
        Self::Temperature,
        Self::Upstream,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeviceStatus => DEVICE_STATUS,
            Self::Downstream => DOWNSTREAM,
            Self::LanUsers => LAN_USERS,
            Self::Temperature => TEMPERATURE,
            Self::Upstream => UPSTREAM,
        }
    }

    /// Comma separated list of every identifier, for error messages.
    pub fn supported() -> String {
        Self::ALL
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn build(&self) -> Box<dyn Extractor> {
        match self {
            Self::DeviceStatus => Box::new(DeviceStatusExtractor),
            Self::Downstream => Box::new(DownstreamStatusExtractor),
            Self::LanUsers => Box::new(LanUserExtractor),
            Self::Temperature => Box::new(TemperatureExtractor),
            Self::Upstream => Box::new(UpstreamStatusExtractor),
        }
    }
}

impl FromStr for ExtractorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownExtractor {
                name: s.to_string(),
                supported: Self::supported(),
            })
    }
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the extractor registered under `name`.
pub fn resolve(name: &str) -> Result<Box<dyn Extractor>, ConfigError> {
    name.parse::<ExtractorKind>().map(|kind| kind.build())
}

/// Build one extractor per identifier, keeping the given order.
pub fn resolve_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<Box<dyn Extractor>>, ConfigError> {
    names.iter().map(|name| resolve(name.as_ref())).collect()
}
