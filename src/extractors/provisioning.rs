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

/// Cable modem provisioning status as reported in `provisioning_st`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProvisioningState {
    Online,
    PartialServiceUs,
    PartialServiceDs,
    PartialServiceUsDs,
    ModemMode,
    DsScanning,
    UsScanning,
    UsRanging,
    DsRanging,
    RequestingCmIpAddress,
    /// Any status this exporter does not know about yet.
    Unknown,
}

impl ProvisioningState {
    pub const ALL: [ProvisioningState; 11] = [
        Self::Online,
        Self::PartialServiceUs,
        Self::PartialServiceDs,
        Self::PartialServiceUsDs,
        Self::ModemMode,
        Self::DsScanning,
        Self::UsScanning,
        Self::UsRanging,
        Self::DsRanging,
        Self::RequestingCmIpAddress,
        Self::Unknown,
    ];

    /// The status text the device uses for this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::PartialServiceUs => "Partial Service (US only)",
            Self::PartialServiceDs => "Partial Service (DS only)",
            Self::PartialServiceUsDs => "Partial Service (US+DS)",
            Self::ModemMode => "Modem Mode",
            Self::DsScanning => "DS scanning",
            Self::UsScanning => "US scanning",
            Self::UsRanging => "US ranging",
            Self::DsRanging => "DS ranging",
            Self::RequestingCmIpAddress => "Requesting CM IP address",
            Self::Unknown => "unknown",
        }
    }

    /// Map the device's status text onto a known state. Texts that match
    /// no known state map to [`ProvisioningState::Unknown`].
    pub fn classify(status: &str) -> Self {
        Self::ALL
            .into_iter()
            .filter(|s| *s != Self::Unknown)
            .find(|s| s.as_str() == status)
            .unwrap_or(Self::Unknown)
    }

    /// One `(state, is_current)` entry per known state, exactly one of which is set.
    pub fn state_set(&self) -> Vec<(String, bool)> {
        Self::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), s == self))
            .collect()
    }
}

impl fmt::Display for ProvisioningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
