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

/// Identifier of an XML document ("function") served by the modem's
/// `getter.xml` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(pub u16);

impl DocumentId {
    pub const GLOBALSETTINGS: Self = Self(1);
    pub const CM_SYSTEM_INFO: Self = Self(2);
    pub const DOWNSTREAM_TABLE: Self = Self(10);
    pub const UPSTREAM_TABLE: Self = Self(11);
    pub const SIGNAL_TABLE: Self = Self(12);
    pub const LANUSERTABLE: Self = Self(123);
    pub const CMSTATE: Self = Self(136);
    pub const CMSTATUS: Self = Self(144);

    pub fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Functions of the `setter.xml` endpoint.
pub struct SetterFunction;

impl SetterFunction {
    pub const LOGIN: u16 = 15;
    pub const LOGOUT: u16 = 16;
}
