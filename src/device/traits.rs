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

use async_trait::async_trait;

use crate::device::DocumentId;
use crate::error::ConnectivityError;

/// Opens authenticated sessions against the modem.
#[async_trait]
pub trait DeviceClient: Send + Sync {
    type Session: DeviceSession;

    /// Log in with the configured address, credential and timeout.
    async fn open(&self) -> Result<Self::Session, ConnectivityError>;
}

/// A logged-in session. The device protocol is single-flight, so requests
/// on one session must be issued sequentially.
#[async_trait]
pub trait DeviceSession: Send {
    /// Fetch the raw XML of one document.
    async fn fetch(&mut self, function: DocumentId) -> Result<Vec<u8>, ConnectivityError>;

    /// Log out.
    async fn close(&mut self) -> Result<(), ConnectivityError>;
}
