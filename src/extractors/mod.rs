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

//! Extractors turn the modem's raw XML documents into metric families.
//!
//! Every extractor declares which documents it needs, and is handed exactly
//! those documents on each scrape. Extractors are built once at startup and
//! shared by all scrapes, so they hold no per-scrape state and perform no I/O.

pub mod device_status;
pub mod downstream;
pub mod lan_users;
pub mod provisioning;
pub mod registry;
pub mod schema;
pub mod temperature;
pub mod upstream;

use std::collections::BTreeMap;

use crate::device::DocumentId;
use crate::error::SchemaValidationError;
use crate::metrics::MetricFamily;

pub use device_status::DeviceStatusExtractor;
pub use downstream::DownstreamStatusExtractor;
pub use lan_users::LanUserExtractor;
pub use provisioning::ProvisioningState;
pub use registry::{resolve, resolve_all, ExtractorKind};
pub use schema::{DocumentSchema, Element, ValidatedDocument};
pub use temperature::TemperatureExtractor;
pub use upstream::UpstreamStatusExtractor;

/// Raw XML documents of one scrape, keyed by the function they came from.
pub type RawDocumentSet = BTreeMap<DocumentId, Vec<u8>>;

/// Name of the label every family carries, holding the device address.
pub const SOURCE: &str = "source";

/// Trait implemented by every metric family extractor
pub trait Extractor: Send + Sync {
    /// Stable identifier, used in the configuration and as the `extractor` label.
    fn name(&self) -> &'static str;

    /// The documents this extractor needs, in fetch order.
    fn functions(&self) -> &'static [DocumentId];

    /// Convert the documents named by [`Extractor::functions`] into metrics.
    /// `source` is the value of the `source` label.
    fn extract(
        &self,
        raw: &RawDocumentSet,
        source: &str,
    ) -> Result<Vec<MetricFamily>, SchemaValidationError>;
}

/// Look up and validate one document of the raw document set.
pub fn load_document(
    raw: &RawDocumentSet,
    function: DocumentId,
) -> Result<ValidatedDocument<'_>, SchemaValidationError> {
    let bytes = raw
        .get(&function)
        .ok_or(SchemaValidationError::MissingDocument(function))?;
    ValidatedDocument::parse(function, bytes)
}
