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

use crate::device::DocumentId;
use crate::error::SchemaValidationError;
use crate::extractors::{load_document, Element, Extractor, RawDocumentSet, SOURCE};
use crate::metrics::MetricFamily;

pub const LAN_USERS: &str = "lan_users";

const LABEL_NAMES: [&str; 5] = [
    SOURCE,
    "mac_address",
    "ipv4_address",
    "ipv6_address",
    "hostname",
];

/// Link speed of every wired and wireless client the modem knows about.
pub struct LanUserExtractor;

impl LanUserExtractor {
    /// Ethernet and Wi-Fi clients share one record layout.
    fn extract_clients(
        section: Element<'_, '_>,
        source: &str,
        target: &mut MetricFamily,
    ) -> Result<(), SchemaValidationError> {
        for client in section.children("clientinfo") {
            // depending on the firmware, both IPv4/IPv6 addresses or only one of both are reported
            let ipv4_address = client.optional_child_text("IPv4Addr").unwrap_or_default();
            let ipv6_address = client.optional_child_text("IPv6Addr").unwrap_or_default();

            let values = [
                source,
                client.child_text("MACAddr")?,
                ipv4_address,
                ipv6_address,
                client.child_text("hostname")?,
            ];
            target.add_metric(&values, client.child_value::<u64>("speed")? as f64);
        }
        Ok(())
    }
}

impl Extractor for LanUserExtractor {
    fn name(&self) -> &'static str {
        LAN_USERS
    }

    fn functions(&self) -> &'static [DocumentId] {
        &[DocumentId::LANUSERTABLE]
    }

    fn extract(
        &self,
        raw: &RawDocumentSet,
        source: &str,
    ) -> Result<Vec<MetricFamily>, SchemaValidationError> {
        let doc = load_document(raw, DocumentId::LANUSERTABLE)?;
        let root = doc.root();

        let mut ethernet_speed = MetricFamily::gauge(
            "connectbox_ethernet_client_speed",
            "Ethernet client network speed",
            Some("mbit"),
            &LABEL_NAMES,
        );
        Self::extract_clients(root.child("Ethernet")?, source, &mut ethernet_speed)?;

        let mut wifi_speed = MetricFamily::gauge(
            "connectbox_wifi_client_speed",
            "Wi-Fi client network speed",
            Some("mbit"),
            &LABEL_NAMES,
        );
        Self::extract_clients(root.child("WIFI")?, source, &mut wifi_speed)?;

        Ok(vec![ethernet_speed, wifi_speed])
    }
}
