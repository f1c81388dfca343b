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
use crate::extractors::{load_document, Extractor, RawDocumentSet, SOURCE};
use crate::metrics::MetricFamily;
use crate::parsing::common::pad_channel_id;

pub const UPSTREAM: &str = "upstream";

const CHANNEL_ID: &str = "channel_id";
const TIMEOUT_TYPE: &str = "timeout_type";

/// Timeout classes and the element holding each counter.
const TIMEOUTS: [(&str, &str); 4] = [
    ("T1", "t1Timeouts"),
    ("T2", "t2Timeouts"),
    ("T3", "t3Timeouts"),
    ("T4", "t4Timeouts"),
];

/// Per-channel upstream levels and ranging timeout counters.
pub struct UpstreamStatusExtractor;

impl Extractor for UpstreamStatusExtractor {
    fn name(&self) -> &'static str {
        UPSTREAM
    }

    fn functions(&self) -> &'static [DocumentId] {
        &[DocumentId::UPSTREAM_TABLE]
    }

    fn extract(
        &self,
        raw: &RawDocumentSet,
        source: &str,
    ) -> Result<Vec<MetricFamily>, SchemaValidationError> {
        let doc = load_document(raw, DocumentId::UPSTREAM_TABLE)?;
        let labels = [SOURCE, CHANNEL_ID];

        let mut frequency = MetricFamily::gauge(
            "connectbox_upstream_frequency",
            "Upstream channel frequency",
            Some("hz"),
            &labels,
        );
        let mut power_level = MetricFamily::gauge(
            "connectbox_upstream_power_level",
            "Upstream channel power level",
            Some("dbmv"),
            &labels,
        );
        let mut symbol_rate = MetricFamily::gauge(
            "connectbox_upstream_symbol_rate",
            "Upstream channel symbol rate",
            Some("ksps"),
            &labels,
        );
        let mut timeouts = MetricFamily::counter(
            "connectbox_upstream_timeouts",
            "Upstream channel timeout occurrences",
            &[SOURCE, CHANNEL_ID, TIMEOUT_TYPE],
        );

        for channel in doc.root().children("upstream") {
            let channel_id = pad_channel_id(channel.child_text("usid")?);
            let values = [source.to_string(), channel_id.clone()];

            frequency.add_metric(&values, channel.child_value::<u64>("freq")? as f64);
            power_level.add_metric(&values, channel.child_value::<f64>("power")?);
            symbol_rate.add_metric(&values, channel.child_value::<f64>("srate")?);

            for (timeout_type, element) in TIMEOUTS {
                let count = channel.child_value::<u64>(element)?;
                timeouts.add_metric(&[source, channel_id.as_str(), timeout_type], count as f64);
            }
        }

        Ok(vec![frequency, power_level, symbol_rate, timeouts])
    }
}
