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

pub const DOWNSTREAM: &str = "downstream";

const CHANNEL_ID: &str = "channel_id";

/// Per-channel downstream levels and codeword error counters.
pub struct DownstreamStatusExtractor;

impl DownstreamStatusExtractor {
    /// DOWNSTREAM_TABLE gives us frequency, power level, SNR and RxMER per channel
    fn extract_levels(
        raw: &RawDocumentSet,
        source: &str,
    ) -> Result<Vec<MetricFamily>, SchemaValidationError> {
        let doc = load_document(raw, DocumentId::DOWNSTREAM_TABLE)?;
        let labels = [SOURCE, CHANNEL_ID];

        let mut frequency = MetricFamily::gauge(
            "connectbox_downstream_frequency",
            "Downstream channel frequency",
            Some("hz"),
            &labels,
        );
        let mut power_level = MetricFamily::gauge(
            "connectbox_downstream_power_level",
            "Downstream channel power level",
            Some("dbmv"),
            &labels,
        );
        let mut snr = MetricFamily::gauge(
            "connectbox_downstream_snr",
            "Downstream channel signal-to-noise ratio (SNR)",
            Some("db"),
            &labels,
        );
        let mut rxmer = MetricFamily::gauge(
            "connectbox_downstream_rxmer",
            "Downstream channel receive modulation error ratio (RxMER)",
            Some("db"),
            &labels,
        );

        for channel in doc.root().children("downstream") {
            let values = [source.to_string(), pad_channel_id(channel.child_text("chid")?)];
            frequency.add_metric(&values, channel.child_value::<u64>("freq")? as f64);
            power_level.add_metric(&values, channel.child_value::<f64>("pow")?);
            snr.add_metric(&values, channel.child_value::<f64>("snr")?);
            rxmer.add_metric(&values, channel.child_value::<f64>("RxMER")?);
        }

        Ok(vec![frequency, power_level, snr, rxmer])
    }

    /// SIGNAL_TABLE gives us unerrored, corrected and uncorrectable codewords per channel
    fn extract_codewords(
        raw: &RawDocumentSet,
        source: &str,
    ) -> Result<Vec<MetricFamily>, SchemaValidationError> {
        let doc = load_document(raw, DocumentId::SIGNAL_TABLE)?;
        let labels = [SOURCE, CHANNEL_ID];

        let mut unerrored = MetricFamily::counter(
            "connectbox_downstream_codewords_unerrored",
            "Unerrored downstream codewords",
            &labels,
        );
        let mut correctable = MetricFamily::counter(
            "connectbox_downstream_codewords_corrected",
            "Corrected downstream codewords",
            &labels,
        );
        let mut uncorrectable = MetricFamily::counter(
            "connectbox_downstream_codewords_uncorrectable",
            "Uncorrectable downstream codewords",
            &labels,
        );

        for channel in doc.root().children("signal") {
            let values = [source.to_string(), pad_channel_id(channel.child_text("dsid")?)];
            unerrored.add_metric(&values, channel.child_value::<u64>("unerrored")? as f64);
            correctable.add_metric(&values, channel.child_value::<u64>("correctable")? as f64);
            uncorrectable.add_metric(&values, channel.child_value::<u64>("uncorrectable")? as f64);
        }

        Ok(vec![unerrored, correctable, uncorrectable])
    }
}

impl Extractor for DownstreamStatusExtractor {
    fn name(&self) -> &'static str {
        DOWNSTREAM
    }

    fn functions(&self) -> &'static [DocumentId] {
        &[DocumentId::DOWNSTREAM_TABLE, DocumentId::SIGNAL_TABLE]
    }

    fn extract(
        &self,
        raw: &RawDocumentSet,
        source: &str,
    ) -> Result<Vec<MetricFamily>, SchemaValidationError> {
        let mut families = Self::extract_levels(raw, source)?;
        families.extend(Self::extract_codewords(raw, source)?);
        Ok(families)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MetricKind, SampleValue};

    fn raw_documents() -> RawDocumentSet {
        RawDocumentSet::from([
            (
                DocumentId::DOWNSTREAM_TABLE,
                include_bytes!("../../tests/fixtures/downstream_table.xml").to_vec(),
            ),
            (
                DocumentId::SIGNAL_TABLE,
                include_bytes!("../../tests/fixtures/signal_table.xml").to_vec(),
            ),
        ])
    }

    #[test]
    fn test_extract_downstream() {
        let families = DownstreamStatusExtractor
            .extract(&raw_documents(), "192.168.0.1")
            .unwrap();
        let names: Vec<_> = families.iter().map(|f| f.full_name()).collect();
        assert_eq!(
            names,
            vec![
                "connectbox_downstream_frequency_hz",
                "connectbox_downstream_power_level_dbmv",
                "connectbox_downstream_snr_db",
                "connectbox_downstream_rxmer_db",
                "connectbox_downstream_codewords_unerrored",
                "connectbox_downstream_codewords_corrected",
                "connectbox_downstream_codewords_uncorrectable",
            ]
        );

        let frequency = &families[0];
        assert_eq!(frequency.samples.len(), 3);
        assert_eq!(frequency.samples[0].label_values, vec!["192.168.0.1", "03"]);
        assert_eq!(frequency.samples[0].value, SampleValue::Number(602_000_000.0));
        assert_eq!(frequency.samples[2].label_values[1], "12");

        assert_eq!(families[1].samples[2].value, SampleValue::Number(-1.0));
        assert_eq!(families[3].samples[0].value, SampleValue::Number(38.983));

        let uncorrectable = &families[6];
        assert_eq!(uncorrectable.kind, MetricKind::Counter);
        assert_eq!(uncorrectable.samples[2].value, SampleValue::Number(4.0));
    }

    #[test]
    fn test_label_arity_matches_label_names() {
        let families = DownstreamStatusExtractor
            .extract(&raw_documents(), "192.168.0.1")
            .unwrap();
        for family in &families {
            for sample in &family.samples {
                assert_eq!(sample.label_values.len(), family.label_names.len());
            }
        }
    }

    #[test]
    fn test_invalid_value_is_schema_error() {
        let mut raw = raw_documents();
        raw.insert(
            DocumentId::SIGNAL_TABLE,
            b"<signal_table><signal><dsid>1</dsid><unerrored>n/a</unerrored>\
              <correctable>0</correctable><uncorrectable>0</uncorrectable></signal></signal_table>"
                .to_vec(),
        );
        let err = DownstreamStatusExtractor
            .extract(&raw, "192.168.0.1")
            .unwrap_err();
        assert!(matches!(err, SchemaValidationError::InvalidValue { .. }));
    }
}
