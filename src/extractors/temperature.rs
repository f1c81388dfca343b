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
use crate::utils::units::fahrenheit_to_celsius;

pub const TEMPERATURE: &str = "temperature";

/// Tuner and device temperature. The modem reports both in Fahrenheit.
pub struct TemperatureExtractor;

impl Extractor for TemperatureExtractor {
    fn name(&self) -> &'static str {
        TEMPERATURE
    }

    fn functions(&self) -> &'static [DocumentId] {
        &[DocumentId::CMSTATE]
    }

    fn extract(
        &self,
        raw: &RawDocumentSet,
        source: &str,
    ) -> Result<Vec<MetricFamily>, SchemaValidationError> {
        let doc = load_document(raw, DocumentId::CMSTATE)?;
        let root = doc.root();

        // the misspelling is the device's
        let tuner_temperature = fahrenheit_to_celsius(root.child_value("TunnerTemperature")?);
        let temperature = fahrenheit_to_celsius(root.child_value("Temperature")?);

        let mut tuner_metric = MetricFamily::gauge(
            "connectbox_tuner_temperature",
            "Tuner temperature",
            Some("celsius"),
            &[SOURCE],
        );
        tuner_metric.add_metric(&[source], tuner_temperature);

        let mut device_metric = MetricFamily::gauge(
            "connectbox_temperature",
            "Temperature",
            Some("celsius"),
            &[SOURCE],
        );
        device_metric.add_metric(&[source], temperature);

        Ok(vec![tuner_metric, device_metric])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::SampleValue;

    #[test]
    fn test_extract_temperature() {
        let raw = RawDocumentSet::from([(
            DocumentId::CMSTATE,
            include_bytes!("../../tests/fixtures/cm_state.xml").to_vec(),
        )]);
        let families = TemperatureExtractor.extract(&raw, "192.168.0.1").unwrap();

        assert_eq!(families[0].full_name(), "connectbox_tuner_temperature_celsius");
        assert_eq!(families[0].samples[0].value, SampleValue::Number(100.0));
        assert_eq!(families[1].full_name(), "connectbox_temperature_celsius");
        assert_eq!(families[1].samples[0].value, SampleValue::Number(0.0));
        assert_eq!(families[1].samples[0].label_values, vec!["192.168.0.1"]);
    }

    #[test]
    fn test_missing_temperature_is_schema_error() {
        let raw = RawDocumentSet::from([(
            DocumentId::CMSTATE,
            b"<cmstate><TunnerTemperature>100</TunnerTemperature></cmstate>".to_vec(),
        )]);
        let err = TemperatureExtractor.extract(&raw, "192.168.0.1").unwrap_err();
        assert!(matches!(err, SchemaValidationError::MissingElement { .. }));
    }
}
