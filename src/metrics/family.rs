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

/// Metric types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Counter,
    /// Constant `1` carrying a string-to-string mapping.
    Info,
    /// Mutually exclusive states, exactly one of which is set.
    StateSet,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gauge => "gauge",
            Self::Counter => "counter",
            Self::Info => "info",
            Self::StateSet => "stateset",
        }
    }
}

/// Value of a single sample. The variant always matches the family's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleValue {
    Number(f64),
    Info(Vec<(String, String)>),
    States(Vec<(String, bool)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub label_values: Vec<String>,
    pub value: SampleValue,
}

/// A named, typed group of samples sharing one set of label names.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFamily {
    pub name: String,
    pub help: String,
    pub unit: Option<String>,
    pub kind: MetricKind,
    pub label_names: Vec<String>,
    pub samples: Vec<Sample>,
}

impl MetricFamily {
    pub fn new(
        name: impl Into<String>,
        help: impl Into<String>,
        unit: Option<&str>,
        kind: MetricKind,
        label_names: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            unit: unit.map(str::to_string),
            kind,
            label_names: label_names.iter().map(|s| s.to_string()).collect(),
            samples: Vec::new(),
        }
    }

    pub fn gauge(name: &str, help: &str, unit: Option<&str>, label_names: &[&str]) -> Self {
        Self::new(name, help, unit, MetricKind::Gauge, label_names)
    }

    pub fn counter(name: &str, help: &str, label_names: &[&str]) -> Self {
        Self::new(name, help, None, MetricKind::Counter, label_names)
    }

    pub fn info(name: &str, help: &str, label_names: &[&str]) -> Self {
        Self::new(name, help, None, MetricKind::Info, label_names)
    }

    pub fn state_set(name: &str, help: &str, label_names: &[&str]) -> Self {
        Self::new(name, help, None, MetricKind::StateSet, label_names)
    }

    /// Name as exposed, with the unit appended as a suffix.
    pub fn full_name(&self) -> String {
        match &self.unit {
            Some(unit) => format!("{}_{unit}", self.name),
            None => self.name.clone(),
        }
    }

    /// Add a gauge or counter sample.
    ///
    /// # Panics
    ///
    /// If the family is not numeric or the label arity does not match.
    pub fn add_metric<S: AsRef<str>>(&mut self, label_values: &[S], value: f64) -> &mut Self {
        assert!(
            matches!(self.kind, MetricKind::Gauge | MetricKind::Counter),
            "{} is a {} family, numeric samples need a gauge or counter",
            self.name,
            self.kind.as_str()
        );
        self.push(label_values, SampleValue::Number(value))
    }

    /// Add an info sample.
    ///
    /// # Panics
    ///
    /// If the family is not an info family or the label arity does not match.
    pub fn add_info<S: AsRef<str>>(
        &mut self,
        label_values: &[S],
        info: Vec<(String, String)>,
    ) -> &mut Self {
        assert_eq!(self.kind, MetricKind::Info, "{} is not an info family", self.name);
        self.push(label_values, SampleValue::Info(info))
    }

    /// Add a state set sample.
    ///
    /// # Panics
    ///
    /// If the family is not a state set or the label arity does not match.
    pub fn add_states<S: AsRef<str>>(
        &mut self,
        label_values: &[S],
        states: Vec<(String, bool)>,
    ) -> &mut Self {
        assert_eq!(
            self.kind,
            MetricKind::StateSet,
            "{} is not a state set family",
            self.name
        );
        self.push(label_values, SampleValue::States(states))
    }

    fn push<S: AsRef<str>>(&mut self, label_values: &[S], value: SampleValue) -> &mut Self {
        assert_eq!(
            label_values.len(),
            self.label_names.len(),
            "{} expects labels {:?}",
            self.name,
            self.label_names
        );
        self.samples.push(Sample {
            label_values: label_values.iter().map(|v| v.as_ref().to_string()).collect(),
            value,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_appends_unit() {
        let family = MetricFamily::gauge("connectbox_uptime", "Device uptime", Some("seconds"), &[]);
        assert_eq!(family.full_name(), "connectbox_uptime_seconds");

        let family = MetricFamily::counter("connectbox_upstream_timeouts", "Timeouts", &[]);
        assert_eq!(family.full_name(), "connectbox_upstream_timeouts");
    }

    #[test]
    fn test_add_metric_keeps_label_order() {
        let mut family = MetricFamily::gauge("f", "help", None, &["source", "channel_id"]);
        family
            .add_metric(&["192.168.0.1", "01"], 1.0)
            .add_metric(&["192.168.0.1", "02"], 2.0);

        assert_eq!(family.samples.len(), 2);
        assert_eq!(family.samples[1].label_values, vec!["192.168.0.1", "02"]);
        assert_eq!(family.samples[1].value, SampleValue::Number(2.0));
    }

    #[test]
    #[should_panic(expected = "expects labels")]
    fn test_label_arity_mismatch_panics() {
        let mut family = MetricFamily::gauge("f", "help", None, &["source", "channel_id"]);
        family.add_metric(&["192.168.0.1"], 1.0);
    }

    #[test]
    #[should_panic(expected = "not an info family")]
    fn test_info_sample_on_gauge_panics() {
        let mut family = MetricFamily::gauge("f", "help", None, &[]);
        let empty: [&str; 0] = [];
        family.add_info(&empty, vec![]);
    }
}
