use crate::metrics::{MetricFamily, MetricKind, Sample, SampleValue};

/// Content type of the Prometheus text exposition format
pub const TEXT_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Trait for exporting metrics in Prometheus format
pub trait MetricExporter {
    /// Export metrics to Prometheus format string
    fn export_metrics(&self) -> String;
}

/// Helper struct to build Prometheus metrics
pub struct MetricBuilder {
    metrics: String,
}

impl MetricBuilder {
    pub fn new() -> Self {
        Self {
            metrics: String::new(),
        }
    }

    /// Add a HELP line
    pub fn help(&mut self, name: &str, description: &str) -> &mut Self {
        let description = description.replace('\\', "\\\\").replace('\n', "\\n");
        self.metrics
            .push_str(&format!("# HELP {name} {description}\n"));
        self
    }

    /// Add a TYPE line
    pub fn type_(&mut self, name: &str, metric_type: &str) -> &mut Self {
        self.metrics
            .push_str(&format!("# TYPE {name} {metric_type}\n"));
        self
    }

    /// Add a metric line with labels
    pub fn metric(
        &mut self,
        name: &str,
        labels: &[(&str, &str)],
        value: impl ToString,
    ) -> &mut Self {
        self.metrics.push_str(name);

        if !labels.is_empty() {
            self.metrics.push('{');
            for (i, (key, value)) in labels.iter().enumerate() {
                if i > 0 {
                    self.metrics.push(',');
                }
                self.metrics
                    .push_str(&format!("{key}=\"{}\"", escape_label_value(value)));
            }
            self.metrics.push('}');
        }

        self.metrics.push(' ');
        self.metrics.push_str(&value.to_string());
        self.metrics.push('\n');
        self
    }

    /// Build the final metric string
    pub fn build(self) -> String {
        self.metrics
    }
}

impl Default for MetricBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape backslash, double quote and line feed in a label value.
pub fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Prometheus spelling of special float values.
fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}

/// Renders the families of one scrape in the text exposition format.
///
/// Info families become gauges named `<name>_info` with the info entries
/// appended to the labels. State sets become gauges with one sample per
/// state, the state name in a label named after the family.
pub struct FamilyExporter<'a> {
    families: &'a [MetricFamily],
}

impl<'a> FamilyExporter<'a> {
    pub fn new(families: &'a [MetricFamily]) -> Self {
        Self { families }
    }

    fn export_family(&self, builder: &mut MetricBuilder, family: &MetricFamily) {
        let name = match family.kind {
            MetricKind::Info => format!("{}_info", family.full_name()),
            _ => family.full_name(),
        };
        let type_ = match family.kind {
            MetricKind::Counter => "counter",
            _ => "gauge",
        };
        builder.help(&name, &family.help).type_(&name, type_);

        for sample in &family.samples {
            self.export_sample(builder, family, &name, sample);
        }
    }

    fn export_sample(
        &self,
        builder: &mut MetricBuilder,
        family: &MetricFamily,
        name: &str,
        sample: &Sample,
    ) {
        let mut labels: Vec<(&str, &str)> = family
            .label_names
            .iter()
            .map(String::as_str)
            .zip(sample.label_values.iter().map(String::as_str))
            .collect();

        match &sample.value {
            SampleValue::Number(value) => {
                let name = match family.kind {
                    MetricKind::Counter => format!("{name}_total"),
                    _ => name.to_string(),
                };
                builder.metric(&name, &labels, format_value(*value));
            }
            SampleValue::Info(info) => {
                labels.extend(info.iter().map(|(k, v)| (k.as_str(), v.as_str())));
                builder.metric(name, &labels, 1);
            }
            SampleValue::States(states) => {
                for (state, set) in states {
                    let mut state_labels = labels.clone();
                    state_labels.push((family.name.as_str(), state.as_str()));
                    builder.metric(name, &state_labels, u8::from(*set));
                }
            }
        }
    }
}

impl MetricExporter for FamilyExporter<'_> {
    fn export_metrics(&self) -> String {
        let mut builder = MetricBuilder::new();
        for family in self.families {
            self.export_family(&mut builder, family);
        }
        builder.build()
    }
}
