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

use std::time::Duration;

use crate::common::config::AppConfig;
use crate::extractors::SOURCE;
use crate::metrics::MetricFamily;

const EXTRACTOR: &str = "extractor";

/// Per-scrape bookkeeping: how long each extractor took and whether it succeeded.
///
/// Success starts out `false` for every configured extractor and for the
/// synthetic login/logout entry, so an aborted scrape still reports a value
/// for each of them.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeOutcome {
    durations: Vec<(String, f64)>,
    success: Vec<(String, bool)>,
}

impl ScrapeOutcome {
    pub fn new<'a>(extractors: impl IntoIterator<Item = &'a str>) -> Self {
        let mut success: Vec<(String, bool)> = extractors
            .into_iter()
            .map(|name| (name.to_string(), false))
            .collect();
        success.push((AppConfig::LOGIN_LOGOUT.to_string(), false));
        Self {
            durations: Vec::new(),
            success,
        }
    }

    /// Mark `extractor` as completed after `elapsed`.
    pub fn record_success(&mut self, extractor: &str, elapsed: Duration) {
        self.durations
            .push((extractor.to_string(), elapsed.as_secs_f64()));
        self.set(extractor, true);
    }

    pub fn set_login_logout(&mut self, ok: bool) {
        self.set(AppConfig::LOGIN_LOGOUT, ok);
    }

    fn set(&mut self, name: &str, ok: bool) {
        if let Some(entry) = self.success.iter_mut().find(|(n, _)| n == name) {
            entry.1 = ok;
        }
    }

    /// `None` for names that are neither configured nor `login_logout`.
    pub fn success(&self, name: &str) -> Option<bool> {
        self.success
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ok)| *ok)
    }

    /// Seconds taken by `extractor`, if it completed.
    pub fn duration(&self, extractor: &str) -> Option<f64> {
        self.durations
            .iter()
            .find(|(n, _)| n == extractor)
            .map(|(_, secs)| *secs)
    }

    pub fn durations(&self) -> &[(String, f64)] {
        &self.durations
    }

    pub fn successes(&self) -> &[(String, bool)] {
        &self.success
    }

    /// The two bookkeeping families, duration first.
    pub fn into_families(self, source: &str) -> Vec<MetricFamily> {
        let labels = [EXTRACTOR, SOURCE];

        let mut duration = MetricFamily::gauge(
            "connectbox_scrape_duration",
            "Scrape duration by extractor",
            Some("seconds"),
            &labels,
        );
        for (name, secs) in &self.durations {
            duration.add_metric(&[name.as_str(), source], *secs);
        }

        let mut up = MetricFamily::gauge(
            "connectbox_up",
            "Connect Box exporter scrape success by extractor",
            None,
            &labels,
        );
        for (name, ok) in &self.success {
            up.add_metric(&[name.as_str(), source], if *ok { 1.0 } else { 0.0 });
        }

        vec![duration, up]
    }
}
