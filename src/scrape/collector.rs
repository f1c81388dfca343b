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

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{debug, enabled, error, trace, Level};

use crate::device::{DeviceClient, DeviceSession, DocumentId};
use crate::error::ConnectivityError;
use crate::extractors::{Extractor, RawDocumentSet};
use crate::metrics::MetricFamily;
use crate::scrape::ScrapeOutcome;

/// Result of one scrape: the domain families, in extractor order, and the
/// bookkeeping needed to report on the scrape itself.
#[derive(Debug)]
pub struct Scrape {
    pub families: Vec<MetricFamily>,
    pub outcome: ScrapeOutcome,
}

/// Runs complete login, fetch, extract and logout cycles against one modem.
///
/// The collector holds no per-scrape state. Every call to [`scrape`] opens its
/// own session, so concurrent scrapes do not interfere with each other beyond
/// what the device itself allows.
///
/// [`scrape`]: ConnectBoxCollector::scrape
pub struct ConnectBoxCollector<C: DeviceClient> {
    client: C,
    extractors: Vec<Box<dyn Extractor>>,
    source: String,
}

impl<C: DeviceClient> ConnectBoxCollector<C> {
    /// `source` is the value of the `source` label on every family.
    pub fn new(client: C, extractors: Vec<Box<dyn Extractor>>, source: impl Into<String>) -> Self {
        Self {
            client,
            extractors,
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn extractor_names(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    pub async fn scrape(&self) -> Scrape {
        let mut outcome = ScrapeOutcome::new(self.extractors.iter().map(|e| e.name()));
        let mut families = Vec::new();

        debug!("Logging in at {}", self.source);
        let mut session = match self.client.open().await {
            Ok(session) => session,
            Err(e) => {
                error!("Login at {} failed: {e}", self.source);
                return Scrape { families, outcome };
            }
        };
        let mut login_logout = true;

        for extractor in &self.extractors {
            let started = Instant::now();

            let raw = match fetch_documents(&mut session, extractor.functions()).await {
                Ok(raw) => raw,
                Err(e) => {
                    // the session is gone, the remaining extractors would fail the same way
                    error!(
                        "Aborting scrape, '{}' could not fetch its documents: {e}",
                        extractor.name()
                    );
                    break;
                }
            };

            match extractor.extract(&raw, &self.source) {
                Ok(extracted) => {
                    families.extend(extracted);
                    outcome.record_success(extractor.name(), started.elapsed());
                }
                Err(e) => {
                    error!(
                        "Failed to extract '{}'. Please open an issue on Github and include the following:\n{e}\n{}",
                        extractor.name(),
                        raw_documents_json(&raw)
                    );
                }
            }
        }

        debug!("Logging out.");
        if let Err(e) = session.close().await {
            error!("Logout from {} failed: {e}", self.source);
            login_logout = false;
        }
        outcome.set_login_logout(login_logout);

        Scrape { families, outcome }
    }

    /// Scrape and append the bookkeeping families to the domain families.
    pub async fn collect(&self) -> Vec<MetricFamily> {
        let Scrape {
            mut families,
            outcome,
        } = self.scrape().await;
        families.extend(outcome.into_families(&self.source));
        families
    }
}

/// Fetch `functions` one after another; the device cannot serve concurrent requests.
async fn fetch_documents<S: DeviceSession>(
    session: &mut S,
    functions: &[DocumentId],
) -> Result<RawDocumentSet, ConnectivityError> {
    let mut raw = RawDocumentSet::new();
    for &function in functions {
        debug!("Querying fun={function}...");
        let body = session.fetch(function).await?;
        if enabled!(Level::TRACE) {
            trace!(
                "Raw XML response for fun={function}:\n{}",
                String::from_utf8_lossy(&body)
            );
        }
        raw.insert(function, body);
    }
    Ok(raw)
}

/// Raw documents as a JSON object keyed by function id, for bug reports.
fn raw_documents_json(raw: &RawDocumentSet) -> String {
    let printable: BTreeMap<String, String> = raw
        .iter()
        .map(|(function, body)| (function.to_string(), String::from_utf8_lossy(body).into_owned()))
        .collect();
    serde_json::to_string(&printable).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}
