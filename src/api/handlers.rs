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

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::api::metrics::{FamilyExporter, MetricExporter, TEXT_CONTENT_TYPE};
use crate::device::DeviceClient;
use crate::scrape::ConnectBoxCollector;

pub type SharedCollector<C> = Arc<ConnectBoxCollector<C>>;

/// Every request runs its own scrape; nothing is cached between requests.
///
/// The scrape runs on its own task. A client that disconnects mid-scrape drops
/// only this handler, the task still finishes and logs out of the device.
pub async fn metrics_handler<C>(State(collector): State<SharedCollector<C>>) -> Response
where
    C: DeviceClient + 'static,
{
    let scrape = tokio::spawn(async move { collector.collect().await });
    match scrape.await {
        Ok(families) => {
            let body = FamilyExporter::new(&families).export_metrics();
            ([(header::CONTENT_TYPE, TEXT_CONTENT_TYPE)], body).into_response()
        }
        Err(e) => {
            tracing::error!("Scrape task failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
