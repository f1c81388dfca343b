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

use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::api::handlers::{metrics_handler, SharedCollector};
use crate::common::config::AppConfig;
use crate::device::DeviceClient;
use crate::scrape::ConnectBoxCollector;

/// Router exposing the collector under `/metrics`.
pub fn router<C>(collector: SharedCollector<C>) -> Router
where
    C: DeviceClient + 'static,
{
    Router::new()
        .route(AppConfig::METRICS_PATH, get(metrics_handler::<C>))
        .with_state(collector)
        .layer(TraceLayer::new_for_http())
}

/// Serve `collector` on all interfaces until Ctrl+C or SIGTERM.
pub async fn run_exporter<C>(collector: ConnectBoxCollector<C>, port: u16) -> std::io::Result<()>
where
    C: DeviceClient + 'static,
{
    let source = collector.source().to_string();
    let app = router(Arc::new(collector));

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(
        "Exporter running at http://{}{}, querying {source}",
        listener.local_addr()?,
        AppConfig::METRICS_PATH
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Exporter stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
