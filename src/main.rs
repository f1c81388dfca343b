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

use anyhow::Context;
use clap::Parser;

use connectbox_exporter::api::run_exporter;
use connectbox_exporter::cli::Cli;
use connectbox_exporter::common::config::Config;
use connectbox_exporter::device::CompalClient;
use connectbox_exporter::extractors::resolve_all;
use connectbox_exporter::scrape::ConnectBoxCollector;
use connectbox_exporter::utils::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(&cli.config_file)?;
    let extractors = resolve_all(&config.exporter.metrics)?;
    let client = CompalClient::new(
        &config.ip_address,
        config.password.clone(),
        config.exporter.timeout(),
    )
    .with_context(|| format!("Cannot query device at '{}'", config.ip_address))?;

    let collector = ConnectBoxCollector::new(client, extractors, config.ip_address.clone());
    run_exporter(collector, config.exporter.port)
        .await
        .with_context(|| format!("Failed to serve metrics on port {}", config.exporter.port))?;
    Ok(())
}
