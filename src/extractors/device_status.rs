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

use tracing::warn;

use crate::device::DocumentId;
use crate::error::SchemaValidationError;
use crate::extractors::{load_document, Extractor, ProvisioningState, RawDocumentSet, SOURCE};
use crate::metrics::MetricFamily;
use crate::parsing::common::parse_uptime_seconds;

pub const DEVICE_STATUS: &str = "device_status";

/// Reported in place of the uptime when the device's uptime string cannot be parsed.
pub const UPTIME_PARSE_FAILED: f64 = -1.0;

/// Identity, provisioning status and uptime of the modem.
pub struct DeviceStatusExtractor;

impl Extractor for DeviceStatusExtractor {
    fn name(&self) -> &'static str {
        DEVICE_STATUS
    }

    fn functions(&self) -> &'static [DocumentId] {
        &[
            DocumentId::GLOBALSETTINGS,
            DocumentId::CM_SYSTEM_INFO,
            DocumentId::CMSTATUS,
        ]
    }

    fn extract(
        &self,
        raw: &RawDocumentSet,
        source: &str,
    ) -> Result<Vec<MetricFamily>, SchemaValidationError> {
        let global_settings = load_document(raw, DocumentId::GLOBALSETTINGS)?;
        let settings = global_settings.root();
        let firmware_version = settings.child_text("SwVersion")?;
        // empty while the modem is still scanning for downstream channels
        let cm_provision_mode = settings
            .optional_child_text("CmProvisionMode")
            .unwrap_or("Unknown");
        let gw_provision_mode = settings.child_text("GwProvisionMode")?;
        let operator_id = settings.child_text("OperatorId")?;

        let system_info = load_document(raw, DocumentId::CM_SYSTEM_INFO)?;
        let system = system_info.root();
        let docsis_mode = system.child_text("cm_docsis_mode")?;
        let hardware_version = system.child_text("cm_hardware_version")?;
        let uptime = system.child_text("cm_system_uptime")?;

        let cm_status = load_document(raw, DocumentId::CMSTATUS)?;
        let status = cm_status.root();
        let cable_modem_status = status.child_text("cm_comment")?;
        let provisioning_status = status.child_text("provisioning_st")?;

        let mut info = MetricFamily::info(
            "connectbox_device",
            "Assorted device information",
            &[SOURCE],
        );
        info.add_info(
            &[source],
            [
                ("hardware_version", hardware_version),
                ("firmware_version", firmware_version),
                ("docsis_mode", docsis_mode),
                ("cm_provision_mode", cm_provision_mode),
                ("gw_provision_mode", gw_provision_mode),
                ("cable_modem_status", cable_modem_status),
                ("operator_id", operator_id),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        );

        let state = ProvisioningState::classify(provisioning_status);
        if state == ProvisioningState::Unknown {
            warn!(
                "Unknown provisioning status '{provisioning_status}'. Please open an issue on Github."
            );
        }
        let mut provisioning = MetricFamily::state_set(
            "connectbox_provisioning_status",
            "Provisioning status description",
            &[SOURCE],
        );
        provisioning.add_states(&[source], state.state_set());

        let uptime_seconds = parse_uptime_seconds(uptime).unwrap_or_else(|| {
            warn!("Unexpected duration format '{uptime}', please open an issue on github.");
            UPTIME_PARSE_FAILED
        });
        let mut uptime_metric = MetricFamily::gauge(
            "connectbox_uptime",
            "Device uptime in seconds",
            Some("seconds"),
            &[SOURCE],
        );
        uptime_metric.add_metric(&[source], uptime_seconds);

        Ok(vec![info, provisioning, uptime_metric])
    }
}
