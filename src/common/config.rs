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

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::extractors::ExtractorKind;

/// Application configuration constants
pub struct AppConfig;

impl AppConfig {
    // Exporter
    pub const DEFAULT_PORT: u16 = 9705;
    // one second less than the default Prometheus scrape timeout of 10s
    pub const DEFAULT_TIMEOUT_SECS: u64 = 9;
    pub const METRICS_PATH: &'static str = "/metrics";

    // Bookkeeping key reporting login and logout of a scrape
    pub const LOGIN_LOGOUT: &'static str = "login_logout";
}

/// Exporter configuration, loaded from YAML and merged with defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub ip_address: String,
    pub password: String,
    pub exporter: ExporterConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExporterConfig {
    pub port: u16,
    pub timeout_seconds: u64,
    /// Extractor identifiers. A configured list replaces the default entirely.
    pub metrics: Vec<String>,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            port: AppConfig::DEFAULT_PORT,
            timeout_seconds: AppConfig::DEFAULT_TIMEOUT_SECS,
            metrics: ExtractorKind::ALL
                .iter()
                .map(|k| k.as_str().to_string())
                .collect(),
        }
    }
}

impl ExporterConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Shape of the file before mandatory keys are checked.
#[derive(Debug, Deserialize)]
struct RawConfig {
    ip_address: Option<String>,
    password: Option<String>,
    #[serde(default)]
    exporter: ExporterConfig,
}

impl Config {
    /// Read, validate and normalize the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&contents).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
                path: "<inline>".to_string(),
                source,
            })?;

        let ip_address = raw
            .ip_address
            .ok_or(ConfigError::MissingParameter("ip_address"))?;
        let password = raw
            .password
            .ok_or(ConfigError::MissingParameter("password"))?;

        let mut exporter = raw.exporter;
        if exporter.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                name: "timeout_seconds",
                reason: "must be positive".to_string(),
            });
        }
        if exporter.metrics.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "metrics",
                reason: "the config file needs to specify at least one family of metrics"
                    .to_string(),
            });
        }
        for name in &exporter.metrics {
            name.parse::<ExtractorKind>()?;
        }
        // fixes the extractor order of every scrape
        exporter.metrics.sort();
        exporter.metrics.dedup();

        Ok(Self {
            ip_address,
            password,
            exporter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml("ip_address: 192.168.0.1\npassword: secret\n").unwrap();
        assert_eq!(config.ip_address, "192.168.0.1");
        assert_eq!(config.exporter.port, 9705);
        assert_eq!(config.exporter.timeout(), Duration::from_secs(9));
        assert_eq!(
            config.exporter.metrics,
            vec!["device_status", "downstream", "lan_users", "temperature", "upstream"]
        );
    }

    #[test]
    fn test_metrics_replace_defaults_sorted_and_deduplicated() {
        let yaml = "ip_address: 10.0.0.1\npassword: x\nexporter:\n  port: 9000\n  metrics: [upstream, temperature, upstream]\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.exporter.port, 9000);
        assert_eq!(config.exporter.timeout_seconds, 9);
        assert_eq!(config.exporter.metrics, vec!["temperature", "upstream"]);
    }

    #[test]
    fn test_missing_mandatory_parameters() {
        assert!(matches!(
            Config::from_yaml("password: secret\n"),
            Err(ConfigError::MissingParameter("ip_address"))
        ));
        assert!(matches!(
            Config::from_yaml("ip_address: 192.168.0.1\n"),
            Err(ConfigError::MissingParameter("password"))
        ));
    }

    #[test]
    fn test_invalid_values() {
        let zero_timeout = "ip_address: a\npassword: b\nexporter:\n  timeout_seconds: 0\n";
        assert!(matches!(
            Config::from_yaml(zero_timeout),
            Err(ConfigError::InvalidValue { name: "timeout_seconds", .. })
        ));

        let no_metrics = "ip_address: a\npassword: b\nexporter:\n  metrics: []\n";
        assert!(matches!(
            Config::from_yaml(no_metrics),
            Err(ConfigError::InvalidValue { name: "metrics", .. })
        ));

        let bad_port = "ip_address: a\npassword: b\nexporter:\n  port: 70000\n";
        assert!(matches!(
            Config::from_yaml(bad_port),
            Err(ConfigError::Parse { .. })
        ));

        let unknown = "ip_address: a\npassword: b\nexporter:\n  metrics: [wifi]\n";
        assert!(matches!(
            Config::from_yaml(unknown),
            Err(ConfigError::UnknownExtractor { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ip_address: 192.168.100.1").unwrap();
        writeln!(file, "password: hunter2").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.ip_address, "192.168.100.1");
        assert_eq!(config.password, "hunter2");
    }

    #[test]
    fn test_load_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ip_address: [unterminated").unwrap();
        match Config::load(file.path()) {
            Err(ConfigError::Parse { path, .. }) => {
                assert_eq!(path, file.path().display().to_string())
            }
            other => panic!("Expected Parse error, got: {other:?}"),
        }

        assert!(matches!(
            Config::load("/nonexistent/connectbox.yml"),
            Err(ConfigError::Read { .. })
        ));
    }
}
