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

//! Error types for the connectbox exporter.
//!
//! Failures are split by the granularity at which they are recoverable:
//!
//! - [`ConfigError`] is fatal and only raised at startup.
//! - [`ConnectivityError`] aborts the remaining work of a single scrape.
//! - [`SchemaValidationError`] only skips the extractor that hit it.
//!
//! None of the scrape-path errors terminate the process; they surface as
//! `0` in the `connectbox_up` metric plus a log line.

use thiserror::Error;

use crate::device::DocumentId;

/// Startup-time configuration problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML or has the wrong shape.
    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// A mandatory parameter is missing.
    #[error("'{0}' is a mandatory config parameter, but it is missing in the YAML configuration file")]
    MissingParameter(&'static str),

    /// A parameter has a value outside its valid range.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: &'static str, reason: String },

    /// An extractor identifier that no extractor answers to.
    #[error("Unknown extractor '{name}', supported are: {supported}")]
    UnknownExtractor { name: String, supported: String },
}

/// The device could not be reached or refused to talk to us.
#[derive(Debug, Error)]
pub enum ConnectivityError {
    #[error("Connection to {url} failed: {reason}")]
    Connection { url: String, reason: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// The device redirected the login to its access-denied page. This is
    /// what happens on a wrong password or while another user is logged in.
    #[error("Access denied by the device (wrong password or another session active)")]
    AccessDenied,

    #[error("Login rejected by the device: {0}")]
    LoginRejected(String),

    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },

    /// The device did not hand out a `sessionToken` cookie.
    #[error("The device did not provide a session token")]
    MissingSessionToken,

    #[error("Invalid device address '{0}'")]
    InvalidAddress(String),
}

impl ConnectivityError {
    /// Classify a transport error from the HTTP client.
    pub fn from_reqwest(err: reqwest::Error, url: &str) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Connection {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

/// A document did not parse, or did not have the structure we expected.
#[derive(Debug, Error)]
pub enum SchemaValidationError {
    #[error("Document for fun={function} is not well-formed XML: {source}")]
    Malformed {
        function: DocumentId,
        #[source]
        source: roxmltree::Error,
    },

    #[error("Document for fun={function} has root element <{found}>, expected <{expected}>")]
    UnexpectedRoot {
        function: DocumentId,
        expected: &'static str,
        found: String,
    },

    #[error("Document for fun={function} is missing element <{element}>")]
    MissingElement {
        function: DocumentId,
        element: String,
    },

    #[error("Document for fun={function} has invalid value '{value}' in <{element}>")]
    InvalidValue {
        function: DocumentId,
        element: String,
        value: String,
    },

    /// The raw document set handed to an extractor lacks a document it needs.
    #[error("No document was provided for fun={0}")]
    MissingDocument(DocumentId),
}

/// The main error type for the connectbox exporter.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Connectivity(#[from] ConnectivityError),

    #[error(transparent)]
    Schema(#[from] SchemaValidationError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for exporter operations.
pub type Result<T> = std::result::Result<T, Error>;
