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

//! Structural schemas for the modem's XML documents.
//!
//! A schema pins down the root element, the elements that must appear
//! directly below it, and the fields every record of a repeated element must
//! carry. Documents without a registered schema are only checked for
//! well-formedness. Element values are typed lazily through [`Element`],
//! which reports the offending element when a value does not parse.

use std::str::FromStr;

use crate::device::DocumentId;
use crate::error::SchemaValidationError;
use crate::parsing::common::parse_number;

/// A repeated element and the fields each occurrence must have.
#[derive(Debug)]
pub struct RecordSchema {
    /// Element below the root that holds the records, or `None` for the root.
    pub parent: Option<&'static str>,
    pub element: &'static str,
    pub fields: &'static [&'static str],
}

#[derive(Debug)]
pub struct DocumentSchema {
    pub root: &'static str,
    pub fields: &'static [&'static str],
    pub records: &'static [RecordSchema],
}

const CLIENT_FIELDS: &[&str] = &["MACAddr", "hostname", "speed"];

static CM_SYSTEM_INFO_SCHEMA: DocumentSchema = DocumentSchema {
    root: "cm_system_info",
    fields: &["cm_docsis_mode", "cm_hardware_version", "cm_system_uptime"],
    records: &[],
};

static DOWNSTREAM_TABLE_SCHEMA: DocumentSchema = DocumentSchema {
    root: "downstream_table",
    fields: &[],
    records: &[RecordSchema {
        parent: None,
        element: "downstream",
        fields: &["freq", "pow", "snr", "chid", "RxMER"],
    }],
};

static UPSTREAM_TABLE_SCHEMA: DocumentSchema = DocumentSchema {
    root: "upstream_table",
    fields: &[],
    records: &[RecordSchema {
        parent: None,
        element: "upstream",
        fields: &[
            "usid",
            "freq",
            "power",
            "srate",
            "t1Timeouts",
            "t2Timeouts",
            "t3Timeouts",
            "t4Timeouts",
        ],
    }],
};

static SIGNAL_TABLE_SCHEMA: DocumentSchema = DocumentSchema {
    root: "signal_table",
    fields: &[],
    records: &[RecordSchema {
        parent: None,
        element: "signal",
        fields: &["dsid", "unerrored", "correctable", "uncorrectable"],
    }],
};

static LANUSERTABLE_SCHEMA: DocumentSchema = DocumentSchema {
    root: "LanUserTable",
    fields: &["Ethernet", "WIFI"],
    records: &[
        RecordSchema {
            parent: Some("Ethernet"),
            element: "clientinfo",
            fields: CLIENT_FIELDS,
        },
        RecordSchema {
            parent: Some("WIFI"),
            element: "clientinfo",
            fields: CLIENT_FIELDS,
        },
    ],
};

static CMSTATE_SCHEMA: DocumentSchema = DocumentSchema {
    root: "cmstate",
    fields: &["TunnerTemperature", "Temperature"],
    records: &[],
};

static CMSTATUS_SCHEMA: DocumentSchema = DocumentSchema {
    root: "cm_status",
    fields: &["provisioning_st", "cm_comment"],
    records: &[],
};

/// Schema registered for a document, if any.
///
/// GLOBALSETTINGS has none: its layout differs between firmware releases.
pub fn schema_for(function: DocumentId) -> Option<&'static DocumentSchema> {
    match function {
        DocumentId::CM_SYSTEM_INFO => Some(&CM_SYSTEM_INFO_SCHEMA),
        DocumentId::DOWNSTREAM_TABLE => Some(&DOWNSTREAM_TABLE_SCHEMA),
        DocumentId::UPSTREAM_TABLE => Some(&UPSTREAM_TABLE_SCHEMA),
        DocumentId::SIGNAL_TABLE => Some(&SIGNAL_TABLE_SCHEMA),
        DocumentId::LANUSERTABLE => Some(&LANUSERTABLE_SCHEMA),
        DocumentId::CMSTATE => Some(&CMSTATE_SCHEMA),
        DocumentId::CMSTATUS => Some(&CMSTATUS_SCHEMA),
        _ => None,
    }
}

/// A parsed document that passed validation against its schema.
pub struct ValidatedDocument<'input> {
    function: DocumentId,
    doc: roxmltree::Document<'input>,
}

impl<'input> ValidatedDocument<'input> {
    /// Parse `raw` and validate it against the schema registered for `function`.
    pub fn parse(function: DocumentId, raw: &'input [u8]) -> Result<Self, SchemaValidationError> {
        let text = std::str::from_utf8(raw).map_err(|e| SchemaValidationError::InvalidValue {
            function,
            element: "#document".to_string(),
            value: e.to_string(),
        })?;
        let doc = roxmltree::Document::parse(text)
            .map_err(|source| SchemaValidationError::Malformed { function, source })?;

        let document = Self { function, doc };
        if let Some(schema) = schema_for(function) {
            document.validate(schema)?;
        }
        Ok(document)
    }

    pub fn root(&self) -> Element<'_, 'input> {
        Element {
            function: self.function,
            node: self.doc.root_element(),
        }
    }

    fn validate(&self, schema: &DocumentSchema) -> Result<(), SchemaValidationError> {
        let root = self.root();
        let found = root.node.tag_name().name();
        if found != schema.root {
            return Err(SchemaValidationError::UnexpectedRoot {
                function: self.function,
                expected: schema.root,
                found: found.to_string(),
            });
        }

        for field in schema.fields {
            root.child(field)?;
        }

        for record in schema.records {
            let parent = match record.parent {
                Some(name) => root.child(name)?,
                None => root,
            };
            for item in parent.children(record.element) {
                for field in record.fields {
                    item.child(field).map_err(|_| SchemaValidationError::MissingElement {
                        function: self.function,
                        element: format!("{}/{field}", record.element),
                    })?;
                }
            }
        }
        Ok(())
    }
}

/// An element of a validated document.
#[derive(Clone, Copy)]
pub struct Element<'a, 'input> {
    function: DocumentId,
    node: roxmltree::Node<'a, 'input>,
}

impl<'a, 'input> Element<'a, 'input> {
    pub fn name(&self) -> &'a str {
        self.node.tag_name().name()
    }

    /// Trimmed text content; empty for an element without text.
    pub fn text(&self) -> &'a str {
        self.node.text().map(str::trim).unwrap_or_default()
    }

    /// First child element named `name`.
    pub fn find(&self, name: &str) -> Option<Self> {
        self.children(name).next()
    }

    /// First child element named `name`, which must exist.
    pub fn child(&self, name: &str) -> Result<Self, SchemaValidationError> {
        self.find(name)
            .ok_or_else(|| SchemaValidationError::MissingElement {
                function: self.function,
                element: name.to_string(),
            })
    }

    /// All child elements named `name`, in document order.
    pub fn children<'n>(&self, name: &'n str) -> impl Iterator<Item = Self> + 'n
    where
        'a: 'n,
        'input: 'n,
    {
        let function = self.function;
        self.node
            .children()
            .filter(move |n| n.is_element() && n.tag_name().name() == name)
            .map(move |node| Self { function, node })
    }

    /// Text of the required child element `name`.
    pub fn child_text(&self, name: &str) -> Result<&'a str, SchemaValidationError> {
        self.child(name).map(|c| c.text())
    }

    /// Text of the child element `name`, if present and not empty.
    pub fn optional_child_text(&self, name: &str) -> Option<&'a str> {
        self.find(name).map(|c| c.text()).filter(|t| !t.is_empty())
    }

    /// Value of the required child element `name`, parsed as `T`.
    pub fn child_value<T: FromStr>(&self, name: &str) -> Result<T, SchemaValidationError> {
        let text = self.child_text(name)?;
        parse_number::<T>(text).ok_or_else(|| SchemaValidationError::InvalidValue {
            function: self.function,
            element: name.to_string(),
            value: text.to_string(),
        })
    }
}
