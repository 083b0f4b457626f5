//! Raw outline input shapes accepted from storage and the parse step.
//!
//! # Responsibility
//! - Classify untyped JSON exactly once into one of the historical shapes.
//!
//! # Invariants
//! - Classification never fails; unrecognized input becomes `Missing`.
//! - A directory carrying a `files` list is always treated as canonical, even
//!   when legacy `commercial`/`technical` keys are also present.
//! - Canonical input is decoded field by field: `null` or mistyped text
//!   fields become empty strings, scalar titles become text, and only nodes
//!   or files that are not objects are dropped. One bad node never discards
//!   the rest of the document.

use crate::model::outline::{OutlineDocumentSet, OutlineFile, OutlineNode};
use log::warn;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Project-level key holding the outline.
pub const DOCUMENT_DIRECTORY_KEY: &str = "documentDirectory";

/// Historical outline shapes, discriminated at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawOutline {
    /// No outline was produced or stored yet.
    Missing,
    /// Tree-shaped document, possibly with blank `contentFormat` values.
    Canonical(OutlineDocumentSet),
    /// Newline-delimited chapter titles per bundle.
    LegacyFlat {
        commercial: String,
        technical: String,
    },
}

impl RawOutline {
    /// Classifies a whole project record by its `documentDirectory` field.
    pub fn from_project(project: &Value) -> Self {
        match project.get(DOCUMENT_DIRECTORY_KEY) {
            Some(directory) => Self::from_directory(directory),
            None => Self::Missing,
        }
    }

    /// Classifies a `documentDirectory` value.
    pub fn from_directory(directory: &Value) -> Self {
        let Some(object) = directory.as_object() else {
            return Self::Missing;
        };

        if let Some(files) = object.get("files") {
            let Some(files) = files.as_array() else {
                warn!(
                    "event=outline_classify module=normalize status=degraded source=canonical error_code=files_not_list"
                );
                return Self::Missing;
            };
            return Self::Canonical(decode_document(object, files));
        }

        let commercial = object.get("commercial").and_then(Value::as_str);
        let technical = object.get("technical").and_then(Value::as_str);
        if commercial.is_none() && technical.is_none() {
            return Self::Missing;
        }

        Self::LegacyFlat {
            commercial: commercial.unwrap_or_default().to_string(),
            technical: technical.unwrap_or_default().to_string(),
        }
    }

    /// Stable label used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Canonical(_) => "canonical",
            Self::LegacyFlat { .. } => "legacy_flat",
        }
    }
}

/// Counts entries dropped while decoding one canonical document.
#[derive(Debug, Default)]
struct DecodeReport {
    dropped_files: usize,
    dropped_nodes: usize,
}

fn decode_document(object: &Map<String, Value>, files: &[Value]) -> OutlineDocumentSet {
    let mut report = DecodeReport::default();
    let files = files
        .iter()
        .filter_map(|file| match file.as_object() {
            Some(file) => Some(Arc::new(decode_file(file, &mut report))),
            None => {
                report.dropped_files += 1;
                None
            }
        })
        .collect();

    if report.dropped_files > 0 || report.dropped_nodes > 0 {
        warn!(
            "event=outline_classify module=normalize status=repaired source=canonical dropped_files={} dropped_nodes={}",
            report.dropped_files, report.dropped_nodes
        );
    }
    OutlineDocumentSet {
        summary: text_field(object, "summary"),
        files,
    }
}

fn decode_file(object: &Map<String, Value>, report: &mut DecodeReport) -> OutlineFile {
    OutlineFile {
        name: text_field(object, "name"),
        items: decode_nodes(object.get("items"), report),
    }
}

fn decode_nodes(value: Option<&Value>, report: &mut DecodeReport) -> Vec<Arc<OutlineNode>> {
    let Some(nodes) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    nodes
        .iter()
        .filter_map(|node| match node {
            Value::Object(node) => Some(Arc::new(decode_node(node, report))),
            // Bare string entries are chapter titles written by older tools.
            Value::String(title) => Some(Arc::new(OutlineNode::new(title.as_str(), ""))),
            _ => {
                report.dropped_nodes += 1;
                None
            }
        })
        .collect()
}

fn decode_node(object: &Map<String, Value>, report: &mut DecodeReport) -> OutlineNode {
    OutlineNode {
        title: text_field(object, "title"),
        description: text_field(object, "description"),
        content_format: text_field(object, "contentFormat"),
        children: decode_nodes(object.get("children"), report),
    }
}

fn text_field(object: &Map<String, Value>, key: &str) -> String {
    match object.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}

impl From<OutlineDocumentSet> for RawOutline {
    fn from(value: OutlineDocumentSet) -> Self {
        Self::Canonical(value)
    }
}

impl From<Option<&Value>> for RawOutline {
    fn from(value: Option<&Value>) -> Self {
        value.map_or(Self::Missing, Self::from_directory)
    }
}
