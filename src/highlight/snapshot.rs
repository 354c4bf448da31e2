//! Serializable page snapshot that the highlighter can annotate.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{clear_issue, mark_issue, MarkableElement};
use crate::contrast::{audit_elements, AuditReport, ElementSample};

/// One element captured from a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotElement {
    pub selector: String,
    pub tag: String,
    pub text: String,
    pub foreground: String,
    pub background: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl SnapshotElement {
    pub fn new(
        selector: impl Into<String>,
        tag: impl Into<String>,
        text: impl Into<String>,
        foreground: impl Into<String>,
        background: impl Into<String>,
    ) -> Self {
        Self {
            selector: selector.into(),
            tag: tag.into(),
            text: text.into(),
            foreground: foreground.into(),
            background: background.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Audit sample for this element.
    pub fn sample(&self) -> ElementSample {
        ElementSample::new(
            self.selector.clone(),
            self.tag.clone(),
            &self.text,
            self.foreground.clone(),
            self.background.clone(),
        )
    }
}

impl MarkableElement for SnapshotElement {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
    }
}

/// A page's text elements, as exported by a collector script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    #[serde(default)]
    pub url: Option<String>,
    pub elements: Vec<SnapshotElement>,
}

impl PageSnapshot {
    /// Read a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SnapshotError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| SnapshotError::ParseError(e.to_string()))
    }

    /// Write the snapshot as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::SerializeError(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| SnapshotError::IoError(e.to_string()))
    }

    /// Audit samples for every element.
    pub fn samples(&self) -> Vec<ElementSample> {
        self.elements.iter().map(SnapshotElement::sample).collect()
    }

    /// Audit the snapshot and flag the failing elements.
    ///
    /// Elements that now pass lose any marker left by an earlier run.
    pub fn audit_and_mark(&mut self, min_ratio: f64) -> AuditReport {
        let report = audit_elements(&self.samples(), min_ratio);

        for (index, element) in self.elements.iter_mut().enumerate() {
            if report.issues.iter().any(|i| i.index == index) {
                mark_issue(element);
            } else {
                clear_issue(element);
            }
        }

        report
    }

    /// Elements currently carrying the issue marker.
    pub fn marked(&self) -> impl Iterator<Item = &SnapshotElement> {
        self.elements.iter().filter(|e| e.is_marked())
    }
}

/// Snapshot file errors.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
