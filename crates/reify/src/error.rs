//! Error types for tree decoding and hierarchy reconciliation.
//!
//! Both passes share one failure taxonomy ([`ErrorKind`]). Decode errors
//! carry the slot path where they occurred ([`PathError`]); reconcile
//! errors are collected into a uniform list ([`Report`]) where a single
//! failure is simply a list of length one.

use std::fmt;

use thiserror::Error;

use crate::model::PayloadKind;

/// Failure kinds produced by the decode and reconcile passes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    // === Decode ===
    #[error("unknown tag code {code}")]
    UnknownTag { code: i64 },

    #[error("slot has no tag")]
    MissingTag,

    #[error("missing attribute values")]
    MissingAttributeValues,

    #[error("malformed input: {context}")]
    MalformedInput { context: &'static str },

    #[error("missing {field}")]
    MissingRequiredField { field: &'static str },

    #[error("unknown {table} subtype code {code}")]
    UnknownSubtype { table: &'static str, code: i64 },

    #[error("missing expected geometry data for {kind:?}")]
    MissingGeometry { kind: PayloadKind },

    #[error("expected indices")]
    ExpectedIndices,

    #[error("tree depth exceeds maximum {max}")]
    DepthExceeded { max: usize },

    // === Reconcile ===
    #[error("{kind:?} objects are not supported yet")]
    UnsupportedPayloadKind { kind: PayloadKind },

    #[error("updating an existing object is not supported yet")]
    UpdateUnsupported,

    #[error("parent index {index} out of range (resolved so far: {len})")]
    ParentIndexOutOfRange { index: i32, len: usize },

    #[error("parent entry {index} was not materialized")]
    ParentUnavailable { index: i32 },
}

/// An error annotated with the node path where it occurred.
///
/// The path is built innermost-first: each enclosing decode frame prepends
/// its own node name, so after a full unwind the path reads root to leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct PathError {
    pub path: Vec<String>,
    pub kind: ErrorKind,
}

impl PathError {
    pub fn new(kind: ErrorKind) -> Self {
        Self { path: Vec::new(), kind }
    }

    /// Prepends the enclosing frame's node name. Empty segments are dropped,
    /// so anonymous frames do not pollute the path.
    #[must_use]
    pub fn push_segment(mut self, segment: impl Into<String>) -> Self {
        let segment = segment.into();
        if !segment.is_empty() {
            self.path.insert(0, segment);
        }
        self
    }
}

impl From<ErrorKind> for PathError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.path.join("/"), self.kind)
        }
    }
}

impl std::error::Error for PathError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// A uniform error list for one pass over one anchor.
///
/// One collected error formats with its original path unmodified; two or
/// more format as a composite under the anchor's identity, one line per
/// error.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Identity of the anchor the pass ran under.
    pub anchor: String,
    pub errors: Vec<PathError>,
}

impl Report {
    pub fn new(anchor: impl Into<String>) -> Self {
        Self { anchor: anchor.into(), errors: Vec::new() }
    }

    pub fn push(&mut self, error: PathError) {
        self.errors.push(error);
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = PathError>) {
        self.errors.extend(errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Consumes the report: `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), Report> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// One formatted `<path-joined-by-/>: <message>` line per error.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.errors.iter().map(|e| e.to_string())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "{}: no errors", self.anchor),
            [single] => write!(f, "{single}"),
            many => {
                write!(f, "{}: multiple errors occurred", self.anchor)?;
                for error in many {
                    write!(f, "\n{error}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for Report {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_prepends_innermost_first() {
        let err = PathError::new(ErrorKind::MissingTag)
            .push_segment("g")
            .push_segment("c")
            .push_segment("r");
        assert_eq!(err.path, vec!["r", "c", "g"]);
        assert_eq!(err.to_string(), "r/c/g: slot has no tag");
    }

    #[test]
    fn test_empty_segments_are_dropped() {
        let err = PathError::new(ErrorKind::ExpectedIndices)
            .push_segment("")
            .push_segment("selection");
        assert_eq!(err.path, vec!["selection"]);
    }

    #[test]
    fn test_single_error_report_keeps_path() {
        let mut report = Report::new("Anchor");
        report.push(PathError::new(ErrorKind::ExpectedIndices).push_segment("selection"));
        assert_eq!(report.to_string(), "selection: expected indices");
    }

    #[test]
    fn test_composite_report_lists_all_errors() {
        let mut report = Report::new("Anchor");
        report.push(PathError::new(ErrorKind::UpdateUnsupported).push_segment("a"));
        report.push(PathError::new(ErrorKind::ParentIndexOutOfRange { index: 7, len: 2 }).push_segment("b"));
        let rendered = report.to_string();
        assert!(rendered.starts_with("Anchor: multiple errors occurred"));
        assert_eq!(rendered.lines().count(), 3);
    }

    #[test]
    fn test_into_result() {
        assert!(Report::new("a").into_result().is_ok());
        let mut report = Report::new("a");
        report.push(ErrorKind::MissingTag.into());
        assert!(report.into_result().is_err());
    }
}
