//! Attachments panel: polygon and layer uploads

use crate::error::ValidationError;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use vdyp_tables::csv_layout::{LAYER_HEADERS, POLYGON_HEADERS};
use vdyp_tables::FileKind;

/// One column whose position holds an unexpected name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMismatch {
    /// Zero-based column position
    pub index: usize,
    /// Expected name
    pub expected: String,
    /// Name found in the file
    pub found: String,
}

/// Differences between an uploaded header and the expected layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeaderReport {
    /// Expected columns not present
    pub missing: Vec<String>,
    /// Present columns not expected
    pub extra: Vec<String>,
    /// Columns present but out of position
    pub mismatches: Vec<ColumnMismatch>,
}

impl HeaderReport {
    /// Check if the header matched exactly
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty() && self.mismatches.is_empty()
    }
}

impl fmt::Display for HeaderReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("missing [{}]", self.missing.join(", ")));
        }
        if !self.extra.is_empty() {
            parts.push(format!("unexpected [{}]", self.extra.join(", ")));
        }
        if !self.mismatches.is_empty() {
            let cols: Vec<String> = self
                .mismatches
                .iter()
                .map(|m| format!("#{} expected {} found {}", m.index + 1, m.expected, m.found))
                .collect();
            parts.push(format!("out of order [{}]", cols.join("; ")));
        }
        f.write_str(&parts.join(", "))
    }
}

/// Expected header columns for an upload
#[must_use]
pub fn expected_headers(kind: FileKind) -> &'static [&'static str] {
    match kind {
        FileKind::Polygon => &POLYGON_HEADERS,
        FileKind::Layer => &LAYER_HEADERS,
    }
}

/// Split a header line into trimmed, upper-cased column names
#[must_use]
pub fn split_header(header_line: &str) -> Vec<String> {
    header_line
        .trim_start_matches('\u{feff}')
        .trim_end_matches(['\r', '\n'])
        .split(',')
        .map(|c| c.trim().trim_matches('"').to_ascii_uppercase())
        .collect()
}

/// Attachments panel validator
#[derive(Debug, Clone, Copy)]
pub struct FileUploadValidator;

impl FileUploadValidator {
    /// Create validator
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Both uploads must be present and named `*.csv`
    pub fn validate_files(&self, polygon_name: Option<&str>, layer_name: Option<&str>) -> Result<(), ValidationError> {
        for (file, name) in [(FileKind::Polygon, polygon_name), (FileKind::Layer, layer_name)] {
            let name = name.map(str::trim).filter(|n| !n.is_empty());
            let Some(name) = name else {
                return Err(ValidationError::FileMissing { file });
            };
            if !name.to_ascii_lowercase().ends_with(".csv") {
                return Err(ValidationError::FileNotCsv { file });
            }
        }
        Ok(())
    }

    /// Header line must list the expected columns once each, in order
    pub fn validate_header(&self, kind: FileKind, header_line: &str) -> Result<(), ValidationError> {
        let columns = split_header(header_line);

        let mut seen = HashSet::new();
        let mut duplicates: Vec<String> = Vec::new();
        for col in &columns {
            if !seen.insert(col.as_str()) && !duplicates.contains(col) {
                duplicates.push(col.clone());
            }
        }
        if !duplicates.is_empty() {
            return Err(ValidationError::DuplicateColumns { file: kind, columns: duplicates });
        }

        let report = compare_headers(expected_headers(kind), &columns);
        if report.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::HeaderMismatch { file: kind, report })
        }
    }
}

impl Default for FileUploadValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn compare_headers(expected: &[&str], found: &[String]) -> HeaderReport {
    let found_set: HashSet<&str> = found.iter().map(String::as_str).collect();
    let expected_set: HashSet<&str> = expected.iter().copied().collect();

    let missing = expected
        .iter()
        .filter(|e| !found_set.contains(*e))
        .map(|e| (*e).to_string())
        .collect();
    let extra = found
        .iter()
        .filter(|f| !expected_set.contains(f.as_str()))
        .cloned()
        .collect();
    let mismatches = expected
        .iter()
        .zip(found)
        .enumerate()
        .filter(|(_, (e, f))| **e != f.as_str() && expected_set.contains(f.as_str()))
        .map(|(index, (e, f))| ColumnMismatch {
            index,
            expected: (*e).to_string(),
            found: f.clone(),
        })
        .collect();

    HeaderReport {
        missing,
        extra,
        mismatches,
    }
}
