use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;

use crate::PathId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WarningKind {
    /// The file could not be interpreted and was skipped.
    Malformed { reason: String },
    /// The file no longer matches what the first pass read from it.
    Changed { reason: String },
    /// The filename's identifier was already taken by another subject path.
    DuplicateIdentifier { id: PathId, existing: String },
    /// The subject path was introduced by an earlier file; this file's
    /// identifier replaced it.
    DuplicateSubject { subject: String, previous_id: PathId },
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::Malformed { reason } => write!(f, "malformed metadata: {reason}"),
            WarningKind::Changed { reason } => write!(f, "changed since first pass: {reason}"),
            WarningKind::DuplicateIdentifier { id, existing } => {
                write!(f, "identifier {id} already assigned to '{existing}'")
            }
            WarningKind::DuplicateSubject {
                subject,
                previous_id,
            } => write!(
                f,
                "subject '{subject}' already seen under identifier {previous_id}"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataWarning {
    pub file: PathBuf,
    #[serde(flatten)]
    pub kind: WarningKind,
}

impl fmt::Display for MetadataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.kind)
    }
}

/// Per-file warnings gathered over a run. Each one is logged when recorded.
#[derive(Debug, Default)]
pub struct Warnings {
    items: Vec<MetadataWarning>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, file: &Path, kind: WarningKind) {
        let warning = MetadataWarning {
            file: file.to_path_buf(),
            kind,
        };
        warn!(file = %warning.file.display(), "{}", warning.kind);
        self.items.push(warning);
    }

    pub fn malformed(&mut self, file: &Path, reason: impl Into<String>) {
        self.record(
            file,
            WarningKind::Malformed {
                reason: reason.into(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetadataWarning> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<MetadataWarning> {
        self.items
    }
}

/// Summary of a completed `build_index` run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub candidates: usize,
    pub selected_files: usize,
    pub selected_bytes: u64,
    pub budget_exhausted: bool,
    pub paths: usize,
    pub attributes: usize,
    pub cross_ref_rows: usize,
    pub attribute_references: usize,
    pub warnings: Vec<MetadataWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_render_with_file_and_kind() {
        let mut warnings = Warnings::new();
        warnings.malformed(Path::new("/in/abc.txt"), "filename has no numeric identifier");
        warnings.record(
            Path::new("/in/7.txt"),
            WarningKind::DuplicateIdentifier {
                id: 7,
                existing: "/data/a".to_string(),
            },
        );
        assert_eq!(warnings.len(), 2);
        let rendered: Vec<String> = warnings.iter().map(|w| w.to_string()).collect();
        assert_eq!(
            rendered[0],
            "/in/abc.txt: malformed metadata: filename has no numeric identifier"
        );
        assert_eq!(
            rendered[1],
            "/in/7.txt: identifier 7 already assigned to '/data/a'"
        );
    }

    #[test]
    fn warnings_serialize_with_kind_tag() {
        let warning = MetadataWarning {
            file: PathBuf::from("/in/3.txt"),
            kind: WarningKind::DuplicateSubject {
                subject: "/data/x".to_string(),
                previous_id: 2,
            },
        };
        let value = serde_json::to_value(&warning).unwrap();
        assert_eq!(value["kind"], "duplicate_subject");
        assert_eq!(value["file"], "/in/3.txt");
        assert_eq!(value["previous_id"], 2);
    }
}
