use std::collections::BTreeMap;
use std::path::PathBuf;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::Result;
use crate::metadata::{parse_real_index, read_metadata, ReadOutcome};
use crate::report::{WarningKind, Warnings};
use crate::select::SelectedFile;
use crate::{AttributeId, PathId};

/// A metadata file accepted by the first pass, together with the identifier
/// its subject path received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataSource {
    pub name: String,
    pub path: PathBuf,
    pub path_id: PathId,
}

#[derive(Debug, Default)]
pub struct LookupTables {
    /// subject path -> identifier taken from the metadata filename
    pub paths: FxHashMap<String, PathId>,
    /// attribute value -> 1-based sequential identifier
    pub attributes: FxHashMap<String, AttributeId>,
    /// files to revisit when building cross-references, in selection order
    pub sources: Vec<MetadataSource>,
}

impl LookupTables {
    pub fn path_id(&self, subject: &str) -> Option<PathId> {
        self.paths.get(subject).copied()
    }

    pub fn attribute_id(&self, value: &str) -> Option<AttributeId> {
        self.attributes.get(value).copied()
    }

    pub fn paths_by_id(&self) -> BTreeMap<PathId, &str> {
        self.paths
            .iter()
            .map(|(path, id)| (*id, path.as_str()))
            .collect()
    }

    pub fn attributes_by_id(&self) -> BTreeMap<AttributeId, &str> {
        self.attributes
            .iter()
            .map(|(value, id)| (*id, value.as_str()))
            .collect()
    }

    fn intern_attribute(&mut self, value: String) {
        let next = self.attributes.len() as AttributeId + 1;
        self.attributes.entry(value).or_insert(next);
    }
}

/// First pass: assigns path identifiers from the metadata filenames and
/// sequential identifiers to distinct attribute values.
///
/// A file whose name carries no numeric identifier, whose content cannot be
/// parsed, or whose identifier is already held by a different subject is
/// recorded in `warnings` and skipped. A subject seen again under a new
/// identifier moves to that identifier and the earlier file is dropped from
/// the sources.
pub fn assign_identifiers(files: &[SelectedFile], warnings: &mut Warnings) -> Result<LookupTables> {
    let mut tables = LookupTables::default();
    let mut owners: FxHashMap<PathId, String> = FxHashMap::default();

    for file in files {
        let Some(path_id) = parse_real_index(&file.name) else {
            warnings.malformed(&file.path, "filename has no numeric identifier");
            continue;
        };
        let entry = match read_metadata(&file.path)? {
            ReadOutcome::Entry(entry) => entry,
            ReadOutcome::Malformed(reason) => {
                warnings.malformed(&file.path, reason);
                continue;
            }
        };

        if let Some(existing) = owners.get(&path_id) {
            if existing != &entry.subject {
                warnings.record(
                    &file.path,
                    WarningKind::DuplicateIdentifier {
                        id: path_id,
                        existing: existing.clone(),
                    },
                );
                continue;
            }
        }

        if let Some(previous_id) = tables.paths.insert(entry.subject.clone(), path_id) {
            warnings.record(
                &file.path,
                WarningKind::DuplicateSubject {
                    subject: entry.subject.clone(),
                    previous_id,
                },
            );
            if previous_id != path_id {
                owners.remove(&previous_id);
            }
            tables.sources.retain(|s| s.path_id != previous_id);
        }
        owners.insert(path_id, entry.subject);

        let attribute_count = entry.attributes.len();
        for value in entry.attributes {
            tables.intern_attribute(value);
        }
        debug!(file = %file.name, path_id, attribute_count, "assigned identifiers");

        tables.sources.push(MetadataSource {
            name: file.name.clone(),
            path: file.path.clone(),
            path_id,
        });
    }

    Ok(tables)
}
