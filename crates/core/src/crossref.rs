use indexmap::IndexMap;
use tracing::debug;

use crate::assign::LookupTables;
use crate::error::Result;
use crate::metadata::{read_metadata, ReadOutcome};
use crate::report::{WarningKind, Warnings};
use crate::{AttributeId, PathId};

/// Path identifier -> attribute identifiers in file order, kept in the order
/// the paths were first inserted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrossReference {
    rows: IndexMap<PathId, Vec<AttributeId>>,
}

impl CrossReference {
    pub fn get(&self, path_id: PathId) -> Option<&[AttributeId]> {
        self.rows.get(&path_id).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PathId, &[AttributeId])> {
        self.rows.iter().map(|(id, attrs)| (*id, attrs.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of all row lengths, duplicates included.
    pub fn total_references(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }

    pub fn insert(&mut self, path_id: PathId, attribute_ids: Vec<AttributeId>) {
        self.rows.insert(path_id, attribute_ids);
    }
}

/// Second pass: re-reads every accepted source and maps its attribute lines
/// to identifiers.
pub fn build_cross_reference(
    tables: &LookupTables,
    warnings: &mut Warnings,
) -> Result<CrossReference> {
    let mut xref = CrossReference::default();

    for source in &tables.sources {
        let entry = match read_metadata(&source.path)? {
            ReadOutcome::Entry(entry) => entry,
            ReadOutcome::Malformed(reason) => {
                warnings.record(&source.path, WarningKind::Changed { reason });
                continue;
            }
        };
        let path_id = source.path_id;
        match tables.path_id(&entry.subject) {
            Some(id) if id == path_id => {}
            Some(id) => {
                warnings.record(
                    &source.path,
                    WarningKind::Changed {
                        reason: format!(
                            "subject '{}' now belongs to identifier {id}, expected {path_id}",
                            entry.subject
                        ),
                    },
                );
                continue;
            }
            None => {
                warnings.record(
                    &source.path,
                    WarningKind::Changed {
                        reason: format!("unknown subject '{}'", entry.subject),
                    },
                );
                continue;
            }
        }

        let mut attribute_ids = Vec::with_capacity(entry.attributes.len());
        for value in &entry.attributes {
            match tables.attribute_id(value) {
                Some(id) => attribute_ids.push(id),
                None => warnings.record(
                    &source.path,
                    WarningKind::Changed {
                        reason: format!("unknown attribute '{value}'"),
                    },
                ),
            }
        }
        debug!(
            file = %source.name,
            path_id,
            attributes = attribute_ids.len(),
            "cross-referenced"
        );
        xref.insert(path_id, attribute_ids);
    }

    Ok(xref)
}
