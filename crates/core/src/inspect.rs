use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use fpxref_index::{
    read_cross_refs, read_id_table, CrossRefRow, ATTRIBUTE_TABLE_FILE, CROSS_REF_FILE,
    PATH_TABLE_FILE,
};
use serde::Serialize;

use crate::error::{Result, XrefError};
use crate::{AttributeId, PathId};

/// Lookup tables as read back from an output directory.
#[derive(Debug, Clone, Default)]
pub struct LoadedLookups {
    pub paths: BTreeMap<PathId, String>,
    pub attributes: BTreeMap<AttributeId, String>,
    pub cross_refs: Vec<CrossRefRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexSummary {
    pub paths: usize,
    pub attributes: usize,
    pub cross_ref_rows: usize,
    pub attribute_references: usize,
    pub empty_rows: usize,
    pub longest_row: usize,
    /// Path ids used by cross-reference rows but absent from the path table.
    pub unknown_path_ids: Vec<PathId>,
    /// Attribute ids referenced by rows but absent from the attribute table.
    pub unknown_attribute_ids: Vec<AttributeId>,
}

impl IndexSummary {
    pub fn is_consistent(&self) -> bool {
        self.unknown_path_ids.is_empty() && self.unknown_attribute_ids.is_empty()
    }
}

pub fn load_lookups(dir: &Path) -> Result<LoadedLookups> {
    let paths = read_id_table(open(&dir.join(PATH_TABLE_FILE))?)
        .with_context(|| format!("failed to parse {PATH_TABLE_FILE}"))?;
    let attributes = read_id_table(open(&dir.join(ATTRIBUTE_TABLE_FILE))?)
        .with_context(|| format!("failed to parse {ATTRIBUTE_TABLE_FILE}"))?;
    let cross_refs = read_cross_refs(open(&dir.join(CROSS_REF_FILE))?)
        .with_context(|| format!("failed to parse {CROSS_REF_FILE}"))?;
    Ok(LoadedLookups {
        paths,
        attributes,
        cross_refs,
    })
}

pub fn summarize(lookups: &LoadedLookups) -> IndexSummary {
    let mut unknown_paths = BTreeSet::new();
    let mut unknown_attributes = BTreeSet::new();
    let mut summary = IndexSummary {
        paths: lookups.paths.len(),
        attributes: lookups.attributes.len(),
        cross_ref_rows: lookups.cross_refs.len(),
        ..Default::default()
    };
    for row in &lookups.cross_refs {
        if !lookups.paths.contains_key(&row.path_id) {
            unknown_paths.insert(row.path_id);
        }
        for id in &row.attribute_ids {
            if !lookups.attributes.contains_key(id) {
                unknown_attributes.insert(*id);
            }
        }
        summary.attribute_references += row.attribute_ids.len();
        summary.longest_row = summary.longest_row.max(row.attribute_ids.len());
        if row.attribute_ids.is_empty() {
            summary.empty_rows += 1;
        }
    }
    summary.unknown_path_ids = unknown_paths.into_iter().collect();
    summary.unknown_attribute_ids = unknown_attributes.into_iter().collect();
    summary
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|err| XrefError::io_at(path, err))?;
    Ok(BufReader::new(file))
}
