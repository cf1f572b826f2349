//! Builds file/attribute cross-reference tables from a directory of
//! per-file metadata.
//!
//! Each metadata file is named `<id>.<ext>`; its first line is a subject
//! path and the remaining lines are attribute values extracted from that
//! subject. A run selects the smallest files within a byte budget, assigns
//! identifiers to paths and attributes, and writes three flat lookup files
//! (see `fpxref_index`).

mod assign;
mod config;
mod crossref;
mod error;
mod inspect;
mod metadata;
mod pipeline;
mod report;
mod select;
mod write;

/// Identifier of a subject path, taken from its metadata filename.
pub type PathId = u64;
/// 1-based identifier of a distinct attribute value.
pub type AttributeId = u64;

pub use assign::{assign_identifiers, LookupTables, MetadataSource};
pub use config::{parse_size, IndexConfig, DEFAULT_SIZE_BUDGET};
pub use crossref::{build_cross_reference, CrossReference};
pub use error::{Result, XrefError};
pub use fpxref_index::CrossRefRow;
pub use inspect::{load_lookups, summarize, IndexSummary, LoadedLookups};
pub use metadata::{parse_metadata, parse_real_index, read_metadata, MetadataEntry, ReadOutcome};
pub use pipeline::build_index;
pub use report::{MetadataWarning, RunReport, WarningKind, Warnings};
pub use select::{select_files, SelectedFile, Selection};
pub use write::{write_lookups, WrittenFiles};
