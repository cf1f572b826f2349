use std::fs;

use tracing::{info, warn};

use crate::assign::assign_identifiers;
use crate::config::IndexConfig;
use crate::crossref::build_cross_reference;
use crate::error::{Result, XrefError};
use crate::report::{RunReport, Warnings};
use crate::select::select_files;
use crate::write::write_lookups;

/// Runs selection, both passes, and the writer for one configuration.
///
/// Any I/O error aborts the run. Per-file problems are collected in the
/// returned report.
pub fn build_index(config: &IndexConfig) -> Result<RunReport> {
    config.validate()?;

    let selection = select_files(&config.input_dir, config.size_budget)?;
    info!(
        input = %config.input_dir.display(),
        candidates = selection.candidates,
        selected = selection.len(),
        bytes = selection.total_bytes,
        budget = config.size_budget,
        "selected metadata files"
    );
    prepare_output_dir(config)?;

    let mut warnings = Warnings::new();
    let tables = assign_identifiers(&selection.files, &mut warnings)?;
    info!(
        paths = tables.paths.len(),
        attributes = tables.attributes.len(),
        "identifiers assigned"
    );

    let xref = build_cross_reference(&tables, &mut warnings)?;
    write_lookups(&config.output_dir, &tables, &xref)?;

    if !warnings.is_empty() {
        warn!(
            count = warnings.len(),
            "metadata warnings during run; affected files were skipped or superseded"
        );
    }

    Ok(RunReport {
        candidates: selection.candidates,
        selected_files: selection.len(),
        selected_bytes: selection.total_bytes,
        budget_exhausted: selection.budget_exhausted,
        paths: tables.paths.len(),
        attributes: tables.attributes.len(),
        cross_ref_rows: xref.len(),
        attribute_references: xref.total_references(),
        warnings: warnings.into_vec(),
    })
}

fn prepare_output_dir(config: &IndexConfig) -> Result<()> {
    let dir = &config.output_dir;
    if dir.is_dir() {
        return Ok(());
    }
    if !config.create_output_dir {
        return Err(XrefError::NotFound(dir.clone()));
    }
    fs::create_dir_all(dir).map_err(|err| XrefError::io_at(dir, err))?;
    info!(output = %dir.display(), "created output directory");
    Ok(())
}
